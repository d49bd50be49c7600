pub mod filename;
pub mod files;
