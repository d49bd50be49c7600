pub mod models;
pub mod releases;
