pub mod download;
pub mod matchers;
pub mod pick;
pub mod pipeline;
pub mod ranker;
pub mod report;
pub mod resolver;
