pub mod publisher;
pub mod runner;
pub mod status_resolver;
