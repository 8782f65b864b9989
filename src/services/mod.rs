pub mod categorizer;
pub mod discovery;
pub mod fetcher;
pub mod parser;
pub mod publisher;
pub mod refresh;
pub mod registry;
