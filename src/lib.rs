pub mod config;
pub mod fetch;
pub mod loader;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod stats;
pub mod types;
