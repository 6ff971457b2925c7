pub mod analyzers;
pub mod card;
pub mod config;
pub mod enrich;
pub mod fetch;
pub mod infra;
pub mod loader;
pub mod merge;
pub mod output;
pub mod services;
