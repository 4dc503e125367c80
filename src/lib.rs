pub mod analyzers;
pub mod cleaner;
pub mod config;
pub mod download;
pub mod error;
pub mod features;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod table;
