pub mod browser;
pub mod chart;
pub mod config;
pub mod data_collector;
pub mod interrupt;
pub mod parser;
pub mod resolved_json;
pub mod schema;
pub mod song_log;
pub mod soundcloud;
