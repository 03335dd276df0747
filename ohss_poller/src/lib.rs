pub mod config;
pub mod parser;
pub mod runner;

pub use config::ExporterConfig;
pub use parser::{parse_config_from_file, parse_config_from_str};
pub use runner::Poller;
