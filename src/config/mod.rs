//! Configuration loading, parsing, and validation

mod parser;
mod types;
mod validation;

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{Backend, Config, CrawlerConfig, OutputConfig, SiteEntry};
pub use validation::validate;
