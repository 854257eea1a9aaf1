mod builder;
mod file;
mod models;

pub use builder::build_config;
pub use models::{AppConfig, OutputFormat};
