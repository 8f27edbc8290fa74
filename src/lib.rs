pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod process;

pub use config::{Config, SanitizeConfig};
pub use error::{PipelineError, Result};
pub use process::{load_clean_data, Field, Table, Value};
