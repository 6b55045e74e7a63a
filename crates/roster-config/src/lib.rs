//! Compiled-in constants, file system paths, configuration and logging
//! setup shared by the roster crates.

mod config;
mod error;
mod logging;
mod paths;

pub use config::{
    Config, DEFAULT_DOWNLOAD_BASE_URL, DEFAULT_LOG_LEVEL, IMAGE_EXTENSION, IMAGE_PREFIX,
    STUDENTS_COLLECTION,
};
pub use error::{CoreError, CoreResult};
pub use logging::{init_logging, parse_level};
pub use paths::Paths;
