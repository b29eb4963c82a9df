pub mod file_format;
pub mod log_setup;

pub use file_format::{SerdeFormat, SerdeFormatError, SerdeFormatResult};
pub use log_setup::{setup_logging, LogSettings};
