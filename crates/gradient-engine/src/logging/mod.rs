//! Logger setup over the `log` facade.

mod init;

pub use init::{init_logging, LoggingConfig};
