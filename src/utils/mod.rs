pub mod file;
pub mod logging;

pub use file::{ensure_directory_exists, write_output};
pub use logging::init_logging;
