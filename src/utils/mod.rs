pub mod lenient;
pub mod logging;
pub mod time;
