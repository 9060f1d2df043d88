pub mod cases;
pub mod config;
pub mod daemon;
pub mod logging;
pub mod process;
pub mod suite;
pub mod template;
