// src/lib.rs
pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod present;
pub mod process;
pub mod server;

pub use error::{CalendarError, Result};
