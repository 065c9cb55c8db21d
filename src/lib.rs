pub mod catalog;
pub mod config;
pub mod database;
pub mod error;
pub mod locale;
pub mod server;
pub mod sync;
pub mod timing;

pub use error::{Error, Result};

pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
