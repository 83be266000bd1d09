pub mod config;
pub mod context;
mod error;

pub use config::{ConfigEntry, ResolveError, Value};
pub use context::Lookup;
pub use error::Error;
