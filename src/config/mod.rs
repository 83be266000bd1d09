//! Configuration entries, their sources, and their resolution.

mod entry;
mod env;
mod error;
mod phase;
mod resolve;
mod store;

pub use entry::{ConfigEntry, Value, SYSTEM_TAG};
pub use env::{Environment, MapEnv, ProcessEnv};
pub use error::ResolveError;
pub use phase::{BuildGate, BuildPhase, Runtime};
pub use resolve::{resolve, resolve_entry, Resolution};
pub use store::{ConfigStore, MemoryStore};
