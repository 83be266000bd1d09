//! Build-phase detection.
//!
//! Environment references must not be read while the host is still in its
//! static initialization phase, because whatever they read would be frozen
//! into the result. A [`BuildPhase`] tells the resolver which phase it is in.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Reports whether reading the runtime environment is allowed.
pub trait BuildPhase: Send + Sync {
    /// `true` once normal runtime execution has started.
    fn env_allowed(&self) -> bool;
}

impl<F> BuildPhase for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn env_allowed(&self) -> bool {
        self()
    }
}

/// Always in runtime; environment reads are always allowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Runtime;

impl BuildPhase for Runtime {
    fn env_allowed(&self) -> bool {
        true
    }
}

/// A flag the host opens once static initialization is over.
///
/// Clones share the same flag.
///
/// ```
/// use deferred_env::config::{BuildGate, BuildPhase};
///
/// let gate = BuildGate::new();
/// assert!(!gate.env_allowed());
/// gate.open();
/// assert!(gate.env_allowed());
/// ```
#[derive(Debug, Clone, Default)]
pub struct BuildGate {
    open: Arc<AtomicBool>,
}

impl BuildGate {
    /// Creates a closed gate.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self) {
        self.open.store(true, Ordering::Release);
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }
}

impl BuildPhase for BuildGate {
    fn env_allowed(&self) -> bool {
        self.is_open()
    }
}
