//! Network availability check used as a precondition before any call.
//!
//! The check must be cheap and local. A `true` answer does not promise the
//! request will succeed; it only lets the pipeline skip requests that
//! certainly would not.

use std::sync::atomic::{AtomicBool, Ordering};

pub trait Connectivity: Send + Sync {
    fn is_network_available(&self) -> bool;
}

/// Reports the network as always available.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOnline;

impl Connectivity for AlwaysOnline {
    fn is_network_available(&self) -> bool {
        true
    }
}

/// Availability flag that can be flipped at runtime, e.g. by an "offline"
/// switch or a platform network callback.
#[derive(Debug)]
pub struct ToggleConnectivity {
    online: AtomicBool,
}

impl ToggleConnectivity {
    pub fn new(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Release);
    }
}

impl Default for ToggleConnectivity {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Connectivity for ToggleConnectivity {
    fn is_network_available(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }
}
