use std::sync::atomic::{AtomicBool, Ordering};

/// Entitlement gate evaluated once per stats request, before any dispatch.
pub trait LicenseChecker: Send + Sync {
    fn is_allowed(&self) -> bool;
}

/// License state that can be flipped at runtime, e.g. when a license expires.
#[derive(Debug)]
pub struct LicenseState {
    active: AtomicBool,
}

impl LicenseState {
    pub fn new(active: bool) -> Self {
        Self {
            active: AtomicBool::new(active),
        }
    }

    pub fn set_active(&self, active: bool) {
        let previous = self.active.swap(active, Ordering::AcqRel);
        if previous != active {
            let state = if active { "active" } else { "inactive" };
            tracing::info!("Cross-cluster replication license is now {}", state);
        }
    }
}

impl LicenseChecker for LicenseState {
    fn is_allowed(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}
