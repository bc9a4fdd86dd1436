//! Alert registry
//!
//! A single replaceable slot holding the UI's alert handlers. The registry is
//! injected into `ApiClient`; the UI root sets handlers when it mounts and
//! clears them when it unmounts. With no handlers installed, dispatch is a
//! no-op and failures still reach the caller as errors.

use std::sync::{Arc, RwLock};

use crate::ports::outbound::{Alert, AlertHandlers, AlertKind};

#[derive(Clone, Default)]
pub struct AlertRegistry {
    slot: Arc<RwLock<Option<Arc<dyn AlertHandlers>>>>,
}

impl AlertRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active handler set. Last writer wins; `None` clears it.
    pub fn set_handlers(&self, handlers: Option<Arc<dyn AlertHandlers>>) {
        match self.slot.write() {
            Ok(mut guard) => *guard = handlers,
            Err(e) => tracing::error!("Failed to acquire write lock for alert handlers: {}", e),
        }
    }

    /// Install `handlers` until the returned guard is dropped.
    pub fn register(&self, handlers: Arc<dyn AlertHandlers>) -> AlertGuard {
        self.set_handlers(Some(Arc::clone(&handlers)));
        AlertGuard {
            registry: self.clone(),
            handlers,
        }
    }

    pub fn has_handlers(&self) -> bool {
        self.current().is_some()
    }

    fn current(&self) -> Option<Arc<dyn AlertHandlers>> {
        match self.slot.read() {
            Ok(guard) => guard.clone(),
            Err(e) => {
                tracing::error!("Failed to acquire read lock for alert handlers: {}", e);
                None
            }
        }
    }

    /// Route `alert` to the handler method for its kind.
    pub fn dispatch(&self, alert: &Alert) {
        // Called outside the lock so a handler may re-register.
        let Some(handlers) = self.current() else {
            tracing::debug!(kind = %alert.kind, title = %alert.title, "No alert handlers registered");
            return;
        };

        match alert.kind {
            AlertKind::Error => handlers.show_error(alert),
            AlertKind::Success => handlers.show_success(alert),
            AlertKind::LoginRequired => handlers.show_login_required(alert),
            AlertKind::Info => handlers.show_alert(alert),
            AlertKind::Confirm => handlers.show_confirm(alert),
        }
    }
}

/// Clears the registry on drop, unless another handler set replaced ours.
#[must_use = "handlers are removed as soon as the guard is dropped"]
pub struct AlertGuard {
    registry: AlertRegistry,
    handlers: Arc<dyn AlertHandlers>,
}

impl Drop for AlertGuard {
    fn drop(&mut self) {
        match self.registry.slot.write() {
            Ok(mut guard) => {
                let still_ours = guard
                    .as_ref()
                    .is_some_and(|current| same_handlers(current, &self.handlers));
                if still_ours {
                    *guard = None;
                }
            }
            Err(e) => tracing::error!("Failed to acquire write lock for alert handlers: {}", e),
        }
    }
}

fn same_handlers(a: &Arc<dyn AlertHandlers>, b: &Arc<dyn AlertHandlers>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}
