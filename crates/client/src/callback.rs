//! Single-slot hook for "the session cannot be recovered".

use std::sync::Arc;

use parking_lot::RwLock;

type Handler = Arc<dyn Fn() + Send + Sync>;

/// Holds at most one unauthorized-session handler.
///
/// Registering replaces any previous handler and has no other effect.
#[derive(Default, Clone)]
pub struct UnauthorizedSlot {
    handler: Arc<RwLock<Option<Handler>>>,
}

impl UnauthorizedSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.handler.write() = Some(Arc::new(handler));
    }

    pub fn is_registered(&self) -> bool {
        self.handler.read().is_some()
    }

    /// Call the registered handler synchronously; no-op when none is registered.
    pub fn invoke(&self) {
        // Release the lock before calling so the handler may re-register.
        let handler = self.handler.read().clone();
        match handler {
            Some(handler) => handler(),
            None => tracing::debug!("no unauthorized handler registered"),
        }
    }
}

impl core::fmt::Debug for UnauthorizedSlot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UnauthorizedSlot")
            .field("registered", &self.is_registered())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn invoking_empty_slot_is_a_no_op() {
        UnauthorizedSlot::new().invoke();
    }

    #[test]
    fn registering_does_not_invoke() {
        let calls = Arc::new(AtomicUsize::new(0));
        let slot = UnauthorizedSlot::new();
        let counter = calls.clone();
        slot.register(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(slot.is_registered());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        slot.invoke();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn last_registration_wins() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let slot = UnauthorizedSlot::new();

        let counter = first.clone();
        slot.register(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = second.clone();
        slot.register(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        slot.invoke();
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }
}
