use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

type Listener = Box<dyn Fn() + Send + Sync>;

/// Broadcast point for session invalidation.
///
/// [`HttpClient`](crate::HttpClient) fires `unauthorized()` exactly once per
/// request that came back 401; the auth store registers a listener that
/// performs the logout transition. Listeners must not call back into the
/// HTTP layer.
#[derive(Default)]
pub struct SessionEvents {
    listeners: RwLock<Vec<Listener>>,
    unauthorized_count: AtomicU64,
}

impl SessionEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_unauthorized(&self, listener: impl Fn() + Send + Sync + 'static) {
        self.listeners.write().push(Box::new(listener));
    }

    /// Notify all listeners that the backend rejected the session.
    pub fn unauthorized(&self) {
        self.unauthorized_count.fetch_add(1, Ordering::Relaxed);
        for listener in self.listeners.read().iter() {
            listener();
        }
    }

    /// Total number of 401 notifications fired so far.
    pub fn unauthorized_count(&self) -> u64 {
        self.unauthorized_count.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for SessionEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEvents")
            .field("listeners", &self.listeners.read().len())
            .field("unauthorized_count", &self.unauthorized_count)
            .finish()
    }
}
