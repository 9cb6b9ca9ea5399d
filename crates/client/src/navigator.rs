//! Current location of the client, shared with the unauthorized handler.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use quizdesk_auth::{Navigation, RouteName, Router};
use quizdesk_core::SessionIdentity;

/// Number of navigations kept; older entries are dropped first.
pub const HISTORY_LIMIT: usize = 32;

/// Records where the client is and where it has been.
#[derive(Debug, Clone)]
pub struct Navigator {
    router: Router,
    history: Arc<Mutex<VecDeque<Navigation>>>,
}

impl Navigator {
    pub fn new(router: Router) -> Self {
        Self {
            router,
            history: Arc::new(Mutex::new(VecDeque::with_capacity(HISTORY_LIMIT))),
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Attempt to open a location; guards decide where it lands.
    pub fn open(&self, location: &str, identity: &SessionIdentity) -> Navigation {
        let navigation = self.router.resolve(location, identity);
        self.record(navigation.clone());
        navigation
    }

    /// Go to a named route.
    pub fn push(&self, route: RouteName, identity: &SessionIdentity) -> Navigation {
        let navigation = self.router.navigate(route, identity);
        self.record(navigation.clone());
        navigation
    }

    pub fn current(&self) -> Option<RouteName> {
        self.history.lock().back().map(|nav| nav.entered)
    }

    /// Recent navigations, oldest first.
    pub fn history(&self) -> Vec<Navigation> {
        self.history.lock().iter().cloned().collect()
    }

    fn record(&self, navigation: Navigation) {
        tracing::info!(
            requested = %navigation.requested,
            entered = %navigation.entered,
            title = %navigation.title,
            "navigated"
        );
        let mut history = self.history.lock();
        if history.len() == HISTORY_LIMIT {
            history.pop_front();
        }
        history.push_back(navigation);
    }
}
