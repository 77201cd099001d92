//! Navigation shell.
//!
//! Tracks which of the three pages is active. Pages exchange no parameters;
//! everything they share goes through the store.

use teerex_core::Route;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct Navigator {
    current: Route,
}

impl Navigator {
    #[must_use]
    pub const fn new(start: Route) -> Self {
        Self { current: start }
    }

    #[must_use]
    pub const fn current(&self) -> Route {
        self.current
    }

    pub fn navigate(&mut self, route: Route) {
        if route == self.current {
            return;
        }
        info!(from = %self.current, to = %route, path = route.path(), "Navigating");
        self.current = route;
    }
}
