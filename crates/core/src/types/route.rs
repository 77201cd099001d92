//! Logical routes of the store.

use serde::{Deserialize, Serialize};

/// The three pages of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Product listing.
    #[default]
    Listing,
    Cart,
    /// Thank-you page shown after a successful checkout.
    Confirmation,
}

impl Route {
    /// URL path for the route.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Listing => "/",
            Self::Cart => "/cart",
            Self::Confirmation => "/thanks",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Listing => write!(f, "listing"),
            Self::Cart => write!(f, "cart"),
            Self::Confirmation => write!(f, "confirmation"),
        }
    }
}
