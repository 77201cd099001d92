//! "Cart changed" event channel.
//!
//! Every view that writes the cart key emits a [`CartEvent`] after the write
//! lands. Views that render the cart subscribe and re-read the store when
//! events are pending, instead of being called back by the writer.

use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, warn};

use teerex_core::ProductId;

const DEFAULT_CAPACITY: usize = 64;

/// What happened to a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineChange {
    Added,
    Incremented,
    Decremented,
    Removed,
}

/// A change to the persisted cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartEvent {
    Line {
        product_id: ProductId,
        change: LineChange,
    },
    /// Every key was reset after a checkout.
    Cleared,
    /// The subscriber missed events and must re-read the store.
    Resync,
}

/// Sending half of the cart event channel. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CartEvents {
    sender: broadcast::Sender<CartEvent>,
}

impl Default for CartEvents {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl CartEvents {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    #[must_use]
    pub fn subscribe(&self) -> CartSubscription {
        CartSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Publish `event`. Having no subscribers is not an error.
    pub fn emit(&self, event: CartEvent) {
        match self.sender.send(event) {
            Ok(receivers) => debug!(?event, receivers, "Cart event emitted"),
            Err(_) => debug!(?event, "Cart event emitted with no subscribers"),
        }
    }
}

/// Receiving half held by a view.
#[derive(Debug)]
pub struct CartSubscription {
    receiver: broadcast::Receiver<CartEvent>,
}

impl CartSubscription {
    /// Take every pending event without waiting.
    ///
    /// A lagged receiver yields a single [`CartEvent::Resync`] in place of
    /// the events it missed.
    pub fn drain(&mut self) -> Vec<CartEvent> {
        let mut events = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Lagged(missed)) => {
                    warn!(missed, "Cart subscriber lagged");
                    events.push(CartEvent::Resync);
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        events
    }
}
