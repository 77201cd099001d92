use teerex_core::{CartLine, Currency, Price, ProductId};
use tracing::{debug, instrument, warn};

use super::pages::CartRow;
use super::{load_cart, save_cart};
use crate::cart::{CartError, Decrement};
use crate::catalog::Catalog;
use crate::error::Result;
use crate::events::{CartEvent, CartEvents, LineChange};
use crate::notice::NoticeBoard;
use crate::store::SharedStore;

/// One rendered cart line.
///
/// The line is a snapshot taken when the owning [`CartView`](super::CartView)
/// last refreshed. Intents act on the stored cart, not on the snapshot.
#[derive(Debug, Clone)]
pub struct CartItemView {
    line: CartLine,
    store: SharedStore,
    events: CartEvents,
    notice: NoticeBoard,
}

impl CartItemView {
    pub(super) const fn new(
        line: CartLine,
        store: SharedStore,
        events: CartEvents,
        notice: NoticeBoard,
    ) -> Self {
        Self {
            line,
            store,
            events,
            notice,
        }
    }

    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.line.id
    }

    /// Notice area of this line (stock limit messages).
    #[must_use]
    pub const fn notice(&self) -> &NoticeBoard {
        &self.notice
    }

    /// Add one unit, up to the catalog's available stock.
    ///
    /// # Errors
    ///
    /// `StockLimitReached` (also shown as a notice) when the line holds all
    /// available stock, or a store error.
    #[instrument(skip(self), fields(product_id = %self.line.id))]
    pub fn increment(&self) -> Result<()> {
        let catalog = Catalog::load(self.store.as_ref())?;
        let mut cart = load_cart(self.store.as_ref())?;

        match cart.increment(&catalog, self.line.id) {
            Ok(qty) => debug!(qty, "Quantity incremented"),
            Err(err) => return Err(self.reject(err)),
        }

        save_cart(self.store.as_ref(), &cart)?;
        self.emit(LineChange::Incremented);
        Ok(())
    }

    /// Remove one unit; the last unit removes the line.
    ///
    /// # Errors
    ///
    /// `LineNotFound` if the line is no longer stored, or a store error.
    #[instrument(skip(self), fields(product_id = %self.line.id))]
    pub fn decrement(&self) -> Result<()> {
        let mut cart = load_cart(self.store.as_ref())?;

        let change = match cart.decrement(self.line.id) {
            Ok(Decrement::Reduced(qty)) => {
                debug!(qty, "Quantity decremented");
                LineChange::Decremented
            }
            Ok(Decrement::Removed) => {
                debug!("Last unit removed");
                LineChange::Removed
            }
            Err(err) => return Err(self.reject(err)),
        };

        save_cart(self.store.as_ref(), &cart)?;
        self.emit(change);
        Ok(())
    }

    /// Remove the line. Removing a line that is already gone is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a store error if the cart cannot be read or written.
    #[instrument(skip(self), fields(product_id = %self.line.id))]
    pub fn delete(&self) -> Result<()> {
        let mut cart = load_cart(self.store.as_ref())?;
        if !cart.remove_line(self.line.id) {
            debug!("Line already absent");
            return Ok(());
        }

        save_cart(self.store.as_ref(), &cart)?;
        self.emit(LineChange::Removed);
        Ok(())
    }

    /// Render data for this line.
    #[must_use]
    pub fn row(&self, fallback_currency: &Currency) -> CartRow {
        let currency = self
            .line
            .currency
            .clone()
            .unwrap_or_else(|| fallback_currency.clone());
        CartRow {
            id: self.line.id,
            name: self.line.name.clone(),
            image: self.line.image.clone(),
            price: Price::new(self.line.cost, currency.clone()).to_string(),
            qty: self.line.qty,
            line_total: Price::new(self.line.line_total(), currency).to_string(),
            notice: self.notice.message(),
        }
    }

    fn emit(&self, change: LineChange) {
        self.events.emit(CartEvent::Line {
            product_id: self.line.id,
            change,
        });
    }

    fn reject(&self, err: CartError) -> crate::error::AppError {
        if err.is_user_facing() {
            debug!(error = %err, "Intent rejected");
            self.notice.show(err.to_string());
        } else {
            warn!(error = %err, "Intent on missing cart line or product");
        }
        err.into()
    }
}
