//! Cart engine.
//!
//! Pure operations over the ordered sequence of cart lines. Nothing here
//! touches the store; views load a [`Cart`], apply one operation and write
//! the result back.
//!
//! Invariants held by every operation:
//! - line ids are unique
//! - every line has `qty >= 1`; a decrement from one removes the line
//! - `qty` never exceeds the catalog's available stock for that product

use std::collections::HashSet;

use rust_decimal::Decimal;
use teerex_core::{CartLine, Product, ProductId};
use thiserror::Error;
use tracing::warn;

use crate::catalog::Catalog;

/// Rejected cart operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The line already holds all available stock.
    #[error("Cannot add more products. Available stock limit reached.")]
    StockLimitReached { id: ProductId, stock: u32 },

    #[error("Product {0} is not in the cart")]
    LineNotFound(ProductId),

    #[error("Product {0} is not in the catalog")]
    ProductNotFound(ProductId),
}

impl CartError {
    /// Whether the error is shown to the user as a notice.
    ///
    /// The other variants are precondition violations and are only logged.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(self, Self::StockLimitReached { .. })
    }
}

/// Result of a decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decrement {
    /// The line stays with the new quantity.
    Reduced(u32),
    /// The line held one unit and was removed.
    Removed,
}

/// Sum of `qty × cost` over `lines`; zero for no lines.
///
/// Saturates at `Decimal::MAX` instead of overflowing.
#[must_use]
pub fn compute_total(lines: &[CartLine]) -> Decimal {
    lines
        .iter()
        .map(CartLine::line_total)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Ordered cart lines with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from stored lines.
    ///
    /// Lines with `qty == 0` and repeated ids (after the first) are dropped.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let mut seen = HashSet::new();
        let lines = lines
            .into_iter()
            .filter(|line| {
                if line.qty == 0 {
                    warn!(product_id = %line.id, "Dropping cart line with zero quantity");
                    return false;
                }
                if !seen.insert(line.id) {
                    warn!(product_id = %line.id, "Dropping duplicate cart line");
                    return false;
                }
                true
            })
            .collect();
        Self { lines }
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.qty)).sum()
    }

    #[must_use]
    pub fn total(&self) -> Decimal {
        compute_total(&self.lines)
    }

    fn line_mut(&mut self, id: ProductId) -> Result<&mut CartLine, CartError> {
        self.lines
            .iter_mut()
            .find(|line| line.id == id)
            .ok_or(CartError::LineNotFound(id))
    }

    /// Add one unit of `id`, bounded by the catalog's live stock.
    ///
    /// Returns the new quantity.
    ///
    /// # Errors
    ///
    /// `StockLimitReached` if the line already holds all available stock (no
    /// mutation is made), `LineNotFound`/`ProductNotFound` if `id` is missing
    /// from the cart or the catalog.
    pub fn increment(&mut self, catalog: &Catalog, id: ProductId) -> Result<u32, CartError> {
        let stock = catalog.stock_of(id).ok_or(CartError::ProductNotFound(id))?;
        let line = self.line_mut(id)?;
        if line.qty >= stock {
            return Err(CartError::StockLimitReached { id, stock });
        }
        line.qty += 1;
        Ok(line.qty)
    }

    /// Remove one unit of `id`; a line holding one unit is removed.
    ///
    /// # Errors
    ///
    /// `LineNotFound` if `id` is not in the cart.
    pub fn decrement(&mut self, id: ProductId) -> Result<Decrement, CartError> {
        let line = self.line_mut(id)?;
        if line.qty > 1 {
            line.qty -= 1;
            return Ok(Decrement::Reduced(line.qty));
        }
        self.lines.retain(|line| line.id != id);
        Ok(Decrement::Removed)
    }

    /// Remove the line for `id`. Returns whether a line was removed; an
    /// absent id leaves the cart unchanged.
    pub fn remove_line(&mut self, id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.id != id);
        self.lines.len() != before
    }

    /// Add one unit of `product`, appending a new line if needed.
    ///
    /// Returns the line's new quantity.
    ///
    /// # Errors
    ///
    /// `StockLimitReached` if the product has no stock or the existing line
    /// already holds all of it.
    pub fn add_product(&mut self, product: &Product) -> Result<u32, CartError> {
        let stock = product.quantity;
        if let Ok(line) = self.line_mut(product.id) {
            if line.qty >= stock {
                return Err(CartError::StockLimitReached {
                    id: product.id,
                    stock,
                });
            }
            line.qty += 1;
            return Ok(line.qty);
        }

        if !product.in_stock() {
            return Err(CartError::StockLimitReached {
                id: product.id,
                stock,
            });
        }
        self.lines.push(CartLine::from_product(product));
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use teerex_core::Currency;

    use super::*;

    fn product(id: i32, cost: i64, quantity: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Tee {id}"),
            cost: Decimal::from(cost),
            image: format!("https://example.com/{id}.png"),
            quantity,
            currency: Currency::default(),
        }
    }

    fn line(id: i32, cost: i64, qty: u32) -> CartLine {
        CartLine {
            qty,
            ..CartLine::from_product(&product(id, cost, 10))
        }
    }

    #[test]
    fn test_compute_total() {
        assert_eq!(compute_total(&[]), Decimal::ZERO);
        let lines = [line(1, 500, 2), line(2, 250, 3), line(3, 1, 1)];
        assert_eq!(compute_total(&lines), Decimal::from(1751));
    }

    #[test]
    fn test_huge_quantities_do_not_overflow() {
        let cart = Cart::from_lines(vec![line(1, 2, u32::MAX), line(2, 2, u32::MAX)]);
        assert_eq!(cart.item_count(), 2 * u64::from(u32::MAX));
        assert_eq!(cart.total(), Decimal::from(4 * u64::from(u32::MAX)));

        let mut costly = line(3, 0, u32::MAX);
        costly.cost = Decimal::MAX;
        assert_eq!(compute_total(&[costly]), Decimal::MAX);
    }

    #[test]
    fn test_total_with_fractional_costs() {
        let mut first = line(1, 0, 3);
        first.cost = Decimal::new(1999, 2);
        let cart = Cart::from_lines(vec![first]);
        assert_eq!(cart.total(), Decimal::new(5997, 2));
    }

    #[test]
    fn test_increment_below_stock() {
        let catalog = Catalog::new(vec![product(1, 500, 3), product(2, 250, 5)]);
        let mut cart = Cart::from_lines(vec![line(1, 500, 1), line(2, 250, 2)]);

        assert_eq!(cart.increment(&catalog, ProductId::new(1)), Ok(2));
        assert_eq!(cart.get(ProductId::new(1)).unwrap().qty, 2);
        assert_eq!(cart.get(ProductId::new(2)).unwrap().qty, 2);
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_increment_at_stock_is_rejected() {
        let catalog = Catalog::new(vec![product(1, 500, 2)]);
        let mut cart = Cart::from_lines(vec![line(1, 500, 2)]);
        let before = cart.clone();

        let err = cart.increment(&catalog, ProductId::new(1)).unwrap_err();
        assert_eq!(
            err,
            CartError::StockLimitReached {
                id: ProductId::new(1),
                stock: 2
            }
        );
        assert!(err.is_user_facing());
        assert_eq!(
            err.to_string(),
            "Cannot add more products. Available stock limit reached."
        );
        assert_eq!(cart, before);
    }

    #[test]
    fn test_increment_after_stock_drop_is_rejected() {
        // Catalog stock fell below what the cart already holds.
        let catalog = Catalog::new(vec![product(1, 500, 1)]);
        let mut cart = Cart::from_lines(vec![line(1, 500, 3)]);

        assert!(matches!(
            cart.increment(&catalog, ProductId::new(1)),
            Err(CartError::StockLimitReached { .. })
        ));
        assert_eq!(cart.get(ProductId::new(1)).unwrap().qty, 3);
    }

    #[test]
    fn test_increment_missing_ids() {
        let catalog = Catalog::new(vec![product(1, 500, 2)]);
        let mut cart = Cart::from_lines(vec![line(2, 500, 1)]);

        assert_eq!(
            cart.increment(&catalog, ProductId::new(1)),
            Err(CartError::LineNotFound(ProductId::new(1)))
        );
        assert_eq!(
            cart.increment(&catalog, ProductId::new(2)),
            Err(CartError::ProductNotFound(ProductId::new(2)))
        );
        assert!(!CartError::LineNotFound(ProductId::new(1)).is_user_facing());
    }

    #[test]
    fn test_decrement_reduces_quantity() {
        let mut cart = Cart::from_lines(vec![line(1, 500, 3), line(2, 250, 1)]);

        assert_eq!(cart.decrement(ProductId::new(1)), Ok(Decrement::Reduced(2)));
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().qty, 2);
    }

    #[test]
    fn test_decrement_last_unit_removes_line() {
        let mut cart = Cart::from_lines(vec![line(1, 500, 3), line(2, 250, 1)]);

        assert_eq!(cart.decrement(ProductId::new(2)), Ok(Decrement::Removed));
        assert_eq!(cart.len(), 1);
        assert!(cart.get(ProductId::new(2)).is_none());
    }

    #[test]
    fn test_decrement_missing_line() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.decrement(ProductId::new(9)),
            Err(CartError::LineNotFound(ProductId::new(9)))
        );
    }

    #[test]
    fn test_remove_line_is_idempotent_on_absence() {
        let mut cart = Cart::from_lines(vec![line(1, 500, 3), line(2, 250, 1)]);

        assert!(cart.remove_line(ProductId::new(1)));
        let after_first = cart.clone();
        assert!(!cart.remove_line(ProductId::new(1)));
        assert!(!cart.remove_line(ProductId::new(42)));
        assert_eq!(cart, after_first);
    }

    #[test]
    fn test_remove_line_keeps_order() {
        let mut cart = Cart::from_lines(vec![line(1, 1, 1), line(2, 1, 1), line(3, 1, 1)]);
        cart.remove_line(ProductId::new(2));
        let ids: Vec<_> = cart.lines().iter().map(|l| l.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_from_lines_normalizes() {
        let cart = Cart::from_lines(vec![
            line(1, 500, 1),
            line(2, 250, 0),
            line(1, 500, 4),
            line(3, 100, 2),
        ]);
        let ids: Vec<_> = cart.lines().iter().map(|l| (l.id.as_i32(), l.qty)).collect();
        assert_eq!(ids, vec![(1, 1), (3, 2)]);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_add_product() {
        let tee = product(1, 500, 2);
        let mut cart = Cart::new();

        assert_eq!(cart.add_product(&tee), Ok(1));
        assert_eq!(cart.add_product(&tee), Ok(2));
        assert!(matches!(
            cart.add_product(&tee),
            Err(CartError::StockLimitReached { stock: 2, .. })
        ));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(tee.id).unwrap().qty, 2);
    }

    #[test]
    fn test_add_out_of_stock_product() {
        let mut cart = Cart::new();
        assert!(cart.add_product(&product(5, 500, 0)).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_end_to_end_quantity_walk() {
        let catalog = Catalog::new(vec![product(1, 500, 2)]);
        let mut cart = Cart::from_lines(vec![line(1, 500, 2)]);
        let id = ProductId::new(1);

        assert!(cart.increment(&catalog, id).is_err());
        assert_eq!(cart.get(id).unwrap().qty, 2);

        assert_eq!(cart.decrement(id), Ok(Decrement::Reduced(1)));
        assert_eq!(cart.decrement(id), Ok(Decrement::Removed));
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }
}
