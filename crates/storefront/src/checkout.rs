//! Checkout validation.
//!
//! Rules are checked in order and the first failure wins:
//! 1. the cart holds at least one line
//! 2. the address is not empty
//! 3. the address is at least [`MIN_ADDRESS_CHARS`] characters long

use thiserror::Error;

use crate::cart::Cart;

/// Minimum delivery address length, counted in characters.
pub const MIN_ADDRESS_CHARS: usize = 20;

/// Why a checkout was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Add at least one product to cart to checkout")]
    EmptyCart,

    #[error("Enter a valid address")]
    MissingAddress,

    #[error("Address should be at least {min} characters", min = MIN_ADDRESS_CHARS)]
    AddressTooShort { length: usize },
}

/// Validate a checkout attempt.
///
/// # Errors
///
/// Returns the first rule the attempt violates.
pub fn validate_checkout(cart: &Cart, address: &str) -> Result<(), CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    if address.is_empty() {
        return Err(CheckoutError::MissingAddress);
    }
    let length = address.chars().count();
    if length < MIN_ADDRESS_CHARS {
        return Err(CheckoutError::AddressTooShort { length });
    }
    Ok(())
}
