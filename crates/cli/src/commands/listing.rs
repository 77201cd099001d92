use std::io::Write;

use teerex_core::ProductId;

use super::{Session, write_page};
use crate::error::CliError;

pub fn show(session: &Session, out: &mut impl Write) -> Result<(), CliError> {
    write_page(out, &session.listing().render()?)
}

pub fn add(session: &Session, id: ProductId, out: &mut impl Write) -> Result<(), CliError> {
    let listing = session.listing();
    let result = listing.add_to_cart(id);
    write_page(out, &listing.render()?)?;
    result.map(|_| ()).map_err(CliError::from)
}
