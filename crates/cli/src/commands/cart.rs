use std::io::Write;

use teerex_core::{ProductId, Route};
use teerex_storefront::CartView;

use super::{Session, write_page, write_thanks};
use crate::error::CliError;

pub fn show(session: &Session, out: &mut impl Write) -> Result<(), CliError> {
    write_page(out, &session.cart().render()?)
}

pub fn increment(session: &Session, id: ProductId, out: &mut impl Write) -> Result<(), CliError> {
    line_intent(session, out, |view| view.increment(id))
}

pub fn decrement(session: &Session, id: ProductId, out: &mut impl Write) -> Result<(), CliError> {
    line_intent(session, out, |view| view.decrement(id))
}

pub fn remove(session: &Session, id: ProductId, out: &mut impl Write) -> Result<(), CliError> {
    line_intent(session, out, |view| view.remove(id))
}

fn line_intent(
    session: &Session,
    out: &mut impl Write,
    intent: impl FnOnce(&mut CartView) -> teerex_storefront::Result<()>,
) -> Result<(), CliError> {
    let mut view = session.cart();
    let result = intent(&mut view);
    write_page(out, &view.render()?)?;
    result.map_err(CliError::from)
}

pub fn checkout(session: &mut Session, address: String, out: &mut impl Write) -> Result<(), CliError> {
    let mut view = session.cart();
    view.set_address(address);

    match view.checkout(&mut session.nav) {
        Ok(()) if session.nav.current() == Route::Confirmation => write_thanks(out),
        Ok(()) => write_page(out, &view.render()?),
        Err(e) => {
            write_page(out, &view.render()?)?;
            Err(e.into())
        }
    }
}
