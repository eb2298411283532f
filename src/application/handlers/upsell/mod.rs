//! Upsell command handlers.
//!
//! Upsells live inside the booking document, so every handler loads the
//! booking, mutates it and writes it back in one conditional update.

mod add_upsell;
mod remove_upsell;
mod update_upsell;

pub use add_upsell::{AddUpsellCommand, AddUpsellHandler, AddUpsellResult};
pub use remove_upsell::{RemoveUpsellCommand, RemoveUpsellHandler, RemoveUpsellResult};
pub use update_upsell::{UpdateUpsellCommand, UpdateUpsellHandler, UpdateUpsellResult};
