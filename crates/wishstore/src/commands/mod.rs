//! Command dispatch: bridges CLI args -> storefront view-models -> output.

pub mod config_cmd;
pub mod routes;
pub mod users;
pub mod util;
pub mod wishes;
pub mod wishlists;

use wishstore_core::Storefront;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    store: &Storefront,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Wishlists(args) => wishlists::handle(store, args, global).await,
        Command::Wishes(args) => wishes::handle(store, args, global).await,
        Command::Users(args) => users::handle(store, args, global).await,
        // Handled before a connection is made
        Command::Routes(_) | Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
