//! Command dispatch: bridges CLI args -> console operations -> output.

pub mod config_cmd;
pub mod domains;
pub mod edit;
pub mod export;
pub mod show;
pub mod status;
pub mod util;

use nateos_core::Console;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a device-bound command to its handler.
pub async fn dispatch(cmd: Command, console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle(console, global).await,
        Command::Show(args) => show::handle(console, args, global).await,
        Command::Set(args) => edit::set(console, args, global).await,
        Command::Add(args) => edit::add(console, args, global).await,
        Command::Delete(args) => edit::delete(console, args, global).await,
        Command::Export => export::handle(console, global).await,
        // Handled before a console is built
        Command::Domains | Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
