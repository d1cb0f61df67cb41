//! Command dispatch: bridges CLI args -> controller calls -> output formatting.

pub mod cameras;
pub mod config_cmd;
pub mod networks;
pub mod system;
pub mod util;
pub mod watch;

use blinkly_core::Controller;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a session-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Cameras(args) => cameras::handle(controller, args, global).await,
        Command::Networks(args) => networks::handle(controller, &args, global),
        Command::Arm(args) => system::handle_arm(controller, args, true, global).await,
        Command::Disarm(args) => system::handle_arm(controller, args, false, global).await,
        // Handled before a session is opened
        Command::Watch(_) | Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
