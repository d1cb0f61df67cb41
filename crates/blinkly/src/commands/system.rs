//! Arm and disarm handlers.

use blinkly_core::Controller;

use crate::cli::{ArmArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::networks::NetworkRow;
use super::util;

pub async fn handle_arm(
    controller: &Controller,
    args: ArmArgs,
    armed: bool,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let target = args.network.as_deref().unwrap_or("all selected networks");
    if !armed && !util::confirm(&format!("Disarm {target}?"), global.yes)? {
        return Ok(());
    }

    let changed = controller.set_armed(args.network.as_deref(), armed).await?;
    let out = output::render_list(
        &global.output,
        &changed,
        |n| NetworkRow::from(n),
        |n| n.id.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
