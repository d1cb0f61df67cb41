//! Network command handlers.

use tabled::Tabled;

use blinkly_core::{Controller, Network};

use crate::cli::{GlobalOpts, NetworksArgs, NetworksCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
pub(super) struct NetworkRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Armed")]
    armed: String,
}

impl From<&Network> for NetworkRow {
    fn from(n: &Network) -> Self {
        Self {
            id: n.id,
            name: n.name.clone(),
            armed: output::flag(n.armed, false),
        }
    }
}

pub fn handle(
    controller: &Controller,
    args: &NetworksArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        NetworksCommand::List => {
            let networks = controller.networks_snapshot();
            let out = output::render_list(
                &global.output,
                networks.as_slice(),
                |n| NetworkRow::from(n),
                |n| n.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
