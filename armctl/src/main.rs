//--------------------------------------------------------------------------
// (C) Copyright Travis Sharp <travis@kuipersys.com>.  All rights reserved.
//--------------------------------------------------------------------------

mod cmd;
mod formatter;
mod logging;
mod version;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use cmd::Cli;

fn run(cli: Cli) -> anyhow::Result<()> {
    let verb = cli.command.name();
    tracing::info!(command = verb, "executing command");

    let result = cli.command.execute()
        .with_context(|| format!("Failed to execute '{}'", verb))?;

    formatter::print_output(&result, cli.output, cli.pretty)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.log_level.as_deref());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error executing command: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
