mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

use clap::{CommandFactory, Parser};
use tracing::{debug, error};

use ctools_core::Session;

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::error::{CliError, exit_code};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    let config = config::load_config();

    let log_dir = cli
        .global
        .log_dir
        .clone()
        .or_else(|| config.as_ref().ok().and_then(|c| c.defaults.log_dir.clone()))
        .unwrap_or_else(config::default_log_dir);
    let guard = logging::init(cli.global.verbose, cli.global.quiet, &log_dir);

    let code = match run(cli, config).await {
        Ok(()) => exit_code::SUCCESS,
        Err(err) => {
            error!(error = %err, "ctools failed");
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
    };

    // Flush the file writer; `exit` skips destructors.
    drop(guard);
    std::process::exit(code);
}

async fn run(cli: Cli, config: Result<Config, CliError>) -> Result<(), CliError> {
    let Cli { global, command } = cli;

    if let Command::Completions(args) = &command {
        let mut cmd = Cli::command();
        clap_complete::generate(args.shell, &mut cmd, "ctools", &mut std::io::stdout());
        return Ok(());
    }

    let config = config?;
    let task = commands::build_task(command, &global)?;
    let session_config = config::resolve_session(&global, &config)?;

    debug!(task = %task, portal = %session_config.url, "dispatching task");
    let username = session_config.username.as_str();
    let session = Session::login(&session_config)
        .await
        .map_err(|e| CliError::from_core(e, username))?;
    let outcome = ctools_core::dispatch(session, task)
        .await
        .map_err(|e| CliError::from_core(e, username))?;

    commands::report(&outcome, &global)
}
