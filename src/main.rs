use std::error::Error as _;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use testyard::commands::run::RunArgs;
use testyard::commands::setup::SetupOptions;
use testyard::commands::{self, CommandError};
use testyard::engine::WriteEngine;
use testyard::logging::LogSink;
use testyard::project::Project;
use testyard::types::errors::exit_code_for;

#[derive(Parser)]
#[command(
    name = "testyard",
    version,
    about = "Scaffold and run unit tests for UI component projects"
)]
struct Cli {
    /// Print the command result as JSON on stdout.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Wire the project up for component unit tests and install the runner.
    Setup {
        /// Skip the final package-manager install step.
        #[arg(long)]
        skip_install: bool,
    },
    /// Run the project's component unit tests.
    Run {
        /// Attach the runner's debugger.
        #[arg(short, long)]
        debug: bool,
        /// Re-run tests on file changes.
        #[arg(short, long, conflicts_with = "debug")]
        watch: bool,
        /// Extra arguments forwarded to the runner.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        passthrough: Vec<String>,
    },
    /// Scaffold a unit test for a component module.
    Create {
        /// Path to the component's .js module.
        #[arg(short, long)]
        filepath: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();
    match dispatch(&cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            log::error!("{e}");
            let mut source = e.source();
            while let Some(cause) = source {
                log::error!("  caused by: {cause}");
                source = cause.source();
            }
            std::process::exit(exit_code_for(e.error_id()));
        }
    }
}

fn dispatch(cli: &Cli) -> Result<i32, CommandError> {
    let cwd = std::env::current_dir().map_err(|source| CommandError::Io {
        op: "resolve",
        path: PathBuf::from("."),
        source,
    })?;
    let project = Project::discover(&cwd)?;

    match &cli.command {
        Command::Setup { skip_install } => {
            let mut engine = WriteEngine::new(LogSink, LogSink);
            let options = SetupOptions {
                skip_install: *skip_install,
            };
            let result = commands::setup::run(&project, &mut engine, &options)?;
            emit_json(cli, &result);
            log::info!("{}", result.message);
            Ok(0)
        }
        Command::Run {
            debug,
            watch,
            passthrough,
        } => {
            let args = RunArgs {
                debug: *debug,
                watch: *watch,
                passthrough: passthrough.clone(),
            };
            let result = commands::run::run(&project, &args)?;
            emit_json(cli, &result);
            Ok(result.exit_code)
        }
        Command::Create { filepath } => {
            let module_path = if filepath.is_absolute() {
                filepath.clone()
            } else {
                cwd.join(filepath)
            };
            let result = commands::create::run(&project, &module_path)?;
            emit_json(cli, &result);
            Ok(0)
        }
    }
}

fn emit_json<T: serde::Serialize>(cli: &Cli, value: &T) {
    if !cli.json {
        return;
    }
    match serde_json::to_string_pretty(value) {
        Ok(rendered) => println!("{rendered}"),
        Err(e) => log::warn!("could not render result as JSON: {e}"),
    }
}
