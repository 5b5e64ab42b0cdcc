//! The `run` command: invoke the installed test runner and relay its exit
//! code.

use std::process::Command;

use serde::Serialize;

use crate::project::Project;

use super::error::CommandError;

#[derive(Clone, Debug, Default)]
pub struct RunArgs {
    /// Attach the runner's debugger.
    pub debug: bool,
    /// Re-run tests on file changes. Mutually exclusive with `debug`;
    /// the CLI enforces that before we get here.
    pub watch: bool,
    /// Extra arguments forwarded to the runner untouched.
    pub passthrough: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RunResult {
    pub message: String,
    pub exit_code: i32,
}

pub fn run(project: &Project, args: &RunArgs) -> Result<RunResult, CommandError> {
    let bin = project.runner_bin_path();
    if !bin.exists() {
        return Err(CommandError::RunnerMissing { path: bin });
    }

    let mut command = Command::new(&bin);
    if args.debug {
        command.arg("--debug");
    } else if args.watch {
        command.arg("--watch");
    }
    command.args(&args.passthrough);
    command.current_dir(project.root());

    let status = command
        .status()
        .map_err(|source| CommandError::io("spawn", &bin, source))?;
    // A signal death carries no code; report it as a plain failure.
    let exit_code = status.code().unwrap_or(1);
    log::info!("test runner finished with exit code {exit_code}");

    Ok(RunResult {
        message: format!("test run finished with exit code {exit_code}"),
        exit_code,
    })
}
