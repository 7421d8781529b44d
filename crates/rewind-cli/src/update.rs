use std::ffi::OsStr;
use std::process::Command;

use anyhow::{anyhow, Context, Result};
use rewind_core::RewindConfig;

pub(crate) fn is_elevated() -> bool {
    nix::unistd::geteuid().is_root()
}

pub(crate) fn ensure_privileged(program: &str) -> Result<()> {
    if is_elevated() {
        return Ok(());
    }
    Err(anyhow!(
        "this program must be run as root; re-run with: sudo {program}"
    ))
}

pub(crate) fn build_update_command(config: &RewindConfig, elevated: bool) -> Command {
    let mut parts = config.update_command.iter();
    let mut command = if elevated {
        Command::new(parts.next().map(String::as_str).unwrap_or("pacman"))
    } else {
        Command::new(&config.elevation_command)
    };
    command.args(parts);
    command
}

pub(crate) fn run_system_update(config: &RewindConfig) -> Result<()> {
    run_system_update_with_executor(config, is_elevated(), run_command_inherited)
}

pub(crate) fn run_system_update_with_executor<RunCommand>(
    config: &RewindConfig,
    elevated: bool,
    mut run_command_executor: RunCommand,
) -> Result<()>
where
    RunCommand: FnMut(&mut Command, &str) -> Result<()>,
{
    let mut command = build_update_command(config, elevated);
    let rendered = render_command(&command);
    tracing::info!(command = %rendered, elevated, "running system update");
    run_command_executor(&mut command, &format!("system update failed ({rendered})"))
}

fn run_command_inherited(command: &mut Command, context_message: &str) -> Result<()> {
    let status = command
        .status()
        .with_context(|| format!("{context_message}: command failed to start"))?;
    if status.success() {
        return Ok(());
    }
    Err(anyhow!("{context_message}: status={status}"))
}

pub(crate) fn render_command(command: &Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(OsStr::to_string_lossy)
        .collect::<Vec<_>>()
        .join(" ")
}
