use std::path::Path;
use std::process::{Command, Output};
use log::debug;
use anyhow::Result;

/// Execute a command in the current directory with debug logging
pub fn execute_command(cmd: &str, args: &[&str]) -> Result<Output> {
    run(Command::new(cmd).args(args), cmd, args)
}

/// Execute a command with a given working directory with debug logging
pub fn execute_command_in(cmd: &str, args: &[&str], dir: &Path) -> Result<Output> {
    run(Command::new(cmd).args(args).current_dir(dir), cmd, args)
}

fn run(command: &mut Command, cmd: &str, args: &[&str]) -> Result<Output> {
    debug!("Executing command: {} {}", cmd, args.join(" "));

    let output = command.output()?;

    if output.status.success() {
        debug!("Command succeeded: {} {}", cmd, args.join(" "));
    } else {
        debug!(
            "Command failed: {} {} (exit code: {:?})",
            cmd,
            args.join(" "),
            output.status.code()
        );
    }
    if !output.stdout.is_empty() {
        debug!("stdout: {}", String::from_utf8_lossy(&output.stdout).trim());
    }
    if !output.stderr.is_empty() {
        debug!("stderr: {}", String::from_utf8_lossy(&output.stderr).trim());
    }

    Ok(output)
}
