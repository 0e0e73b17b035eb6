use crate::command_utils::execute_command;
use crate::config::{check_git_repo, get_latest_commit_epoch, get_repo_name, Config};
use crate::error::BakError;
use anyhow::{Context, Result};
use chrono::{Local, TimeZone};
use std::fs;
use std::path::Path;

pub fn run(output_dir: Option<String>) -> Result<()> {
    check_git_repo()?;

    let config = Config::load()?;
    let repo_name = get_repo_name()?;
    let epoch = get_latest_commit_epoch()?;
    let timestamp = format_commit_timestamp(epoch)?;
    let bundle_filename = format_bundle_filename(&repo_name, &timestamp);

    let target_dir = output_dir
        .or(config.backup_dir)
        .unwrap_or_else(|| ".".to_string());
    fs::create_dir_all(&target_dir)
        .with_context(|| format!("Failed to create output directory {}", target_dir))?;
    let bundle_path = Path::new(&target_dir).join(&bundle_filename);

    println!("Backing up repository '{}'...", repo_name);

    create_bundle(&bundle_path)?;

    println!("Created bundle {}", bundle_path.display());

    Ok(())
}

fn format_commit_timestamp(epoch: i64) -> Result<String> {
    let timestamp = Local
        .timestamp_opt(epoch, 0)
        .single()
        .with_context(|| format!("Invalid commit timestamp: {}", epoch))?;

    // Colons are not portable in file names, so the time part uses dashes
    Ok(timestamp.format("%Y-%m-%dT%H-%M-%S").to_string())
}

fn format_bundle_filename(repo_name: &str, timestamp: &str) -> String {
    // Sanitize repository name for filename (replace / with -)
    let safe_repo_name = repo_name.replace('/', "-");
    format!("{}_{}.bundle", safe_repo_name, timestamp)
}

fn create_bundle(bundle_path: &Path) -> Result<()> {
    let bundle_str = bundle_path
        .to_str()
        .context("Bundle path is not valid UTF-8")?;
    let output = execute_command("git", &["bundle", "create", bundle_str, "--all"])?;

    if !output.status.success() {
        let error_msg = String::from_utf8_lossy(&output.stderr);
        return Err(BakError::GitCommandFailed {
            message: format!("Bundle creation failed: {}", error_msg),
        }
        .into());
    }

    Ok(())
}
