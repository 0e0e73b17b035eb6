use anyhow::Result;
use crate::command_utils::execute_command;
use crate::error::BakError;

pub struct Config {
    pub backup_dir: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let backup_dir = get_git_config("bak.backup-dir")?;

        Ok(Config { backup_dir })
    }
}

fn get_git_config(key: &str) -> Result<Option<String>> {
    let output = execute_command("git", &["config", "--get", key])?;

    if output.status.success() {
        let value = String::from_utf8(output.stdout)?
            .trim()
            .to_string();
        Ok(if value.is_empty() { None } else { Some(value) })
    } else {
        Ok(None)
    }
}

/// Name of the repository the current directory belongs to, taken from the
/// last component of the working tree path.
pub fn get_repo_name() -> Result<String> {
    let output = execute_command("git", &["rev-parse", "--show-toplevel"])?;

    if !output.status.success() {
        return Err(BakError::NotAGitRepo.into());
    }

    let toplevel = String::from_utf8(output.stdout)?
        .trim()
        .to_string();

    let repo_name = std::path::Path::new(&toplevel)
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| BakError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "Cannot determine repository name from working tree path"
        )))?;

    Ok(repo_name.to_string())
}

/// Committer timestamp of the newest commit as a unix epoch.
pub fn get_latest_commit_epoch() -> Result<i64> {
    let output = execute_command("git", &["log", "-1", "--format=%ct"])?;

    if !output.status.success() {
        return Err(BakError::NoCommits.into());
    }

    let epoch = String::from_utf8(output.stdout)?
        .trim()
        .parse::<i64>()
        .map_err(|_| BakError::NoCommits)?;

    Ok(epoch)
}

pub fn check_git_repo() -> Result<()> {
    let output = execute_command("git", &["rev-parse", "--git-dir"])?;

    if !output.status.success() {
        return Err(BakError::NotAGitRepo.into());
    }

    Ok(())
}
