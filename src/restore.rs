use crate::command_utils::execute_command_in;
use crate::config::Config;
use crate::error::BakError;
use anyhow::{Context, Result};
use dialoguer::Confirm;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Name of the temporary remote the bundle is fetched through. It only
/// exists for the duration of a single restore run.
const RESTORE_REMOTE: &str = "bundle-restore";

#[derive(Debug)]
struct BundleHead {
    oid: String,
    branch: String,
}

pub fn run(bundle_file: Option<String>, directory: Option<String>, force: bool) -> Result<()> {
    let config = Config::load()?;

    let bundle_path = match bundle_file {
        Some(file) => PathBuf::from(file),
        None => {
            let search_dir = config.backup_dir.unwrap_or_else(|| ".".to_string());
            find_latest_bundle(&search_dir)?
        }
    };

    // Git runs from the target directory later, so the bundle path must
    // survive the change of working directory.
    let bundle_path = fs::canonicalize(&bundle_path)
        .with_context(|| format!("Cannot access bundle file {}", bundle_path.display()))?;

    println!("Restoring from bundle: {}", bundle_path.display());

    let target_dir = match directory {
        Some(dir) => PathBuf::from(dir),
        None => default_target_dir(&bundle_path),
    };
    prepare_target_dir(&target_dir, force)?;

    // git refuses to verify or list a bundle outside of a repository, so
    // the target repository is initialized first
    init_repository(&target_dir)?;

    verify_bundle(&target_dir, &bundle_path)?;

    let (heads, head_oid) = list_bundle_heads(&target_dir, &bundle_path)?;
    if heads.is_empty() {
        return Err(BakError::EmptyBundle.into());
    }
    println!(
        "Bundle contains {} branch{}",
        heads.len(),
        if heads.len() == 1 { "" } else { "es" }
    );

    fetch_bundle(&target_dir, &bundle_path)?;

    // The branch left checked out is created via checkout -b so it also
    // works when it shares its name with the unborn branch git init leaves
    // HEAD on
    let checkout = select_checkout_branch(&heads, head_oid.as_deref());
    checkout_new_branch(&target_dir, checkout)?;

    for head in &heads {
        if head.branch != checkout {
            create_branch(&target_dir, &head.branch)?;
        }
    }

    remove_restore_remote(&target_dir)?;

    println!(
        "Successfully restored '{}' with {} branch{}",
        target_dir.display(),
        heads.len(),
        if heads.len() == 1 { "" } else { "es" }
    );

    Ok(())
}

fn find_latest_bundle(dir_path: &str) -> Result<PathBuf> {
    let path = Path::new(dir_path);

    if !path.exists() {
        return Err(BakError::NoBundlesFound {
            path: dir_path.to_string(),
        }
        .into());
    }

    let mut bundles = Vec::new();

    for entry in WalkDir::new(path).max_depth(1) {
        let entry = entry?;
        if entry.file_type().is_file() {
            if let Some(ext) = entry.path().extension() {
                if ext == "bundle" {
                    bundles.push(entry.into_path());
                }
            }
        }
    }

    if bundles.is_empty() {
        return Err(BakError::NoBundlesFound {
            path: dir_path.to_string(),
        }
        .into());
    }

    // Sort by modification time (newest first)
    bundles.sort_by_key(|path| {
        fs::metadata(path)
            .and_then(|m| m.modified())
            .unwrap_or(std::time::UNIX_EPOCH)
    });
    bundles.reverse();

    Ok(bundles[0].clone())
}

fn verify_bundle(target_dir: &Path, bundle_path: &Path) -> Result<()> {
    let bundle_str = bundle_path
        .to_str()
        .context("Bundle path is not valid UTF-8")?;
    let output = execute_command_in("git", &["bundle", "verify", bundle_str], target_dir)?;

    if !output.status.success() {
        let error_msg = String::from_utf8_lossy(&output.stderr);
        eprintln!("Bundle verification failed:");
        eprintln!("{}", error_msg);
        return Err(BakError::BundleVerificationFailed.into());
    }

    println!("Bundle verification successful");
    Ok(())
}

fn list_bundle_heads(
    target_dir: &Path,
    bundle_path: &Path,
) -> Result<(Vec<BundleHead>, Option<String>)> {
    let bundle_str = bundle_path
        .to_str()
        .context("Bundle path is not valid UTF-8")?;
    let output = execute_command_in("git", &["bundle", "list-heads", bundle_str], target_dir)?;

    if !output.status.success() {
        return Err(BakError::GitCommandFailed {
            message: "Failed to list bundle heads".to_string(),
        }
        .into());
    }

    let output_str = String::from_utf8(output.stdout)?;
    Ok(parse_bundle_heads(&output_str))
}

/// Parse `git bundle list-heads` output into branch heads plus the object id
/// the bundle's HEAD points at, if any.
///
/// Each line has the form `<oid> <refname>`; only `refs/heads/*` entries
/// count as branches.
fn parse_bundle_heads(output: &str) -> (Vec<BundleHead>, Option<String>) {
    let mut heads = Vec::new();
    let mut head_oid = None;

    for line in output.lines() {
        let mut parts = line.split_whitespace();
        let (oid, refname) = match (parts.next(), parts.next()) {
            (Some(oid), Some(refname)) => (oid, refname),
            _ => continue,
        };

        if refname == "HEAD" {
            head_oid = Some(oid.to_string());
        } else if let Some(branch) = refname.strip_prefix("refs/heads/") {
            heads.push(BundleHead {
                oid: oid.to_string(),
                branch: branch.to_string(),
            });
        }
    }

    (heads, head_oid)
}

/// Directory a bundle restores into when none is given: the repository-name
/// part of the bundle file name, i.e. everything before the trailing
/// `_<timestamp>`.
fn default_target_dir(bundle_path: &Path) -> PathBuf {
    let stem = bundle_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("restored");

    match stem.rsplit_once('_') {
        Some((repo_name, _)) if !repo_name.is_empty() => PathBuf::from(repo_name),
        _ => PathBuf::from(stem),
    }
}

fn prepare_target_dir(target_dir: &Path, force: bool) -> Result<()> {
    let occupied = target_dir.exists() && fs::read_dir(target_dir)?.next().is_some();

    confirm_overwrite(occupied, force, || {
        let confirm = Confirm::new()
            .with_prompt(format!(
                "Directory '{}' is not empty. Restore into it anyway?",
                target_dir.display()
            ))
            .default(false)
            .interact()?;
        Ok(confirm)
    })?;

    if !occupied {
        fs::create_dir_all(target_dir).with_context(|| {
            format!("Failed to create target directory {}", target_dir.display())
        })?;
    }

    Ok(())
}

/// Decide whether restoring into an occupied directory may proceed. The
/// prompt is only consulted when the directory is occupied and `--force`
/// was not given; a declined prompt cancels the restore.
fn confirm_overwrite(
    occupied: bool,
    force: bool,
    prompt: impl FnOnce() -> Result<bool>,
) -> Result<()> {
    if occupied && !force && !prompt()? {
        return Err(BakError::Cancelled.into());
    }

    Ok(())
}

fn init_repository(target_dir: &Path) -> Result<()> {
    let output = execute_command_in("git", &["init"], target_dir)?;

    if !output.status.success() {
        let error_msg = String::from_utf8_lossy(&output.stderr);
        return Err(BakError::GitCommandFailed {
            message: format!("Failed to initialize repository: {}", error_msg),
        }
        .into());
    }

    Ok(())
}

fn fetch_bundle(target_dir: &Path, bundle_path: &Path) -> Result<()> {
    let bundle_str = bundle_path
        .to_str()
        .context("Bundle path is not valid UTF-8")?;

    let output = execute_command_in(
        "git",
        &["remote", "add", RESTORE_REMOTE, bundle_str],
        target_dir,
    )?;
    if !output.status.success() {
        let error_msg = String::from_utf8_lossy(&output.stderr);
        return Err(BakError::GitCommandFailed {
            message: format!("Failed to add bundle remote: {}", error_msg),
        }
        .into());
    }

    let output = execute_command_in("git", &["fetch", RESTORE_REMOTE], target_dir)?;
    if !output.status.success() {
        let error_msg = String::from_utf8_lossy(&output.stderr);
        return Err(BakError::GitCommandFailed {
            message: format!("Failed to fetch from bundle: {}", error_msg),
        }
        .into());
    }

    Ok(())
}

fn create_branch(target_dir: &Path, branch: &str) -> Result<()> {
    // --no-track keeps the branch from pointing at a remote that is removed
    // at the end of the restore
    let start_point = format!("{}/{}", RESTORE_REMOTE, branch);
    let output = execute_command_in(
        "git",
        &["branch", "--no-track", branch, &start_point],
        target_dir,
    )?;

    if !output.status.success() {
        let error_msg = String::from_utf8_lossy(&output.stderr);
        return Err(BakError::GitCommandFailed {
            message: format!("Failed to create branch '{}': {}", branch, error_msg),
        }
        .into());
    }

    println!("Restored branch '{}'", branch);
    Ok(())
}

/// Pick the branch to leave checked out: the branch the bundle HEAD points
/// at, then `main`, then `master`, then whatever came first.
fn select_checkout_branch<'a>(heads: &'a [BundleHead], head_oid: Option<&str>) -> &'a str {
    if let Some(oid) = head_oid {
        if let Some(head) = heads.iter().find(|h| h.oid == oid) {
            return &head.branch;
        }
    }

    for candidate in ["main", "master"] {
        if let Some(head) = heads.iter().find(|h| h.branch == candidate) {
            return &head.branch;
        }
    }

    &heads[0].branch
}

fn checkout_new_branch(target_dir: &Path, branch: &str) -> Result<()> {
    let start_point = format!("{}/{}", RESTORE_REMOTE, branch);
    let output = execute_command_in(
        "git",
        &["checkout", "--no-track", "-b", branch, &start_point],
        target_dir,
    )?;

    if !output.status.success() {
        let error_msg = String::from_utf8_lossy(&output.stderr);
        return Err(BakError::GitCommandFailed {
            message: format!("Failed to check out branch '{}': {}", branch, error_msg),
        }
        .into());
    }

    println!("Restored branch '{}'", branch);
    Ok(())
}

fn remove_restore_remote(target_dir: &Path) -> Result<()> {
    let output = execute_command_in("git", &["remote", "remove", RESTORE_REMOTE], target_dir)?;

    if !output.status.success() {
        let error_msg = String::from_utf8_lossy(&output.stderr);
        return Err(BakError::GitCommandFailed {
            message: format!("Failed to remove bundle remote: {}", error_msg),
        }
        .into());
    }

    Ok(())
}
