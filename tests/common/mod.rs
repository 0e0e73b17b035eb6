use std::path::Path;
use std::process::Command as StdCommand;

#[allow(dead_code)]
pub fn setup_test_git_repo(dir: &Path) {
    StdCommand::new("git")
        .args(["init"])
        .current_dir(dir)
        .output()
        .expect("Failed to init git repo");

    StdCommand::new("git")
        .args(["config", "user.name", "Test User"])
        .current_dir(dir)
        .output()
        .expect("Failed to set git user.name");

    StdCommand::new("git")
        .args(["config", "user.email", "test@example.com"])
        .current_dir(dir)
        .output()
        .expect("Failed to set git user.email");

    std::fs::write(dir.join("README.md"), "# Test Repo").unwrap();
    StdCommand::new("git")
        .args(["add", "README.md"])
        .current_dir(dir)
        .output()
        .expect("Failed to add file");

    StdCommand::new("git")
        .args(["commit", "-m", "Initial commit"])
        .current_dir(dir)
        .output()
        .expect("Failed to commit");
}

/// Create a branch off the current HEAD with one distinct commit, then
/// return to the branch that was checked out before.
#[allow(dead_code)]
pub fn add_branch_with_commit(dir: &Path, branch: &str) {
    let previous = current_branch(dir);

    StdCommand::new("git")
        .args(["checkout", "-b", branch])
        .current_dir(dir)
        .output()
        .unwrap_or_else(|_| panic!("Failed to create branch {}", branch));

    let file_name = format!("{}.txt", branch.replace('/', "-"));
    std::fs::write(dir.join(&file_name), format!("Content for {}", branch)).unwrap();

    StdCommand::new("git")
        .args(["add", &file_name])
        .current_dir(dir)
        .output()
        .expect("Failed to add file");

    StdCommand::new("git")
        .args(["commit", "-m", &format!("Add {}", branch)])
        .current_dir(dir)
        .output()
        .expect("Failed to commit");

    StdCommand::new("git")
        .args(["checkout", &previous])
        .current_dir(dir)
        .output()
        .expect("Failed to return to previous branch");
}

#[allow(dead_code)]
pub fn current_branch(dir: &Path) -> String {
    let output = StdCommand::new("git")
        .args(["rev-parse", "--abbrev-ref", "HEAD"])
        .current_dir(dir)
        .output()
        .expect("Failed to get current branch");

    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

/// Short names of all local branches, sorted.
#[allow(dead_code)]
pub fn branch_names(dir: &Path) -> Vec<String> {
    let output = StdCommand::new("git")
        .args(["for-each-ref", "--format=%(refname:short)", "refs/heads"])
        .current_dir(dir)
        .output()
        .expect("Failed to list branches");

    let mut names: Vec<String> = String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();
    names.sort();
    names
}
