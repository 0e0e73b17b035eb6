use thiserror::Error;

#[derive(Error, Debug)]
pub enum BakError {
    #[error("Not in a git repository")]
    NotAGitRepo,

    #[error("Repository has no commits")]
    NoCommits,

    #[error("No bundle files found in {path}")]
    NoBundlesFound { path: String },

    #[error("Bundle verification failed")]
    BundleVerificationFailed,

    #[error("Bundle contains no branches")]
    EmptyBundle,

    #[error("Git command failed: {message}")]
    GitCommandFailed { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cancelled by user")]
    Cancelled,
}
