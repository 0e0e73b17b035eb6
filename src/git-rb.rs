use anyhow::Result;
use clap::Parser;

use git_bak::restore;

#[derive(Parser)]
#[command(name = "git-rb")]
#[command(about = "Restore a repository from a bundle (shortcut for git bak restore)")]
struct Cli {
    /// Specific bundle file to restore from
    bundle_file: Option<String>,

    /// Directory to restore into (defaults to a name derived from the bundle file)
    #[arg(short, long)]
    directory: Option<String>,

    /// Restore into a non-empty directory without prompting
    #[arg(short, long)]
    force: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    restore::run(cli.bundle_file, cli.directory, cli.force)?;
    Ok(())
}
