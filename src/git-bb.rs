use anyhow::Result;
use clap::Parser;

use git_bak::backup;

#[derive(Parser)]
#[command(name = "git-bb")]
#[command(about = "Back up the current repository to a bundle (shortcut for git bak backup)")]
struct Cli {
    /// Directory to write the bundle to (defaults to bak.backup-dir or the current directory)
    #[arg(short, long)]
    output_dir: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    backup::run(cli.output_dir)?;
    Ok(())
}
