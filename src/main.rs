use anyhow::Result;
use clap::{Parser, Subcommand};

use git_bak::{backup, restore};

#[derive(Parser)]
#[command(name = "git-bak")]
#[command(about = "Back up and restore a git repository as a single bundle file")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(alias = "b")]
    Backup {
        /// Directory to write the bundle to (defaults to bak.backup-dir or the current directory)
        #[arg(short, long)]
        output_dir: Option<String>,
    },
    #[command(alias = "r")]
    Restore {
        /// Specific bundle file to restore from
        bundle_file: Option<String>,

        /// Directory to restore into (defaults to a name derived from the bundle file)
        #[arg(short, long)]
        directory: Option<String>,

        /// Restore into a non-empty directory without prompting
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Backup { output_dir } => {
            backup::run(output_dir)?;
        }
        Commands::Restore {
            bundle_file,
            directory,
            force,
        } => {
            restore::run(bundle_file, directory, force)?;
        }
    }

    Ok(())
}
