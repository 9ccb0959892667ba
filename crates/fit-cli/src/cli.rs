use std::path::PathBuf;

use clap::Parser;

/// Personal fitness logging from the command line.
#[derive(Debug, Parser)]
#[command(name = "fitlog", version, about)]
pub struct Cli {
    /// Directory holding the saved data (overrides config).
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Log in as this user instead of the saved display name.
    #[arg(long)]
    pub user: Option<String>,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_overrides() {
        let cli = Cli::parse_from(["fitlog", "--data-dir", "/tmp/fit", "--user", "Mai"]);
        assert_eq!(cli.data_dir.as_deref(), Some(std::path::Path::new("/tmp/fit")));
        assert_eq!(cli.user.as_deref(), Some("Mai"));
        assert!(!cli.verbose);
    }
}
