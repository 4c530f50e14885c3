//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// LLM-backed writing assistant relay.
#[derive(Debug, Parser)]
#[command(name = "draftpilot", version, about)]
pub struct Cli {
    /// Bind host (overrides the config file)
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (overrides the config file)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["draftpilot"]);
        assert!(cli.host.is_none());
        assert!(cli.port.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "draftpilot",
            "--host",
            "0.0.0.0",
            "-p",
            "9000",
            "--verbose",
        ]);
        assert_eq!(cli.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(cli.port, Some(9000));
        assert!(cli.verbose);
    }
}
