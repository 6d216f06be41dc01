//! CLI interface for Edithra
//!
//! Defines the commands and global flags of the `edithra` binary using clap's
//! derive API.

use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};
use edithra_engine::config::LOG_LEVELS;
use std::path::PathBuf;

/// Edithra AI demo service
///
/// Serves the Edithra HTTP API and offers a few local maintenance commands.
#[derive(Parser, Debug)]
#[command(name = "edithra")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        value_parser = PossibleValuesParser::new(LOG_LEVELS)
    )]
    pub log: Option<String>,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server and run until Ctrl-C
    Serve {
        /// Interface to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Exercise every component once and report the outcome
    SelfTest,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the default configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["edithra", "self-test"]);
        assert!(matches!(cli.command, Command::SelfTest));
        assert!(!cli.json);
        assert!(cli.log.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from([
            "edithra",
            "serve",
            "--json",
            "--log",
            "debug",
            "--config",
            "/tmp/edithra.toml",
        ]);
        assert!(cli.json);
        assert_eq!(cli.log, Some("debug".to_string()));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/edithra.toml")));
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::parse_from(["edithra", "serve", "--host", "127.0.0.1", "-p", "8080"]);
        if let Command::Serve { host, port } = cli.command {
            assert_eq!(host.as_deref(), Some("127.0.0.1"));
            assert_eq!(port, Some(8080));
        } else {
            panic!("Expected Serve command");
        }
    }

    #[test]
    fn test_config_show() {
        let cli = Cli::parse_from(["edithra", "config", "show"]);
        assert!(matches!(
            cli.command,
            Command::Config {
                action: ConfigAction::Show
            }
        ));
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        assert!(Cli::try_parse_from(["edithra", "--log", "loud", "self-test"]).is_err());

        for level in LOG_LEVELS {
            let cli = Cli::parse_from(["edithra", "--log", level, "self-test"]);
            assert_eq!(cli.log.as_deref(), Some(level));
        }
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(Cli::try_parse_from(["edithra", "serve", "--port", "99999"]).is_err());
    }
}
