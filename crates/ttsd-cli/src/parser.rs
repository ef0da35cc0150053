//! Main CLI parser and top-level argument handling.

use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::commands::Commands;

/// Text-to-speech HTTP service backed by an external synthesis engine.
///
/// Port, bind address, and data root can also come from the environment (or a
/// `.env` file); flags given here take precedence.
#[derive(Parser, Debug)]
#[command(name = "ttsd")]
#[command(about = "Serve text-to-speech over HTTP")]
#[command(version = ttsd_build_info::LONG_VERSION)]
pub struct Cli {
    /// Port to listen on (overrides PORT)
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

    /// Address to bind (overrides TTSD_BIND_ADDR)
    #[arg(long, global = true)]
    pub bind: Option<IpAddr>,

    /// Data root for engine assets and output (overrides TTSD_DATA_DIR)
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Environment keys this invocation overrides, with their values.
    pub fn overrides(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(port) = self.port {
            pairs.push(("PORT", port.to_string()));
        }
        if let Some(bind) = self.bind {
            pairs.push(("TTSD_BIND_ADDR", bind.to_string()));
        }
        if let Some(dir) = &self.data_dir {
            pairs.push(("TTSD_DATA_DIR", dir.display().to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::parse_from(["ttsd"]);
        assert!(cli.command.is_none());
        assert!(cli.overrides().is_empty());
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from([
            "ttsd",
            "serve",
            "--port",
            "9100",
            "--bind",
            "127.0.0.1",
            "--data-dir",
            "/srv/tts",
            "-v",
        ]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::Serve)));
        assert_eq!(
            cli.overrides(),
            vec![
                ("PORT", "9100".to_string()),
                ("TTSD_BIND_ADDR", "127.0.0.1".to_string()),
                ("TTSD_DATA_DIR", "/srv/tts".to_string()),
            ]
        );
    }

    #[test]
    fn version_subcommand_parses() {
        let cli = Cli::parse_from(["ttsd", "version"]);
        assert!(matches!(cli.command, Some(Commands::Version)));
    }

    #[test]
    fn rejects_invalid_port() {
        assert!(Cli::try_parse_from(["ttsd", "--port", "99999"]).is_err());
    }
}
