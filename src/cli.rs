//! Command line arguments
//!
//! Flags override the saved config file for this run only, unless
//! `--save-config` is given.

use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "acctdesk",
    version,
    about = "Terminal admin console for an account inventory service",
    long_about = "Browse, filter and manage inventory accounts of an admin server.\n\nExamples:\n  acctdesk --server https://shop.example --cookie <session>\n  acctdesk --offline --inventory accounts.json\n\nSettings and the add-account draft are kept in ~/.acctdesk/state.json."
)]
pub struct CliArgs {
    #[arg(
        short = 's',
        long,
        env = "ACCTDESK_SERVER",
        value_name = "URL",
        help_heading = "Server",
        help = "Base URL of the admin server."
    )]
    pub server: Option<String>,

    #[arg(
        long,
        env = "ACCTDESK_COOKIE",
        value_name = "VALUE",
        hide_env_values = true,
        help_heading = "Server",
        help = "Session cookie of a logged-in admin."
    )]
    pub cookie: Option<String>,

    #[arg(
        long,
        value_name = "SECS",
        help_heading = "Server",
        help = "Timeout for each request."
    )]
    pub timeout: Option<u64>,

    #[arg(
        long,
        help_heading = "Server",
        help = "Never contact the server; work on the inventory file only."
    )]
    pub offline: bool,

    #[arg(
        short = 'i',
        long,
        value_name = "FILE",
        help_heading = "Data",
        help = "Load accounts from a JSON or CSV file."
    )]
    pub inventory: Option<PathBuf>,

    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help_heading = "Data",
        help = "Directory for CSV, JSON and HTML exports."
    )]
    pub export_dir: Option<PathBuf>,

    #[arg(
        long,
        help_heading = "Config",
        help = "Write the merged settings back to ~/.acctdesk/config.json."
    )]
    pub save_config: bool,
}

impl CliArgs {
    /// Layer the flags over a loaded (or default) config
    pub fn merge_into(&self, mut config: Config) -> Config {
        if let Some(ref server) = self.server {
            config.server_url = server.trim_end_matches('/').to_string();
        }
        if let Some(ref cookie) = self.cookie {
            config.session_cookie = Some(cookie.clone());
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = timeout;
        }
        if let Some(ref inventory) = self.inventory {
            config.inventory_path = Some(inventory.to_string_lossy().to_string());
        }
        if let Some(ref dir) = self.export_dir {
            config.export_dir = Some(dir.to_string_lossy().to_string());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = CliArgs::parse_from([
            "acctdesk",
            "--server",
            "https://shop.example/",
            "--timeout",
            "5",
            "--inventory",
            "stock.csv",
        ]);
        let config = args.merge_into(Config::default());

        assert_eq!(config.server_url, "https://shop.example");
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.inventory_path.as_deref(), Some("stock.csv"));
    }

    #[test]
    fn test_missing_flags_keep_config() {
        let saved = Config {
            export_dir: Some("/tmp/out".to_string()),
            ..Config::default()
        };
        let config = CliArgs::default().merge_into(saved.clone());
        assert_eq!(config, saved);
    }

    #[test]
    fn test_offline_flag() {
        let args = CliArgs::parse_from(["acctdesk", "--offline"]);
        assert!(args.offline);
    }
}
