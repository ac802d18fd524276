use std::{io, path::PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use cityweather_core::{
    Config, ResponseParser, config::save_api_key, lookup, provider::provider_from_config,
};
use tracing::debug;

use crate::menu::Session;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "Current weather and favorite cities")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// File whose first line is the OpenWeather API key.
    #[arg(long, global = true)]
    pub key_file: Option<PathBuf>,

    /// How to read the API response: "json" or "scan".
    #[arg(long, global = true)]
    pub parser: Option<ResponseParser>,

    /// Alternative config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive menu (the default).
    Menu,

    /// Show current weather for a city.
    Show {
        /// City name; several words are joined with spaces.
        #[arg(required = true)]
        city: Vec<String>,
    },

    /// Store the OpenWeather API key in the key file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = self.resolve_config()?;
        debug!(?config, "resolved configuration");

        match self.command.unwrap_or(Command::Menu) {
            Command::Menu => {
                let provider = provider_from_config(&config)?;
                let stdin = io::stdin().lock();
                let mut session = Session::new(provider, config.parser, stdin, io::stdout());
                session.run().await.context("Menu I/O failed")?;
            }
            Command::Show { city } => {
                let provider = provider_from_config(&config)?;
                let reading = lookup(provider.as_ref(), config.parser, &city.join(" ")).await?;
                println!("{reading}");
            }
            Command::Configure => {
                let api_key = inquire::Password::new("OpenWeather API key:")
                    .without_confirmation()
                    .with_display_mode(inquire::PasswordDisplayMode::Masked)
                    .prompt()
                    .context("Failed to read API key")?;

                save_api_key(&config.key_file, &api_key)?;
                println!("API key saved to {}", config.key_file.display());
            }
        }

        Ok(())
    }

    /// Config file values, overridden by command-line flags.
    fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        if let Some(key_file) = &self.key_file {
            config.key_file = key_file.clone();
        }
        if let Some(parser) = self.parser {
            config.parser = parser;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_menu() {
        let cli = Cli::try_parse_from(["cityweather"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn show_joins_city_words() {
        let cli = Cli::try_parse_from(["cityweather", "show", "New", "York", "--parser", "scan"])
            .unwrap();
        match cli.command {
            Some(Command::Show { city }) => assert_eq!(city.join(" "), "New York"),
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.parser, Some(ResponseParser::Scan));
    }

    #[test]
    fn unknown_parser_is_rejected() {
        assert!(Cli::try_parse_from(["cityweather", "--parser", "xml"]).is_err());
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "key_file = \"from-config.txt\"\nparser = \"json\"\n").unwrap();

        let cli = Cli::try_parse_from([
            "cityweather",
            "--config",
            path.to_str().unwrap(),
            "--parser",
            "scan",
        ])
        .unwrap();
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.key_file, PathBuf::from("from-config.txt"));
        assert_eq!(config.parser, ResponseParser::Scan);
    }
}
