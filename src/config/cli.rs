use crate::config::{StorageConfig, TomlConfig};
use crate::core::GeneratorConfig;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Clone, Parser)]
#[command(name = "decks")]
#[command(about = "Create, open and draw from decks of playing cards")]
pub struct CliConfig {
    #[arg(long, global = true, help = "TOML file with storage settings (defaults to environment)")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create a new deck
    New {
        /// Comma separated card codes, e.g. AS,KD,10H. A full deck when omitted.
        #[arg(long)]
        cards: Option<String>,

        #[arg(long)]
        shuffled: bool,
    },
    /// Show the remaining cards of a deck
    Open { deck_id: Uuid },
    /// Draw cards from the top of a deck
    Draw {
        deck_id: Uuid,

        #[arg(long)]
        count: usize,
    },
}

impl Command {
    pub fn generator_config(&self) -> Option<GeneratorConfig> {
        match self {
            Command::New { cards, shuffled } => Some(GeneratorConfig {
                codes: cards.clone(),
                shuffled: *shuffled,
            }),
            _ => None,
        }
    }
}

impl CliConfig {
    pub fn toml_config(&self) -> Result<Option<TomlConfig>> {
        self.config.as_ref().map(TomlConfig::from_file).transpose()
    }

    /// The TOML file wins when given, otherwise the environment decides.
    pub fn storage_config(&self, toml: Option<&TomlConfig>) -> Result<StorageConfig> {
        match toml {
            Some(toml) => Ok(toml.storage_config()),
            None => StorageConfig::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_new_command() {
        let cli = CliConfig::try_parse_from(["decks", "new", "--cards", "AS,KD", "--shuffled"]).unwrap();
        assert_eq!(
            cli.command.generator_config(),
            Some(GeneratorConfig::with_codes("AS,KD", true))
        );
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_draw_command() {
        let id = Uuid::new_v4();
        let cli = CliConfig::try_parse_from([
            "decks".to_string(),
            "--verbose".to_string(),
            "draw".to_string(),
            id.to_string(),
            "--count".to_string(),
            "3".to_string(),
        ])
        .unwrap();

        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Draw { deck_id, count: 3 } if deck_id == id));
        assert!(cli.command.generator_config().is_none());
    }

    #[test]
    fn test_rejects_malformed_input_before_storage() {
        assert!(CliConfig::try_parse_from(["decks", "open", "not-a-valid-uuid"]).is_err());

        let id = Uuid::new_v4().to_string();
        assert!(CliConfig::try_parse_from(["decks", "draw", id.as_str(), "--count", "-1"]).is_err());
        assert!(CliConfig::try_parse_from(["decks", "draw", id.as_str()]).is_err());
    }
}
