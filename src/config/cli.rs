use crate::config::toml_config::TomlConfig;
use crate::config::{ClientSettings, SettingsOverrides};
use crate::core::mutator::{NewZone, ZoneEdit};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "pz")]
#[command(about = "Manage placement zones on a resource orchestration server")]
pub struct CliConfig {
    /// Server base URL [default: http://localhost:8282]
    #[arg(long, global = true, env = "PZ_URL")]
    pub url: Option<String>,

    /// Auth token sent with every request
    #[arg(long, global = true, env = "PZ_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// TOML file with a [server] section
    #[arg(long, global = true, env = "PZ_CONFIG")]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Write logs as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: ZoneCommand,
}

#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum ZoneCommand {
    /// List placement zones
    Ls,

    /// Print one placement zone as JSON
    Inspect {
        /// Zone ID, ID prefix or unique name
        id: String,
    },

    /// Print the name of the resource pool behind a document link
    Name { link: String },

    /// Create a placement zone
    Add {
        #[arg(long)]
        name: String,

        /// Mark the zone as a scheduler placement zone
        #[arg(long)]
        scheduler: bool,

        /// Custom property, repeatable
        #[arg(long = "cp", value_name = "KEY=VALUE")]
        custom_properties: Vec<String>,

        /// Zone tag, repeatable
        #[arg(long = "tag", value_name = "KEY:VALUE")]
        tags: Vec<String>,

        /// Tag hosts must carry to join the zone, repeatable
        #[arg(long = "epz-tag", value_name = "KEY:VALUE")]
        match_tags: Vec<String>,
    },

    /// Edit a placement zone
    Update {
        /// Zone ID, ID prefix or unique name
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long = "tag-add", value_name = "KEY:VALUE")]
        tags_to_add: Vec<String>,

        #[arg(long = "tag-remove", value_name = "KEY:VALUE")]
        tags_to_remove: Vec<String>,

        #[arg(long = "epz-tag-add", value_name = "KEY:VALUE")]
        match_tags_to_add: Vec<String>,

        #[arg(long = "epz-tag-remove", value_name = "KEY:VALUE")]
        match_tags_to_remove: Vec<String>,
    },

    /// Remove a placement zone
    Rm {
        /// Zone ID, ID prefix or unique name
        id: String,
    },
}

impl CliConfig {
    /// Loads the config file if one was given and merges it with the flags.
    pub fn client_settings(&self) -> Result<ClientSettings> {
        let file = match &self.config {
            Some(path) => Some(TomlConfig::from_file(path)?),
            None => None,
        };
        let settings = ClientSettings::resolve(
            file.as_ref(),
            SettingsOverrides {
                server_url: self.url.clone(),
                auth_token: self.token.clone(),
                timeout_seconds: self.timeout_seconds,
            },
        );
        settings.validate()?;
        Ok(settings)
    }
}

impl ZoneCommand {
    pub fn new_zone(&self) -> Option<NewZone> {
        match self {
            ZoneCommand::Add {
                name,
                scheduler,
                custom_properties,
                tags,
                match_tags,
            } => Some(NewZone {
                name: name.clone(),
                scheduler: *scheduler,
                custom_properties: custom_properties.clone(),
                tags: tags.clone(),
                match_tags: match_tags.clone(),
            }),
            _ => None,
        }
    }

    pub fn zone_edit(&self) -> Option<ZoneEdit> {
        match self {
            ZoneCommand::Update {
                name,
                tags_to_add,
                tags_to_remove,
                match_tags_to_add,
                match_tags_to_remove,
                ..
            } => Some(ZoneEdit {
                new_name: name.clone(),
                tags_to_add: tags_to_add.clone(),
                tags_to_remove: tags_to_remove.clone(),
                match_tags_to_add: match_tags_to_add.clone(),
                match_tags_to_remove: match_tags_to_remove.clone(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let config = CliConfig::try_parse_from([
            "pz",
            "add",
            "--name",
            "pool-a",
            "--scheduler",
            "--cp",
            "owner=ops",
            "--tag",
            "env:prod",
            "--tag",
            "team:x",
            "--epz-tag",
            "zone:a",
        ])
        .unwrap();

        let new_zone = config.command.new_zone().unwrap();
        assert_eq!(new_zone.name, "pool-a");
        assert!(new_zone.scheduler);
        assert_eq!(new_zone.custom_properties, vec!["owner=ops"]);
        assert_eq!(new_zone.tags, vec!["env:prod", "team:x"]);
        assert_eq!(new_zone.match_tags, vec!["zone:a"]);
        assert!(config.command.zone_edit().is_none());
    }

    #[test]
    fn test_parse_update_with_global_flags() {
        let config = CliConfig::try_parse_from([
            "pz",
            "update",
            "7f3a",
            "--tag-add",
            "team:x",
            "--tag-remove",
            "env:prod",
            "--url",
            "https://admiral.example.com",
            "--verbose",
        ])
        .unwrap();

        assert!(config.verbose);
        assert_eq!(config.url.as_deref(), Some("https://admiral.example.com"));
        let edit = config.command.zone_edit().unwrap();
        assert_eq!(edit.tags_to_add, vec!["team:x"]);
        assert_eq!(edit.tags_to_remove, vec!["env:prod"]);
        assert!(edit.new_name.is_none());
    }

    #[test]
    fn test_client_settings_from_flags() {
        let config = CliConfig::try_parse_from([
            "pz",
            "ls",
            "--url",
            "https://admiral.example.com",
            "--token",
            "t0k",
            "--timeout-seconds",
            "7",
        ])
        .unwrap();

        let settings = config.client_settings().unwrap();
        assert_eq!(settings.server_url, "https://admiral.example.com");
        assert_eq!(settings.auth_token.as_deref(), Some("t0k"));
        assert_eq!(settings.timeout_seconds, 7);
    }

    #[test]
    fn test_add_requires_name() {
        assert!(CliConfig::try_parse_from(["pz", "add"]).is_err());
    }
}
