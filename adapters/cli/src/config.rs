//! TOML configuration describing the hosted server and the plugin.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use money_tweaks_core::{Command, MAX_MONEY_CONVAR};
use money_tweaks_system_bootstrap::Config as PluginConfig;
use money_tweaks_world::DEFAULT_MAX_MONEY;
use serde::Deserialize;

const DEFAULT_STARTING_MONEY: i32 = 800;

/// Complete session configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// Engine state seeded before the plugin loads.
    pub(crate) server: ServerConfig,
    /// Players connected at startup.
    pub(crate) players: Vec<PlayerConfig>,
    /// Plugin settings.
    pub(crate) plugin: PluginConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ServerConfig {
    /// Initial value of the money cap console variable.
    pub(crate) max_money: i32,
    /// Whether the match-rules entity exists at startup.
    pub(crate) game_rules: bool,
    /// Initial warmup flag.
    pub(crate) warmup: bool,
    /// Extra or repriced buy menu items.
    pub(crate) items: Vec<ItemConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_money: DEFAULT_MAX_MONEY,
            game_rules: true,
            warmup: false,
            items: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ItemConfig {
    pub(crate) name: String,
    pub(crate) price: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PlayerConfig {
    pub(crate) name: String,
    #[serde(default = "default_starting_money")]
    pub(crate) money: i32,
    #[serde(default)]
    pub(crate) permissions: Vec<String>,
}

fn default_starting_money() -> i32 {
    DEFAULT_STARTING_MONEY
}

impl Config {
    /// Reads and parses the configuration file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to load config at {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse config toml contents")
    }

    /// Commands that bring a fresh world to the configured state.
    pub(crate) fn world_commands(&self) -> Vec<Command> {
        let mut commands = vec![Command::SetConVar {
            name: MAX_MONEY_CONVAR.to_owned(),
            value: self.server.max_money,
        }];
        commands.push(if self.server.game_rules {
            Command::SpawnGameRules {
                warmup: self.server.warmup,
            }
        } else {
            Command::RemoveGameRules
        });
        commands.extend(self.server.items.iter().map(|item| Command::SetItemPrice {
            item: item.name.clone(),
            price: item.price,
        }));
        commands.extend(self.players.iter().map(|player| Command::ConnectPlayer {
            name: player.name.clone(),
            permissions: player.permissions.clone(),
            money: player.money,
        }));
        commands
    }
}
