//! Line-oriented session script driving the hosted server.

use std::num::ParseIntError;

use money_tweaks_core::{AcquireMethod, Command, Event, PlayerHandle};
use money_tweaks_system_bootstrap::{LifecycleError, MoneyTweaks};
use money_tweaks_system_targeting::find_player_by_name;
use money_tweaks_world::{apply, dispatch, query, tokenize, DispatchError, World};
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub(crate) enum ScriptError {
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("invalid integer '{value}' for {context}: {source}")]
    InvalidInteger {
        value: String,
        context: &'static str,
        source: ParseIntError,
    },
    #[error("expected {expected}, found '{found}'")]
    InvalidKeyword {
        expected: &'static str,
        found: String,
    },
    #[error("no connected player named '{0}'")]
    UnknownPlayer(String),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// A single parsed script line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ScriptLine {
    Blank,
    Connect { name: String, permissions: Vec<String> },
    Disconnect { name: String },
    Acquire { name: String, item: String, method: AcquireMethod },
    Warmup { active: bool },
    Rules { present: bool },
    ConVar { name: String, value: i32 },
    Price { item: String, price: i32 },
    Tick { steps: u32 },
    Money { name: String },
    As { name: String, line: String },
    Console { line: String },
}

pub(crate) fn parse_line(input: &str) -> Result<ScriptLine, ScriptError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(ScriptLine::Blank);
    }

    let tokens = tokenize(trimmed);
    let mut parts = tokens.iter().map(String::as_str);
    let verb = parts.next().unwrap_or_default();
    let mut required = |what: &'static str| {
        parts
            .next()
            .map(str::to_owned)
            .ok_or(ScriptError::MissingArgument(what))
    };

    let line = match verb {
        "connect" => {
            let name = required("name")?;
            ScriptLine::Connect {
                name,
                permissions: tokens[2..].to_vec(),
            }
        }
        "disconnect" => ScriptLine::Disconnect {
            name: required("name")?,
        },
        "buy" | "pickup" => ScriptLine::Acquire {
            name: required("name")?,
            item: required("item")?,
            method: if verb == "buy" {
                AcquireMethod::Buy
            } else {
                AcquireMethod::PickUp
            },
        },
        "warmup" => ScriptLine::Warmup {
            active: keyword(&required("on|off")?, "on", "off", "on|off")?,
        },
        "rules" => ScriptLine::Rules {
            present: keyword(
                &required("present|absent")?,
                "present",
                "absent",
                "present|absent",
            )?,
        },
        "cvar" => {
            let name = required("name")?;
            let value = parse_i32(&required("value")?, "cvar value")?;
            ScriptLine::ConVar { name, value }
        }
        "price" => {
            let item = required("item")?;
            let price = parse_i32(&required("price")?, "item price")?;
            ScriptLine::Price { item, price }
        }
        "tick" => {
            let steps = match tokens.get(1) {
                Some(raw) => raw.parse().map_err(|source| ScriptError::InvalidInteger {
                    value: raw.clone(),
                    context: "tick count",
                    source,
                })?,
                None => 1,
            };
            ScriptLine::Tick { steps }
        }
        "money" => ScriptLine::Money {
            name: required("name")?,
        },
        "as" => {
            let name = required("name")?;
            if tokens.len() < 3 {
                return Err(ScriptError::MissingArgument("console line"));
            }
            ScriptLine::As {
                name,
                line: join_quoted(&tokens[2..]),
            }
        }
        _ => ScriptLine::Console {
            line: trimmed.to_owned(),
        },
    };
    Ok(line)
}

fn keyword(
    value: &str,
    yes: &'static str,
    no: &'static str,
    expected: &'static str,
) -> Result<bool, ScriptError> {
    if value == yes {
        Ok(true)
    } else if value == no {
        Ok(false)
    } else {
        Err(ScriptError::InvalidKeyword {
            expected,
            found: value.to_owned(),
        })
    }
}

fn parse_i32(value: &str, context: &'static str) -> Result<i32, ScriptError> {
    value.parse().map_err(|source| ScriptError::InvalidInteger {
        value: value.to_owned(),
        context,
        source,
    })
}

fn join_quoted(tokens: &[String]) -> String {
    tokens
        .iter()
        .map(|token| {
            if token.is_empty() || token.chars().any(char::is_whitespace) {
                format!("\"{token}\"")
            } else {
                token.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Hosted server with the plugin loaded.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    plugin: MoneyTweaks,
}

impl Session {
    pub(crate) fn new(config: &Config) -> Result<Self, LifecycleError> {
        let mut world = World::new();
        let mut events = Vec::new();
        for command in config.world_commands() {
            apply(&mut world, command, &mut events);
        }
        let mut plugin = MoneyTweaks::new(config.plugin.clone());
        plugin.load(&mut world, false)?;
        Ok(Self { world, plugin })
    }

    /// Runs one script line, returning the output it produced.
    pub(crate) fn execute(&mut self, input: &str) -> Result<Vec<String>, ScriptError> {
        match parse_line(input)? {
            ScriptLine::Blank => Ok(Vec::new()),
            ScriptLine::Connect { name, permissions } => Ok(self.apply(Command::ConnectPlayer {
                name,
                permissions,
                money: 0,
            })),
            ScriptLine::Disconnect { name } => {
                let player = self.player(&name)?;
                Ok(self.apply(Command::DisconnectPlayer { player }))
            }
            ScriptLine::Acquire { name, item, method } => {
                let player = self.player(&name)?;
                Ok(self.apply(Command::AcquireItem {
                    player,
                    item,
                    method,
                }))
            }
            ScriptLine::Warmup { active } => Ok(self.apply(Command::SetWarmup { active })),
            ScriptLine::Rules { present } => Ok(self.apply(if present {
                Command::SpawnGameRules { warmup: false }
            } else {
                Command::RemoveGameRules
            })),
            ScriptLine::ConVar { name, value } => {
                Ok(self.apply(Command::SetConVar { name, value }))
            }
            ScriptLine::Price { item, price } => {
                Ok(self.apply(Command::SetItemPrice { item, price }))
            }
            ScriptLine::Tick { steps } => {
                let mut output = Vec::new();
                for _ in 0..steps {
                    output.extend(self.apply(Command::Tick));
                }
                Ok(output)
            }
            ScriptLine::Money { name } => {
                let player = self.player(&name)?;
                let balance = query::money(&self.world, player).unwrap_or_default();
                Ok(vec![format!("{name}: {balance}")])
            }
            ScriptLine::As { name, line } => {
                let player = self.player(&name)?;
                Ok(dispatch(&mut self.world, Some(player), &line)?)
            }
            ScriptLine::Console { line } => Ok(dispatch(&mut self.world, None, &line)?),
        }
    }

    /// Unloads the plugin from the hosted server.
    pub(crate) fn shutdown(mut self) {
        self.plugin.unload(&mut self.world, false);
    }

    fn player(&self, name: &str) -> Result<PlayerHandle, ScriptError> {
        find_player_by_name(self.world.server(), name)
            .ok_or_else(|| ScriptError::UnknownPlayer(name.to_owned()))
    }

    fn apply(&mut self, command: Command) -> Vec<String> {
        let mut events = Vec::new();
        apply(&mut self.world, command, &mut events);
        events
            .into_iter()
            .filter_map(|event| self.describe(&event))
            .collect()
    }

    fn describe(&self, event: &Event) -> Option<String> {
        let name = |player: PlayerHandle| {
            query::player(&self.world, player)
                .map_or_else(|| player.to_string(), |snapshot| snapshot.name)
        };
        match event {
            Event::PlayerConnected { name, .. } => Some(format!("{name} connected")),
            Event::ItemAcquired { player, item, cost } => {
                Some(format!("{} acquired {item} for {cost}", name(*player)))
            }
            Event::AcquisitionDenied {
                player,
                item,
                result,
            } => Some(format!("{} cannot acquire {item}: {result:?}", name(*player))),
            Event::WarmupChanged { active } => Some(format!(
                "warmup {}",
                if *active { "started" } else { "ended" }
            )),
            Event::PlayerDisconnected { .. }
            | Event::ConVarChanged { .. }
            | Event::TimeAdvanced { .. }
            | Event::StateChanged { .. } => None,
        }
    }
}
