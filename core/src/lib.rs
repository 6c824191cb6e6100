#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the money tweaks plugin.
//!
//! This crate defines the surface that connects the hosting game engine, the
//! plugin systems and the adapters. The engine is modelled as a set of narrow
//! capability traits ([`GameStateProvider`], [`PlayerRoster`], [`ConVarSource`],
//! [`MoneyServices`], [`TickScheduler`], [`HookRegistry`], [`CommandRegistry`])
//! so systems never depend on a concrete engine. The reference engine in the
//! `world` crate accepts [`Command`] values and broadcasts [`Event`] values,
//! which is also how adapters drive it.

use std::fmt;

use thiserror::Error;

/// Console variable holding the server money cap.
pub const MAX_MONEY_CONVAR: &str = "mp_maxmoney";

/// Designer name of the singleton match-rules entity.
pub const GAME_RULES_DESIGNER_NAME: &str = "cs_gamerules";

/// Network class owning the money services field.
pub const PLAYER_CONTROLLER_CLASS: &str = "CCSPlayerController";

/// Networked field that carries the in-game money account.
pub const MONEY_SERVICES_FIELD: &str = "m_pInGameMoneyServices";

/// Permission flag that grants every other flag.
pub const ROOT_PERMISSION: &str = "@css/root";

/// Opaque reference to a connected player controller.
///
/// Handles are generational: a slot freed by a disconnect and reused by a new
/// player yields a handle with a different serial, so stale handles never
/// alias the newcomer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerHandle {
    slot: u32,
    serial: u32,
}

impl PlayerHandle {
    /// Creates a handle from a slot index and the serial issued for it.
    #[must_use]
    pub const fn new(slot: u32, serial: u32) -> Self {
        Self { slot, serial }
    }

    /// Slot index occupied by the player.
    #[must_use]
    pub const fn slot(&self) -> u32 {
        self.slot
    }

    /// Serial issued when the player claimed the slot.
    #[must_use]
    pub const fn serial(&self) -> u32 {
        self.serial
    }
}

impl fmt::Display for PlayerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.slot, self.serial)
    }
}

/// Reference to the in-world body controlled by a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PawnHandle(u32);

impl PawnHandle {
    /// Creates a pawn handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier returned when a hook is registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HookId(u32);

impl HookId {
    /// Creates a hook identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Means by which a player attempts to obtain an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AcquireMethod {
    /// Walking over or picking up an item from the world.
    PickUp,
    /// Purchasing the item through the buy menu.
    Buy,
}

/// Decision the engine reaches when evaluating an acquisition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AcquireResult {
    /// The acquisition may proceed.
    Allowed,
    /// The item does not exist.
    InvalidItem,
    /// The player already carries the item.
    AlreadyOwned,
    /// The player already bought the item this round.
    AlreadyPurchased,
    /// The player carries the maximum number of this grenade type.
    ReachedGrenadeTypeLimit,
    /// The player carries the maximum number of grenades.
    ReachedGrenadeTotalLimit,
    /// The item is reserved for the other team.
    NotAllowedByTeam,
    /// The map forbids the item.
    NotAllowedByMap,
    /// The game mode forbids the item.
    NotAllowedByMode,
    /// The purchase cannot be made, typically for lack of funds.
    NotAllowedForPurchase,
    /// The item is prohibited by server configuration.
    NotAllowedByProhibition,
}

/// Acquisition decision observed once per hook invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AcquisitionEvent {
    /// Pawn attempting the acquisition.
    pub pawn: PawnHandle,
    /// Item identifier under evaluation.
    pub item: String,
    /// How the item is being obtained.
    pub method: AcquireMethod,
    /// Tentative decision produced by the engine.
    pub result: AcquireResult,
}

/// Read-only state of the singleton match-rules entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct GameRules {
    /// Whether the match is in its warmup period.
    pub warmup_period: bool,
}

/// Immutable view of a connected player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Handle identifying the player.
    pub handle: PlayerHandle,
    /// Display name shown to other players.
    pub name: String,
    /// Current money account balance.
    pub money: i32,
}

/// Entity queries used to find the match-rules singleton.
pub trait GameStateProvider {
    /// Returns the rules carried by the entity with the provided designer name, if any.
    fn find_game_rules(&self, designer_name: &str) -> Option<GameRules>;
}

/// Enumeration and validation of connected players.
pub trait PlayerRoster {
    /// Lists connected players in slot order.
    fn connected_players(&self) -> Vec<PlayerSnapshot>;

    /// Reports whether the handle still refers to a connected player.
    fn is_valid(&self, player: PlayerHandle) -> bool;

    /// Returns the controller that owns the pawn, if it still has one.
    fn pawn_controller(&self, pawn: PawnHandle) -> Option<PlayerHandle>;

    /// Returns the current money balance of a valid player.
    fn money(&self, player: PlayerHandle) -> Option<i32>;
}

/// Integer console variables read on demand.
pub trait ConVarSource {
    /// Returns the value of the named console variable, if it exists.
    fn int_convar(&self, name: &str) -> Option<i32>;
}

/// Writes to the money account of player controllers.
pub trait MoneyServices {
    /// Writes the balance, returning `false` when the handle is no longer valid.
    fn write_account(&mut self, player: PlayerHandle, amount: i32) -> bool;

    /// Marks a networked field as changed so replication picks it up immediately.
    fn set_state_changed(&mut self, player: PlayerHandle, class: &str, field: &str);
}

/// Aggregate of every engine capability a plugin callback may touch.
pub trait Server: GameStateProvider + PlayerRoster + ConVarSource + MoneyServices {}

impl<T> Server for T where
    T: GameStateProvider + PlayerRoster + ConVarSource + MoneyServices + ?Sized
{
}

/// Deferred callback executed by the engine on a later simulation tick.
pub type TickTask = Box<dyn FnOnce(&mut dyn Server)>;

/// Per-tick task queue drained once per simulation frame.
pub trait TickScheduler {
    /// Queues the task to run on the next simulation tick.
    fn post_next_tick(&mut self, task: TickTask);
}

/// Post-execution observer of the engine's item-acquisition decision.
pub trait PurchaseDecisionObserver {
    /// Called after the engine decided, before it applies any side effects.
    fn on_decision(
        &mut self,
        event: &AcquisitionEvent,
        server: &dyn Server,
        scheduler: &mut dyn TickScheduler,
    );
}

/// Registration of acquisition-decision hooks.
pub trait HookRegistry {
    /// Installs a post hook on the acquisition decision.
    fn hook_can_acquire(&mut self, observer: Box<dyn PurchaseDecisionObserver>) -> HookId;

    /// Removes a previously installed hook, returning whether it existed.
    fn unhook_can_acquire(&mut self, hook: HookId) -> bool;
}

/// Permission checks for privileged commands.
pub trait Authorizer {
    /// Reports whether the player holds the permission flag.
    fn has_permission(&self, player: PlayerHandle, permission: &str) -> bool;
}

/// Callers allowed to run a console command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandUsage {
    /// Only connected players.
    ClientOnly,
    /// Only the server console.
    ServerOnly,
    /// Both players and the server console.
    ClientAndServer,
}

/// Registration metadata for a console command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandDefinition {
    /// Name typed on the console.
    pub name: String,
    /// One-line help text.
    pub description: String,
    /// Usage string printed when too few arguments are given.
    pub usage: String,
    /// Minimum number of arguments after the command name.
    pub min_args: usize,
    /// Permission flag required from player callers.
    pub permission: String,
    /// Callers allowed to run the command.
    pub who_can_execute: CommandUsage,
}

/// Callback invoked when a registered command runs.
pub type CommandHandler = Box<dyn FnMut(Option<PlayerHandle>, &mut CommandInfo, &mut dyn Server)>;

/// Registration of console commands.
pub trait CommandRegistry {
    /// Registers a command handler under the definition's name.
    fn register_command(
        &mut self,
        definition: CommandDefinition,
        handler: CommandHandler,
    ) -> Result<(), RegistrationError>;

    /// Removes a command, returning whether it was registered.
    fn unregister_command(&mut self, name: &str) -> bool;
}

/// Arguments of a console invocation together with its reply channel.
///
/// Argument 0 is the command name and [`CommandInfo::arg_count`] includes it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandInfo {
    args: Vec<String>,
    replies: Vec<String>,
}

impl CommandInfo {
    /// Creates an invocation from the command name followed by its arguments.
    #[must_use]
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            replies: Vec::new(),
        }
    }

    /// Number of arguments including the command name.
    #[must_use]
    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// Argument at the index, or an empty string when absent.
    #[must_use]
    pub fn arg(&self, index: usize) -> &str {
        self.args.get(index).map_or("", String::as_str)
    }

    /// Name the command was invoked with.
    #[must_use]
    pub fn command_name(&self) -> &str {
        self.arg(0)
    }

    /// Sends a message back to whoever issued the command.
    pub fn reply_to_command(&mut self, message: impl Into<String>) {
        self.replies.push(message.into());
    }

    /// Replies delivered so far.
    #[must_use]
    pub fn replies(&self) -> &[String] {
        &self.replies
    }

    /// Consumes the invocation, yielding its replies.
    #[must_use]
    pub fn into_replies(self) -> Vec<String> {
        self.replies
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Connects a new player.
    ConnectPlayer {
        /// Display name of the player.
        name: String,
        /// Permission flags granted to the player.
        permissions: Vec<String>,
        /// Starting money balance.
        money: i32,
    },
    /// Disconnects a player, invalidating its handle.
    DisconnectPlayer {
        /// Player leaving the server.
        player: PlayerHandle,
    },
    /// Creates the match-rules singleton, replacing any existing one.
    SpawnGameRules {
        /// Initial warmup flag.
        warmup: bool,
    },
    /// Removes the match-rules singleton.
    RemoveGameRules,
    /// Toggles the warmup flag of the match-rules singleton.
    SetWarmup {
        /// Whether warmup is active.
        active: bool,
    },
    /// Writes an integer console variable.
    SetConVar {
        /// Console variable name.
        name: String,
        /// New value.
        value: i32,
    },
    /// Registers or reprices an item.
    SetItemPrice {
        /// Item identifier.
        item: String,
        /// Purchase price.
        price: i32,
    },
    /// Asks the engine to let a player acquire an item.
    AcquireItem {
        /// Player attempting the acquisition.
        player: PlayerHandle,
        /// Item identifier.
        item: String,
        /// How the item is obtained.
        method: AcquireMethod,
    },
    /// Advances the simulation by one tick.
    Tick,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A player joined the server.
    PlayerConnected {
        /// Handle assigned to the player.
        player: PlayerHandle,
        /// Display name of the player.
        name: String,
    },
    /// A player left the server.
    PlayerDisconnected {
        /// Handle that is now invalid.
        player: PlayerHandle,
    },
    /// The warmup flag changed.
    WarmupChanged {
        /// Whether warmup is active.
        active: bool,
    },
    /// A console variable changed.
    ConVarChanged {
        /// Console variable name.
        name: String,
        /// New value.
        value: i32,
    },
    /// An acquisition was granted and its side effects applied.
    ItemAcquired {
        /// Player that obtained the item.
        player: PlayerHandle,
        /// Item identifier.
        item: String,
        /// Money deducted by the engine, zero for pick-ups.
        cost: i32,
    },
    /// An acquisition was refused.
    AcquisitionDenied {
        /// Player whose attempt failed.
        player: PlayerHandle,
        /// Item identifier.
        item: String,
        /// Decision produced by the engine.
        result: AcquireResult,
    },
    /// The simulation advanced by one tick.
    TimeAdvanced {
        /// Index of the tick that just ran.
        tick: u64,
    },
    /// A networked field was marked as changed and replicated.
    StateChanged {
        /// Player whose field changed.
        player: PlayerHandle,
        /// Field that changed.
        field: String,
    },
}

/// Failures of money account mutations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    /// The requested balance is negative.
    #[error("Amount must not be negative")]
    InvalidAmount(i32),
    /// The target disconnected before the write.
    #[error("Player is no longer connected")]
    InvalidatedHandle(PlayerHandle),
    /// The money cap console variable is not registered.
    #[error("Console variable {0} is not available")]
    MissingConVar(&'static str),
}

/// Failures of target resolution.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    /// The server console issued the command without naming a player.
    #[error("Must specify a player at the argument with index {index}")]
    MissingTarget {
        /// Argument index where the player name was expected.
        index: usize,
    },
    /// No connected player carries the requested name.
    #[error("Player not found")]
    PlayerNotFound(String),
}

/// Failures of the administrative money commands.
///
/// An invalid amount is reported as either [`CommandError::AmountNotInteger`] or
/// [`CommandError::AmountNegative`]; both reply with the amount rule that failed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// More arguments than the command accepts.
    #[error("Too many arguments")]
    TooManyArguments,
    /// The server console ran the set-balance command without naming a player.
    #[error("Must specify a player through the second argument")]
    ConsoleTargetRequired,
    /// The amount argument is not an integer.
    #[error("Amount must be an integer")]
    AmountNotInteger(String),
    /// The amount argument is negative.
    #[error("Amount must not be negative")]
    AmountNegative(i32),
    /// The target could not be resolved.
    #[error(transparent)]
    Target(#[from] TargetError),
    /// The money mutation failed.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Failures when registering console commands.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    /// Another handler already owns the name.
    #[error("command {0} is already registered")]
    DuplicateCommand(String),
    /// The name is empty or contains whitespace.
    #[error("command name '{0}' is not valid")]
    InvalidName(String),
}
