#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative in-memory game server hosting the money tweaks plugin.
//!
//! The world owns every piece of engine state the plugin touches: player
//! controllers and their money accounts, the match-rules singleton, console
//! variables, the per-tick task queue, acquisition hooks and the console
//! command table. Adapters mutate it exclusively through [`apply`] and
//! [`dispatch`].

mod console;
mod players;

use std::{collections::BTreeMap, fmt};

use money_tweaks_core::{
    AcquireMethod, AcquireResult, AcquisitionEvent, Authorizer, Command, CommandDefinition,
    CommandHandler, CommandInfo, CommandRegistry, CommandUsage, ConVarSource, Event, GameRules,
    GameStateProvider, HookId, HookRegistry, MoneyServices, PawnHandle, PlayerHandle, PlayerRoster,
    PlayerSnapshot, PurchaseDecisionObserver, RegistrationError, Server, TickScheduler, TickTask,
    GAME_RULES_DESIGNER_NAME, MAX_MONEY_CONVAR, MONEY_SERVICES_FIELD, PLAYER_CONTROLLER_CLASS,
};
use thiserror::Error;
use tracing::{debug, warn};

use self::{console::CommandTable, players::PlayerRegistry};

pub use self::console::tokenize;

/// Money cap applied when the console variable has not been configured.
pub const DEFAULT_MAX_MONEY: i32 = 16_000;

const DEFAULT_ITEM_PRICES: &[(&str, i32)] = &[
    ("item_kevlar", 650),
    ("item_assaultsuit", 1_000),
    ("weapon_deagle", 700),
    ("weapon_hegrenade", 300),
    ("weapon_flashbang", 200),
    ("weapon_ak47", 2_700),
    ("weapon_m4a1", 3_100),
    ("weapon_awp", 4_750),
];

/// Failures reported by the console dispatcher before any handler runs.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// The console line contained no command.
    #[error("empty command")]
    Empty,
    /// No command with that name is registered.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    /// The calling player disconnected before the command ran.
    #[error("caller {0} is no longer connected")]
    InvalidCaller(PlayerHandle),
}

/// Engine state visible to plugin callbacks.
#[derive(Debug)]
pub struct ServerState {
    players: PlayerRegistry,
    game_rules: Option<GameRules>,
    convars: BTreeMap<String, i32>,
    item_prices: BTreeMap<String, i32>,
    pending_changes: Vec<(PlayerHandle, String)>,
    state_change_count: u64,
}

impl ServerState {
    fn new() -> Self {
        let mut convars = BTreeMap::new();
        let _ = convars.insert(MAX_MONEY_CONVAR.to_owned(), DEFAULT_MAX_MONEY);
        Self {
            players: PlayerRegistry::new(),
            game_rules: Some(GameRules::default()),
            convars,
            item_prices: DEFAULT_ITEM_PRICES
                .iter()
                .map(|(item, price)| ((*item).to_owned(), *price))
                .collect(),
            pending_changes: Vec::new(),
            state_change_count: 0,
        }
    }

    fn evaluate_acquisition(
        &self,
        player: PlayerHandle,
        item: &str,
        method: AcquireMethod,
    ) -> AcquireResult {
        let Some(state) = self.players.get(player) else {
            return AcquireResult::NotAllowedForPurchase;
        };
        let Some(price) = self.item_prices.get(item).copied() else {
            return AcquireResult::InvalidItem;
        };
        if state.inventory.contains(item) {
            return AcquireResult::AlreadyOwned;
        }
        if method == AcquireMethod::Buy && price > state.money {
            return AcquireResult::NotAllowedForPurchase;
        }
        AcquireResult::Allowed
    }
}

impl GameStateProvider for ServerState {
    fn find_game_rules(&self, designer_name: &str) -> Option<GameRules> {
        if designer_name == GAME_RULES_DESIGNER_NAME {
            self.game_rules
        } else {
            None
        }
    }
}

impl PlayerRoster for ServerState {
    fn connected_players(&self) -> Vec<PlayerSnapshot> {
        self.players.iter().map(|state| state.snapshot()).collect()
    }

    fn is_valid(&self, player: PlayerHandle) -> bool {
        self.players.get(player).is_some()
    }

    fn pawn_controller(&self, pawn: PawnHandle) -> Option<PlayerHandle> {
        self.players.controller_of(pawn)
    }

    fn money(&self, player: PlayerHandle) -> Option<i32> {
        self.players.get(player).map(|state| state.money)
    }
}

impl ConVarSource for ServerState {
    fn int_convar(&self, name: &str) -> Option<i32> {
        self.convars.get(name).copied()
    }
}

impl MoneyServices for ServerState {
    fn write_account(&mut self, player: PlayerHandle, amount: i32) -> bool {
        match self.players.get_mut(player) {
            Some(state) => {
                state.money = amount;
                true
            }
            None => false,
        }
    }

    fn set_state_changed(&mut self, player: PlayerHandle, class: &str, field: &str) {
        if !self.is_valid(player) {
            return;
        }
        self.state_change_count = self.state_change_count.saturating_add(1);
        self.pending_changes.push((player, format!("{class}::{field}")));
    }
}

impl Authorizer for ServerState {
    fn has_permission(&self, player: PlayerHandle, permission: &str) -> bool {
        self.players
            .get(player)
            .is_some_and(|state| state.has_permission(permission))
    }
}

/// Tasks waiting for the next simulation tick.
#[derive(Default)]
struct TickQueue {
    tasks: Vec<TickTask>,
}

impl TickQueue {
    fn take(&mut self) -> Vec<TickTask> {
        std::mem::take(&mut self.tasks)
    }
}

impl TickScheduler for TickQueue {
    fn post_next_tick(&mut self, task: TickTask) {
        self.tasks.push(task);
    }
}

impl fmt::Debug for TickQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickQueue")
            .field("pending", &self.tasks.len())
            .finish()
    }
}

/// Post hooks installed on the acquisition decision.
#[derive(Default)]
struct HookTable {
    observers: Vec<(HookId, Box<dyn PurchaseDecisionObserver>)>,
    next_id: u32,
}

impl HookTable {
    fn notify(&mut self, event: &AcquisitionEvent, server: &dyn Server, tasks: &mut TickQueue) {
        for (_, observer) in &mut self.observers {
            observer.on_decision(event, server, tasks);
        }
    }
}

impl fmt::Debug for HookTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.observers.iter().map(|(id, _)| id))
            .finish()
    }
}

/// Represents the authoritative game server state.
#[derive(Debug)]
pub struct World {
    state: ServerState,
    tasks: TickQueue,
    hooks: HookTable,
    commands: CommandTable,
    tick_index: u64,
}

impl World {
    /// Creates an empty server with default console variables and rules.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: ServerState::new(),
            tasks: TickQueue::default(),
            hooks: HookTable::default(),
            commands: CommandTable::new(),
            tick_index: 0,
        }
    }

    /// Read-only access to the engine state handed to plugin callbacks.
    #[must_use]
    pub fn server(&self) -> &ServerState {
        &self.state
    }

    /// Mutable access to the engine state handed to plugin callbacks.
    pub fn server_mut(&mut self) -> &mut ServerState {
        &mut self.state
    }

    fn acquire_item(
        &mut self,
        player: PlayerHandle,
        item: String,
        method: AcquireMethod,
        out_events: &mut Vec<Event>,
    ) {
        let Some(pawn) = self.state.players.get(player).map(|state| state.pawn) else {
            debug!(%player, %item, "acquisition from disconnected player ignored");
            return;
        };

        let result = self.state.evaluate_acquisition(player, &item, method);
        let event = AcquisitionEvent {
            pawn,
            item,
            method,
            result,
        };
        self.hooks.notify(&event, &self.state, &mut self.tasks);
        let AcquisitionEvent { item, .. } = event;

        if result != AcquireResult::Allowed {
            out_events.push(Event::AcquisitionDenied {
                player,
                item,
                result,
            });
            return;
        }

        let price = self.state.item_prices.get(&item).copied().unwrap_or(0);
        let cost = if method == AcquireMethod::Buy { price } else { 0 };
        if let Some(state) = self.state.players.get_mut(player) {
            let _ = state.inventory.insert(item.clone());
            state.money = state.money.saturating_sub(cost).max(0);
        }
        if cost > 0 {
            self.state
                .set_state_changed(player, PLAYER_CONTROLLER_CLASS, MONEY_SERVICES_FIELD);
        }
        out_events.push(Event::ItemAcquired { player, item, cost });
    }

    fn advance_tick(&mut self, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        let tasks = self.tasks.take();
        if !tasks.is_empty() {
            debug!(tick = self.tick_index, count = tasks.len(), "running deferred tasks");
        }
        for task in tasks {
            let server: &mut dyn Server = &mut self.state;
            task(server);
        }
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });
        for (player, field) in self.state.pending_changes.drain(..) {
            out_events.push(Event::StateChanged { player, field });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl TickScheduler for World {
    fn post_next_tick(&mut self, task: TickTask) {
        self.tasks.post_next_tick(task);
    }
}

impl HookRegistry for World {
    fn hook_can_acquire(&mut self, observer: Box<dyn PurchaseDecisionObserver>) -> HookId {
        let id = HookId::new(self.hooks.next_id);
        self.hooks.next_id = self.hooks.next_id.wrapping_add(1);
        self.hooks.observers.push((id, observer));
        id
    }

    fn unhook_can_acquire(&mut self, hook: HookId) -> bool {
        let before = self.hooks.observers.len();
        self.hooks.observers.retain(|(id, _)| *id != hook);
        self.hooks.observers.len() != before
    }
}

impl CommandRegistry for World {
    fn register_command(
        &mut self,
        definition: CommandDefinition,
        handler: CommandHandler,
    ) -> Result<(), RegistrationError> {
        debug!(command = %definition.name, "registering console command");
        self.commands.insert(definition, handler)
    }

    fn unregister_command(&mut self, name: &str) -> bool {
        self.commands.remove(name)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConnectPlayer {
            name,
            permissions,
            money,
        } => {
            match world.state.players.connect(name.clone(), permissions, money) {
                Some(player) => {
                    debug!(%player, %name, "player connected");
                    out_events.push(Event::PlayerConnected { player, name });
                }
                None => warn!(%name, "server is full, connection refused"),
            }
        }
        Command::DisconnectPlayer { player } => {
            if world.state.players.disconnect(player) {
                world
                    .state
                    .pending_changes
                    .retain(|(changed, _)| *changed != player);
                debug!(%player, "player disconnected");
                out_events.push(Event::PlayerDisconnected { player });
            }
        }
        Command::SpawnGameRules { warmup } => {
            world.state.game_rules = Some(GameRules {
                warmup_period: warmup,
            });
            out_events.push(Event::WarmupChanged { active: warmup });
        }
        Command::RemoveGameRules => {
            world.state.game_rules = None;
        }
        Command::SetWarmup { active } => {
            if let Some(rules) = world.state.game_rules.as_mut() {
                if rules.warmup_period != active {
                    rules.warmup_period = active;
                    out_events.push(Event::WarmupChanged { active });
                }
            }
        }
        Command::SetConVar { name, value } => {
            let _ = world.state.convars.insert(name.clone(), value);
            out_events.push(Event::ConVarChanged { name, value });
        }
        Command::SetItemPrice { item, price } => {
            let _ = world.state.item_prices.insert(item, price.max(0));
        }
        Command::AcquireItem {
            player,
            item,
            method,
        } => world.acquire_item(player, item, method, out_events),
        Command::Tick => world.advance_tick(out_events),
    }
}

/// Executes a console line on behalf of a player, or of the server console when
/// `invoker` is `None`, returning the replies addressed to the caller.
pub fn dispatch(
    world: &mut World,
    invoker: Option<PlayerHandle>,
    line: &str,
) -> Result<Vec<String>, DispatchError> {
    let args = console::tokenize(line);
    let Some(name) = args.first().cloned() else {
        return Err(DispatchError::Empty);
    };
    let Some(entry) = world.commands.get_mut(&name) else {
        return Err(DispatchError::UnknownCommand(name));
    };
    let mut info = CommandInfo::new(args);

    match (invoker, entry.definition.who_can_execute) {
        (Some(_), CommandUsage::ServerOnly) => {
            info.reply_to_command("[CSS] This command can only be executed by the server.");
            return Ok(info.into_replies());
        }
        (None, CommandUsage::ClientOnly) => {
            info.reply_to_command("[CSS] This command can only be executed by clients.");
            return Ok(info.into_replies());
        }
        _ => {}
    }

    if let Some(player) = invoker {
        if !world.state.is_valid(player) {
            return Err(DispatchError::InvalidCaller(player));
        }
        if !world
            .state
            .has_permission(player, &entry.definition.permission)
        {
            info.reply_to_command(
                "[CSS] You do not have the correct permissions to execute this command.",
            );
            return Ok(info.into_replies());
        }
    }

    if info.arg_count().saturating_sub(1) < entry.definition.min_args {
        let usage = format!(
            "[CSS] Expected usage: \"{} {}\".",
            entry.definition.name, entry.definition.usage
        );
        info.reply_to_command(usage);
        return Ok(info.into_replies());
    }

    debug!(command = %name, caller = ?invoker, "dispatching console command");
    let server: &mut dyn Server = &mut world.state;
    (entry.handler)(invoker, &mut info, server);
    Ok(info.into_replies())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use money_tweaks_core::{
        CommandDefinition, GameRules, PawnHandle, PlayerHandle, PlayerSnapshot,
    };

    use super::World;

    /// Snapshot of a connected player.
    #[must_use]
    pub fn player(world: &World, player: PlayerHandle) -> Option<PlayerSnapshot> {
        world.state.players.get(player).map(|state| state.snapshot())
    }

    /// Snapshots of every connected player in slot order.
    #[must_use]
    pub fn players(world: &World) -> Vec<PlayerSnapshot> {
        world.state.players.iter().map(|state| state.snapshot()).collect()
    }

    /// Current balance of a connected player.
    #[must_use]
    pub fn money(world: &World, player: PlayerHandle) -> Option<i32> {
        world.state.players.get(player).map(|state| state.money)
    }

    /// Items carried by a connected player in lexical order.
    #[must_use]
    pub fn inventory(world: &World, player: PlayerHandle) -> Vec<String> {
        world
            .state
            .players
            .get(player)
            .map(|state| state.inventory.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Pawn controlled by a connected player.
    #[must_use]
    pub fn pawn(world: &World, player: PlayerHandle) -> Option<PawnHandle> {
        world.state.players.get(player).map(|state| state.pawn)
    }

    /// State of the match-rules singleton, if spawned.
    #[must_use]
    pub fn game_rules(world: &World) -> Option<GameRules> {
        world.state.game_rules
    }

    /// Value of an integer console variable.
    #[must_use]
    pub fn convar(world: &World, name: &str) -> Option<i32> {
        world.state.convars.get(name).copied()
    }

    /// Number of ticks simulated so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Number of tasks waiting for the next tick.
    #[must_use]
    pub fn pending_tasks(world: &World) -> usize {
        world.tasks.tasks.len()
    }

    /// Total state-changed notifications raised since the world started.
    #[must_use]
    pub fn state_change_count(world: &World) -> u64 {
        world.state.state_change_count
    }

    /// Number of installed acquisition hooks.
    #[must_use]
    pub fn hook_count(world: &World) -> usize {
        world.hooks.observers.len()
    }

    /// Names of registered console commands in lexical order.
    #[must_use]
    pub fn command_names(world: &World) -> Vec<String> {
        world.commands.names().map(str::to_owned).collect()
    }

    /// Registration metadata of a console command.
    #[must_use]
    pub fn command_definition<'world>(
        world: &'world World,
        name: &str,
    ) -> Option<&'world CommandDefinition> {
        world.commands.definition(name)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    fn connect(world: &mut World, name: &str, money: i32, permissions: &[&str]) -> PlayerHandle {
        let mut events = Vec::new();
        apply(
            world,
            Command::ConnectPlayer {
                name: name.into(),
                permissions: permissions.iter().map(|flag| (*flag).to_owned()).collect(),
                money,
            },
            &mut events,
        );
        match events.as_slice() {
            [Event::PlayerConnected { player, .. }] => *player,
            other => panic!("unexpected events: {other:?}"),
        }
    }

    struct Recorder {
        seen: Rc<RefCell<Vec<(AcquisitionEvent, i32)>>>,
    }

    impl PurchaseDecisionObserver for Recorder {
        fn on_decision(
            &mut self,
            event: &AcquisitionEvent,
            server: &dyn Server,
            _scheduler: &mut dyn TickScheduler,
        ) {
            let money = server
                .pawn_controller(event.pawn)
                .and_then(|player| server.money(player))
                .unwrap_or(-1);
            self.seen.borrow_mut().push((event.clone(), money));
        }
    }

    #[test]
    fn purchase_deducts_price_after_hooks_observe_decision() {
        let mut world = World::new();
        let alice = connect(&mut world, "Alice", 3_000, &[]);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _ = world.hook_can_acquire(Box::new(Recorder { seen: seen.clone() }));

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::AcquireItem {
                player: alice,
                item: "weapon_ak47".into(),
                method: AcquireMethod::Buy,
            },
            &mut events,
        );

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0.result, AcquireResult::Allowed);
        assert_eq!(seen[0].1, 3_000, "hook runs before the engine deducts");
        assert_eq!(query::money(&world, alice), Some(300));
        assert_eq!(
            events,
            vec![Event::ItemAcquired {
                player: alice,
                item: "weapon_ak47".into(),
                cost: 2_700,
            }]
        );
        assert_eq!(query::inventory(&world, alice), vec!["weapon_ak47"]);
    }

    #[test]
    fn acquisition_decisions_cover_denials() {
        let mut world = World::new();
        let alice = connect(&mut world, "Alice", 500, &[]);
        let mut events = Vec::new();

        for (item, method) in [
            ("weapon_unknown", AcquireMethod::Buy),
            ("weapon_awp", AcquireMethod::Buy),
            ("weapon_awp", AcquireMethod::PickUp),
            ("weapon_awp", AcquireMethod::PickUp),
        ] {
            apply(
                &mut world,
                Command::AcquireItem {
                    player: alice,
                    item: item.into(),
                    method,
                },
                &mut events,
            );
        }

        assert_eq!(
            events,
            vec![
                Event::AcquisitionDenied {
                    player: alice,
                    item: "weapon_unknown".into(),
                    result: AcquireResult::InvalidItem,
                },
                Event::AcquisitionDenied {
                    player: alice,
                    item: "weapon_awp".into(),
                    result: AcquireResult::NotAllowedForPurchase,
                },
                Event::ItemAcquired {
                    player: alice,
                    item: "weapon_awp".into(),
                    cost: 0,
                },
                Event::AcquisitionDenied {
                    player: alice,
                    item: "weapon_awp".into(),
                    result: AcquireResult::AlreadyOwned,
                },
            ]
        );
        assert_eq!(query::money(&world, alice), Some(500));
    }

    #[test]
    fn tasks_run_on_next_tick_only() {
        let mut world = World::new();
        let alice = connect(&mut world, "Alice", 0, &[]);
        world.post_next_tick(Box::new(move |server: &mut dyn Server| {
            let _ = server.write_account(alice, 1_234);
        }));

        assert_eq!(query::money(&world, alice), Some(0));
        assert_eq!(query::pending_tasks(&world), 1);

        let mut events = Vec::new();
        apply(&mut world, Command::Tick, &mut events);

        assert_eq!(query::money(&world, alice), Some(1_234));
        assert_eq!(query::pending_tasks(&world), 0);
        assert_eq!(query::tick_index(&world), 1);
        assert_eq!(events, vec![Event::TimeAdvanced { tick: 1 }]);
    }

    #[test]
    fn state_changes_are_flushed_on_tick() {
        let mut world = World::new();
        let alice = connect(&mut world, "Alice", 0, &[]);
        world
            .server_mut()
            .set_state_changed(alice, PLAYER_CONTROLLER_CLASS, MONEY_SERVICES_FIELD);
        assert_eq!(query::state_change_count(&world), 1);

        let mut events = Vec::new();
        apply(&mut world, Command::Tick, &mut events);

        assert_eq!(
            events,
            vec![
                Event::TimeAdvanced { tick: 1 },
                Event::StateChanged {
                    player: alice,
                    field: "CCSPlayerController::m_pInGameMoneyServices".into(),
                },
            ]
        );
    }

    #[test]
    fn disconnected_players_reject_account_writes() {
        let mut world = World::new();
        let alice = connect(&mut world, "Alice", 100, &[]);
        let mut events = Vec::new();
        apply(&mut world, Command::DisconnectPlayer { player: alice }, &mut events);

        assert!(!world.server().is_valid(alice));
        assert!(!world.server_mut().write_account(alice, 5));
        world
            .server_mut()
            .set_state_changed(alice, PLAYER_CONTROLLER_CLASS, MONEY_SERVICES_FIELD);
        assert_eq!(query::state_change_count(&world), 0);
    }

    #[test]
    fn game_rules_lookup_uses_designer_name() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(&mut world, Command::SetWarmup { active: true }, &mut events);

        assert_eq!(
            world.server().find_game_rules(GAME_RULES_DESIGNER_NAME),
            Some(GameRules {
                warmup_period: true
            })
        );
        assert_eq!(world.server().find_game_rules("cs_team_manager"), None);

        apply(&mut world, Command::RemoveGameRules, &mut events);
        apply(&mut world, Command::SetWarmup { active: false }, &mut events);
        assert_eq!(query::game_rules(&world), None);
        assert_eq!(events, vec![Event::WarmupChanged { active: true }]);
    }

    fn register_echo(world: &mut World, usage: CommandUsage, min_args: usize) {
        world
            .register_command(
                CommandDefinition {
                    name: "css_echo".into(),
                    description: "Echo arguments".into(),
                    usage: "<text>".into(),
                    min_args,
                    permission: "@css/cheats".into(),
                    who_can_execute: usage,
                },
                Box::new(|_: Option<PlayerHandle>, info: &mut CommandInfo, _: &mut dyn Server| {
                    let text = info.arg(1).to_owned();
                    info.reply_to_command(text);
                }),
            )
            .expect("registration succeeds");
    }

    #[test]
    fn dispatch_enforces_permissions_for_players_only() {
        let mut world = World::new();
        register_echo(&mut world, CommandUsage::ClientAndServer, 1);
        let guest = connect(&mut world, "Guest", 0, &[]);
        let admin = connect(&mut world, "Admin", 0, &["@css/cheats"]);

        assert_eq!(
            dispatch(&mut world, Some(guest), "css_echo hi"),
            Ok(vec![
                "[CSS] You do not have the correct permissions to execute this command.".into()
            ])
        );
        assert_eq!(
            dispatch(&mut world, Some(admin), "css_echo hi"),
            Ok(vec!["hi".into()])
        );
        assert_eq!(
            dispatch(&mut world, None, "css_echo \"hello there\""),
            Ok(vec!["hello there".into()])
        );
    }

    #[test]
    fn dispatch_reports_usage_and_unknown_commands() {
        let mut world = World::new();
        register_echo(&mut world, CommandUsage::ServerOnly, 1);
        let admin = connect(&mut world, "Admin", 0, &["@css/root"]);

        assert_eq!(
            dispatch(&mut world, None, "css_echo"),
            Ok(vec!["[CSS] Expected usage: \"css_echo <text>\".".into()])
        );
        assert_eq!(
            dispatch(&mut world, Some(admin), "css_echo hi"),
            Ok(vec![
                "[CSS] This command can only be executed by the server.".into()
            ])
        );
        assert_eq!(
            dispatch(&mut world, None, "css_nothing"),
            Err(DispatchError::UnknownCommand("css_nothing".into()))
        );
        assert_eq!(dispatch(&mut world, None, "  "), Err(DispatchError::Empty));
    }

    #[test]
    fn unhook_removes_observer() {
        let mut world = World::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let hook = world.hook_can_acquire(Box::new(Recorder { seen }));
        assert_eq!(query::hook_count(&world), 1);

        assert!(world.unhook_can_acquire(hook));
        assert!(!world.unhook_can_acquire(hook));
        assert_eq!(query::hook_count(&world), 0);
    }
}
