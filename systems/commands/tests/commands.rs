use money_tweaks_core::{Command, Event, PlayerHandle, MAX_MONEY_CONVAR};
use money_tweaks_system_commands::{MoneyCommands, SUCCESS_REPLY};
use money_tweaks_world::{self as world, dispatch, query, World};

struct Server {
    world: World,
    admin: PlayerHandle,
    guest: PlayerHandle,
}

impl Server {
    fn new() -> Self {
        let mut world = World::new();
        MoneyCommands::default()
            .register(&mut world)
            .expect("commands register on a fresh world");
        let admin = connect(&mut world, "Admin", &["@css/cheats"]);
        let guest = connect(&mut world, "Guest", &[]);
        Self {
            world,
            admin,
            guest,
        }
    }

    fn console(&mut self, line: &str) -> Vec<String> {
        dispatch(&mut self.world, None, line).expect("command is registered")
    }

    fn player(&mut self, player: PlayerHandle, line: &str) -> Vec<String> {
        dispatch(&mut self.world, Some(player), line).expect("command is registered")
    }

    fn money(&self, player: PlayerHandle) -> Option<i32> {
        query::money(&self.world, player)
    }
}

fn connect(world: &mut World, name: &str, permissions: &[&str]) -> PlayerHandle {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::ConnectPlayer {
            name: name.into(),
            permissions: permissions.iter().map(|flag| (*flag).to_owned()).collect(),
            money: 800,
        },
        &mut events,
    );
    match events.as_slice() {
        [Event::PlayerConnected { player, .. }] => *player,
        other => panic!("unexpected events: {other:?}"),
    }
}

#[test]
fn admin_sets_own_balance() {
    let mut server = Server::new();
    let admin = server.admin;

    assert_eq!(server.player(admin, "css_setmoney 1234"), [SUCCESS_REPLY]);
    assert_eq!(server.money(admin), Some(1_234));
}

#[test]
fn admin_sets_named_player_balance() {
    let mut server = Server::new();
    let (admin, guest) = (server.admin, server.guest);

    assert_eq!(server.player(admin, "css_setmoney 0 Guest"), [SUCCESS_REPLY]);
    assert_eq!(server.money(guest), Some(0));
    assert_eq!(server.money(admin), Some(800));
}

#[test]
fn console_must_name_a_target() {
    let mut server = Server::new();

    assert_eq!(
        server.console("css_setmoney 500"),
        ["Must specify a player through the second argument"]
    );
    assert_eq!(
        server.console("css_fillmoney"),
        ["Must specify a player at the argument with index 1"]
    );
    assert_eq!(server.console("css_setmoney 500 Guest"), [SUCCESS_REPLY]);
    assert_eq!(server.money(server.guest), Some(500));
}

#[test]
fn set_money_rejects_bad_amounts() {
    let mut server = Server::new();
    let admin = server.admin;

    assert_eq!(
        server.player(admin, "css_setmoney lots"),
        ["Amount must be an integer"]
    );
    assert_eq!(
        server.player(admin, "css_setmoney 12.5"),
        ["Amount must be an integer"]
    );
    assert_eq!(
        server.player(admin, "css_setmoney -1"),
        ["Amount must not be negative"]
    );
    assert_eq!(server.money(admin), Some(800));
    assert_eq!(query::state_change_count(&server.world), 0);
}

#[test]
fn set_money_rejects_extra_arguments() {
    let mut server = Server::new();
    let admin = server.admin;

    assert_eq!(
        server.player(admin, "css_setmoney 100 Guest extra"),
        ["Too many arguments"]
    );
    assert_eq!(server.money(server.guest), Some(800));
}

#[test]
fn unknown_target_is_reported_before_amount() {
    let mut server = Server::new();
    let admin = server.admin;

    assert_eq!(
        server.player(admin, "css_setmoney lots Nobody"),
        ["Player not found"]
    );
    assert_eq!(server.player(admin, "css_fillmoney guest"), ["Player not found"]);
}

#[test]
fn fill_money_uses_current_cap() {
    let mut server = Server::new();
    let (admin, guest) = (server.admin, server.guest);

    assert_eq!(server.player(admin, "css_fillmoney"), [SUCCESS_REPLY]);
    assert_eq!(server.money(admin), Some(16_000));

    let mut events = Vec::new();
    world::apply(
        &mut server.world,
        Command::SetConVar {
            name: MAX_MONEY_CONVAR.into(),
            value: 65_535,
        },
        &mut events,
    );

    assert_eq!(server.console("css_fillmoney Guest"), [SUCCESS_REPLY]);
    assert_eq!(server.money(guest), Some(65_535));
}

#[test]
fn unprivileged_players_are_refused() {
    let mut server = Server::new();
    let guest = server.guest;

    assert_eq!(
        server.player(guest, "css_fillmoney"),
        ["[CSS] You do not have the correct permissions to execute this command."]
    );
    assert_eq!(server.money(guest), Some(800));
}

#[test]
fn set_money_without_amount_prints_usage() {
    let mut server = Server::new();
    let admin = server.admin;

    assert_eq!(
        server.player(admin, "css_setmoney"),
        ["[CSS] Expected usage: \"css_setmoney <amount> [target]\"."]
    );
}

#[test]
fn quoted_names_with_spaces_resolve() {
    let mut server = Server::new();
    let big_bob = connect(&mut server.world, "Big Bob", &[]);

    assert_eq!(
        server.console("css_setmoney 42 \"Big Bob\""),
        [SUCCESS_REPLY]
    );
    assert_eq!(server.money(big_bob), Some(42));
}

#[test]
fn unregister_removes_both_commands() {
    let mut server = Server::new();
    MoneyCommands::default().unregister(&mut server.world);

    assert!(query::command_names(&server.world).is_empty());
    assert!(dispatch(&mut server.world, None, "css_fillmoney Guest").is_err());
}

#[test]
fn registering_twice_keeps_original_commands() {
    let mut server = Server::new();

    assert!(MoneyCommands::default().register(&mut server.world).is_err());
    assert_eq!(
        query::command_names(&server.world),
        vec!["css_fillmoney", "css_setmoney"]
    );
}
