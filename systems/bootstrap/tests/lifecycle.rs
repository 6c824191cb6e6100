use money_tweaks_core::{AcquireMethod, Command, Event, PlayerHandle};
use money_tweaks_system_bootstrap::{Config, LifecycleError, MoneyTweaks};
use money_tweaks_world::{self as world, dispatch, query, World};

fn warmup_world() -> (World, PlayerHandle) {
    let mut world = World::new();
    let mut events = Vec::new();
    for command in [
        Command::SpawnGameRules { warmup: true },
        Command::ConnectPlayer {
            name: "Alice".into(),
            permissions: vec!["@css/cheats".into()],
            money: 3_000,
        },
    ] {
        world::apply(&mut world, command, &mut events);
    }
    let alice = events
        .iter()
        .find_map(|event| match event {
            Event::PlayerConnected { player, .. } => Some(*player),
            _ => None,
        })
        .expect("alice connected");
    (world, alice)
}

fn buy_and_tick(world: &mut World, player: PlayerHandle, item: &str) {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::AcquireItem {
            player,
            item: item.into(),
            method: AcquireMethod::Buy,
        },
        &mut events,
    );
    world::apply(world, Command::Tick, &mut events);
}

#[test]
fn load_installs_hook_and_commands() {
    let (mut world, alice) = warmup_world();
    let mut plugin = MoneyTweaks::default();

    plugin.load(&mut world, false).expect("plugin loads");

    assert!(plugin.is_loaded());
    assert_eq!(query::hook_count(&world), 1);
    assert_eq!(
        query::command_names(&world),
        vec!["css_fillmoney", "css_setmoney"]
    );
    let definition =
        query::command_definition(&world, "css_setmoney").expect("set command registered");
    assert_eq!(definition.description, "Set the money amount of a player");

    buy_and_tick(&mut world, alice, "weapon_ak47");
    assert_eq!(query::money(&world, alice), Some(16_000));
}

#[test]
fn unload_restores_engine_behaviour() {
    let (mut world, alice) = warmup_world();
    let mut plugin = MoneyTweaks::default();
    plugin.load(&mut world, false).expect("plugin loads");

    plugin.unload(&mut world, false);
    plugin.unload(&mut world, false);

    assert!(!plugin.is_loaded());
    assert_eq!(query::hook_count(&world), 0);
    assert!(query::command_names(&world).is_empty());
    buy_and_tick(&mut world, alice, "weapon_ak47");
    assert_eq!(query::money(&world, alice), Some(300));
}

#[test]
fn double_load_is_rejected() {
    let (mut world, _) = warmup_world();
    let mut plugin = MoneyTweaks::default();
    plugin.load(&mut world, false).expect("plugin loads");

    assert_eq!(plugin.load(&mut world, true), Err(LifecycleError::AlreadyLoaded));
    assert_eq!(query::hook_count(&world), 1);
}

#[test]
fn reload_after_unload_succeeds() {
    let (mut world, _) = warmup_world();
    let mut plugin = MoneyTweaks::default();
    plugin.load(&mut world, false).expect("plugin loads");
    plugin.unload(&mut world, true);

    plugin.load(&mut world, true).expect("plugin reloads");

    assert_eq!(query::hook_count(&world), 1);
    assert_eq!(query::command_names(&world).len(), 2);
}

#[test]
fn disabled_refund_only_registers_commands() {
    let (mut world, alice) = warmup_world();
    let mut plugin = MoneyTweaks::new(Config {
        warmup_refund: false,
        ..Config::default()
    });
    plugin.load(&mut world, false).expect("plugin loads");

    assert_eq!(query::hook_count(&world), 0);
    buy_and_tick(&mut world, alice, "weapon_ak47");
    assert_eq!(query::money(&world, alice), Some(300));
}

#[test]
fn custom_names_and_permission_are_honoured() {
    let (mut world, alice) = warmup_world();
    let mut plugin = MoneyTweaks::new(Config {
        permission: "@admin/economy".into(),
        set_money_command: "sm".into(),
        fill_money_command: "fm".into(),
        warmup_refund: true,
    });
    plugin.load(&mut world, false).expect("plugin loads");

    assert_eq!(
        dispatch(&mut world, Some(alice), "sm 10"),
        Ok(vec![
            "[CSS] You do not have the correct permissions to execute this command.".to_owned()
        ])
    );
    assert_eq!(
        dispatch(&mut world, None, "sm 10 Alice"),
        Ok(vec!["Operation successful".to_owned()])
    );
    assert_eq!(query::money(&world, alice), Some(10));
}

#[test]
fn conflicting_command_name_fails_load_cleanly() {
    let (mut world, _) = warmup_world();
    let mut first = MoneyTweaks::default();
    first.load(&mut world, false).expect("first instance loads");
    let mut second = MoneyTweaks::new(Config {
        set_money_command: "css_setmoney2".into(),
        ..Config::default()
    });

    assert!(matches!(
        second.load(&mut world, false),
        Err(LifecycleError::Registration(_))
    ));
    assert!(!second.is_loaded());
    assert_eq!(query::hook_count(&world), 1);
    assert_eq!(query::command_names(&world).len(), 2);
}
