//! Session driven by content loaded from a data directory.
use std::fs;
use std::path::Path;
use std::sync::Arc;

use idle_core::inventory::SequentialInstanceIds;
use idle_core::{AvatarSelection, SlotRef};
use idle_runtime::{CharacterSession, RuntimeConfig};
use tempfile::TempDir;

const NODES: &str = r#"(
    stats: [(id: "strength", base: 3.0)],
    resources: [(id: "stamina", base: 10.0)],
)"#;

const CHARACTER: &str = r#"(
    perks: [
        (id: "digger", name: "Digger", unlockResources: ["stamina"], unlockAbilities: ["dig"]),
    ],
    origins: [
        (id: "miner", name: "Miner", levels: [(level: 1, perks: ["digger"])]),
    ],
)"#;

const ITEMS: &str = r#"(
    items: [
        (id: "ore", maxStack: Some(20)),
        (id: "miner_helm", type: "helmet", stats: {"strength": 2.0}),
        (id: "tonic", maxStack: Some(5), effects: [restore_resource(resourceId: "stamina", amount: 2.0)]),
    ],
)"#;

const ABILITIES: &str = r#"(
    abilities: [
        (id: "dig", name: "Dig", kind: work, cost: {"stamina": 3.0}, durationMs: Some(2000), yields: {"ore": 2}),
    ],
)"#;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn data_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "nodes.ron", NODES);
    write(dir.path(), "character.ron", CHARACTER);
    write(dir.path(), "items.ron", ITEMS);
    write(dir.path(), "abilities.ron", ABILITIES);
    dir
}

#[test]
fn loaded_content_drives_a_session() {
    let dir = data_dir();
    let config_path = dir.path().join("override.toml");
    write(dir.path(), "override.toml", "baseInventorySlots = 6\n");

    let mut config = RuntimeConfig::default().with_content_dir(dir.path());
    config.config_path = Some(config_path);
    let (content, game) = config.load_content().unwrap();
    assert_eq!(game.base_inventory_slots, 6);

    let selection = AvatarSelection::new().with_origin("Miner", 1);
    let mut session = CharacterSession::new(Arc::new(content), game, config, selection, 0)
        .with_instance_ids(SequentialInstanceIds::new());
    assert_eq!(session.inventory().base().len(), 6);
    assert_eq!(session.resources().get("stamina"), Some(10.0));

    session.start_work("dig", 0).unwrap();
    assert_eq!(session.resources().get("stamina"), Some(7.0));
    let report = session.complete_work(2000).unwrap();
    assert_eq!(report.granted.get("ore"), Some(&2));

    session.add_item("miner_helm", 1).unwrap();
    assert_eq!(session.equip(&SlotRef::base(1), None).unwrap(), "head");
    assert_eq!(session.sheet().stat("strength"), 5.0);

    session.add_item("tonic", 1).unwrap();
    let outcome = session.use_item(&SlotRef::base(1)).unwrap();
    assert_eq!(outcome.resources_delta.get("stamina"), Some(&2.0));
    assert_eq!(session.resources().get("stamina"), Some(9.0));
}

#[test]
fn missing_override_config_is_an_error() {
    let dir = data_dir();
    let mut config = RuntimeConfig::default().with_content_dir(dir.path());
    config.config_path = Some(dir.path().join("absent.toml"));

    assert!(config.load_content().is_err());
}
