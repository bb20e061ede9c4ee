use std::any::Any;
use std::collections::HashMap;

use fb_persist::backfill::{BackfillReport, backfill_defaults};
use fb_persist::derive::Persist;
use fb_persist::error::{ConstructionError, PersistError};
use fb_persist::graph::{RestoredFields, deserialize_as, restore_into};
use fb_persist::lifecycle::{PostRestore, PostRestoreArgs};
use fb_persist::record::{SaveRecord, Value};
use fb_persist::registry::TypeRegistry;
use fb_persist::save_set::SaveSet;
use fb_persist::{PersistContext, ResourceLookup};

/// Template data loaded by the host, never saved.
struct ChestTemplate {
    capacity: u32,
}

#[derive(Persist, Debug, PartialEq)]
#[persist(default, post_restore, type_path = "props::Chest")]
struct Chest {
    coins: u32,
    locked: bool,
    /// Added after the first release.
    durability: f32,
    #[persist(skip)]
    capacity: u32,
    #[persist(skip)]
    restored_version: u32,
}

impl Default for Chest {
    fn default() -> Self {
        Self {
            coins: 0,
            locked: true,
            durability: 100.0,
            capacity: 0,
            restored_version: 0,
        }
    }
}

impl PostRestore for Chest {
    fn on_post_restore(&mut self, args: &mut PostRestoreArgs<'_, '_>) -> Result<(), PersistError> {
        if let Some(template) = args.template_as::<ChestTemplate>() {
            self.capacity = template.capacity;
        }
        self.restored_version = args.version();
        let restored = args.restored();
        backfill_defaults(self, restored, args.ctx())?;
        Ok(())
    }
}

struct Templates(HashMap<&'static str, Box<dyn Any>>);

impl ResourceLookup for Templates {
    fn resolve(&self, key: &str) -> Option<&dyn Any> {
        self.0.get(key).map(|template| &**template)
    }
}

fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.register::<Chest>();
    registry
}

fn templates() -> Templates {
    let mut map: HashMap<&'static str, Box<dyn Any>> = HashMap::new();
    map.insert("chest/large", Box::new(ChestTemplate { capacity: 40 }));
    Templates(map)
}

/// A save set written before `durability` existed.
fn legacy_set() -> SaveSet {
    let mut record = SaveRecord::new("props::Chest");
    record.insert("coins", Value::UInt(12));
    record.insert("locked", Value::Bool(false));

    let json = serde_json::json!({
        "version": 1,
        "entries": [
            { "key": "chest_1", "template": "chest/large", "record": record },
        ],
    });
    serde_json::from_value(json).unwrap()
}

#[test]
fn capture_replaces_entries_by_key() {
    let registry = registry();
    let mut ctx = PersistContext::new(&registry);
    let mut set = SaveSet::new(3);

    let mut chest = Chest::default();
    set.capture("chest_1", &chest, None, &mut ctx).unwrap();
    chest.coins = 99;
    set.capture("chest_1", &chest, Some("chest/large"), &mut ctx).unwrap();

    assert_eq!(set.len(), 1);
    let entry = set.get("chest_1").unwrap();
    assert_eq!(entry.template.as_deref(), Some("chest/large"));
    assert_eq!(entry.record.get("coins"), Some(&Value::UInt(99)));
    assert!(!entry.record.contains("capacity"));
}

#[test]
fn hooks_run_after_restore() {
    let registry = registry();
    let templates = templates();
    let mut ctx = PersistContext::new(&registry).with_resources(&templates);

    let mut chest = Chest {
        durability: 0.0,
        ..Chest::default()
    };
    legacy_set()
        .restore_entity("chest_1", &mut chest, &mut ctx)
        .unwrap();

    assert_eq!(
        chest,
        Chest {
            coins: 12,
            locked: false,
            durability: 100.0,
            capacity: 40,
            restored_version: 1,
        }
    );
    assert!(ctx.diagnostics().is_empty());
}

#[test]
fn instantiate_builds_the_recorded_type() {
    let registry = registry();
    let mut ctx = PersistContext::new(&registry);

    let chest = legacy_set().instantiate("chest_1", &mut ctx).unwrap();
    let chest = chest.downcast_ref::<Chest>().unwrap();

    assert_eq!(chest.coins, 12);
    assert_eq!(chest.durability, 100.0);
    // No resources were given, so the template is unavailable.
    assert_eq!(chest.capacity, 0);
}

#[test]
fn backfill_keeps_restored_fields() {
    let registry = registry();
    let mut ctx = PersistContext::new(&registry);

    let mut record = SaveRecord::new("props::Chest");
    record.insert("coins", Value::UInt(0));
    record.insert("locked", Value::Bool(true));

    let mut chest = Chest {
        coins: 5,
        locked: false,
        durability: -1.0,
        ..Chest::default()
    };
    let restored = restore_into(&mut chest, &record, &mut ctx).unwrap();
    let report = backfill_defaults(&mut chest, &restored, &mut ctx).unwrap();

    assert_eq!(
        report,
        BackfillReport {
            seeded: vec!["durability"],
            kept: vec!["coins", "locked"],
            failed: Vec::new(),
        }
    );
    assert_eq!(chest.coins, 0);
    assert_eq!(chest.durability, 100.0);

    // A second run leaves the same state.
    let again = backfill_defaults(&mut chest, &restored, &mut ctx).unwrap();
    assert_eq!(again, report);
    assert_eq!(chest.coins, 0);
    assert_eq!(chest.durability, 100.0);
}

/// Restores into a fresh, uninitialized chest and backfills it.
fn load(record: &SaveRecord, ctx: &mut PersistContext) -> Chest {
    let mut chest = Chest {
        coins: 0,
        locked: false,
        durability: -1.0,
        capacity: 0,
        restored_version: 0,
    };
    let restored = restore_into(&mut chest, record, ctx).unwrap();
    backfill_defaults(&mut chest, &restored, ctx).unwrap();
    chest
}

#[test]
fn restored_fields_survive_moves() {
    let registry = registry();
    let mut ctx = PersistContext::new(&registry);

    let mut record = SaveRecord::new("props::Chest");
    record.insert("coins", Value::UInt(12));
    record.insert("durability", Value::Float(3.0));

    let mut chest = Chest::default();
    let restored = restore_into(&mut chest, &record, &mut ctx).unwrap();
    let mut moved = Box::new(chest);
    let report = backfill_defaults(&mut *moved, &restored, &mut ctx).unwrap();

    assert_eq!(report.seeded, ["locked"]);
    assert_eq!(report.kept, ["coins", "durability"]);
    assert_eq!(moved.coins, 12);
    assert_eq!(moved.durability, 3.0);

    // Values built by `deserialize_as` start from `Default`.
    let chest: Chest = deserialize_as(&record, &mut ctx).unwrap();
    assert_eq!(chest.coins, 12);
    assert!(chest.locked);
}

#[test]
fn loads_in_one_context_are_independent() {
    let registry = registry();
    let mut ctx = PersistContext::new(&registry);

    let mut full = SaveRecord::new("props::Chest");
    full.insert("coins", Value::UInt(1));
    full.insert("locked", Value::Bool(false));
    full.insert("durability", Value::Float(3.0));

    let mut legacy = SaveRecord::new("props::Chest");
    legacy.insert("coins", Value::UInt(2));
    legacy.insert("locked", Value::Bool(false));

    let first = load(&full, &mut ctx);
    let second = load(&legacy, &mut ctx);

    assert_eq!(first.durability, 3.0);
    assert_eq!(second.coins, 2);
    assert_eq!(second.durability, 100.0);
}

#[test]
fn backfill_without_restore_seeds_everything() {
    let registry = registry();
    let mut ctx = PersistContext::new(&registry);

    let mut chest = Chest {
        coins: 7,
        locked: false,
        durability: 1.0,
        capacity: 3,
        restored_version: 0,
    };
    let report = backfill_defaults(&mut chest, &RestoredFields::new(), &mut ctx).unwrap();

    assert_eq!(report.seeded, ["coins", "locked", "durability"]);
    assert_eq!(chest.coins, 0);
    assert!(chest.locked);
    // Excluded fields are not backfilled.
    assert_eq!(chest.capacity, 3);
}

#[test]
fn missing_entries_and_types() {
    let registry = TypeRegistry::new();
    let mut ctx = PersistContext::new(&registry);
    let set = legacy_set();

    assert_eq!(
        set.instantiate("nope", &mut ctx).err(),
        Some(PersistError::MissingEntry {
            key: String::from("nope")
        })
    );
    assert!(matches!(
        set.instantiate("chest_1", &mut ctx),
        Err(PersistError::Construction(ConstructionError::TypeResolution { .. }))
    ));

    let mut chest = Chest::default();
    assert_eq!(
        set.restore_entity("chest_1", &mut chest, &mut ctx),
        Err(PersistError::UnregisteredType {
            type_path: String::from("props::Chest")
        })
    );
    assert_eq!(chest, Chest::default());
}
