use fb_persist::derive::Persist;
use fb_persist::graph::{deserialize, deserialize_as, restore_into, serialize};
use fb_persist::record::{Color, SaveRecord, Value};
use fb_persist::registry::TypeRegistry;
use fb_persist::{Diagnostics, PersistContext};
use glam::Vec2;

#[derive(Persist, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[persist(default, clone)]
enum DoorState {
    #[default]
    Closed,
    Ajar = 5,
    Open,
}

#[derive(Persist, Clone, Debug, Default, PartialEq)]
#[persist(default)]
struct Hinge {
    squeaky: bool,
    wear: f32,
}

#[derive(Persist, Clone, Debug, Default, PartialEq)]
#[persist(default, type_path = "rooms::Door")]
struct Door {
    locked: bool,
    hp: i32,
    label: String,
    position: Vec2,
    tint: Color,
    state: DoorState,
    keys: Vec<String>,
    note: Option<String>,
    hinge: Hinge,
}

#[derive(Persist, Clone, Debug, Default, PartialEq)]
#[persist(default, type_path = "rooms::Room")]
struct Room {
    name: String,
    doors: Vec<Door>,
    visits: u64,
}

fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.register::<Room>();
    registry
}

fn sample_room() -> Room {
    Room {
        name: String::from("Cellar"),
        doors: vec![
            Door {
                locked: true,
                hp: -3,
                label: String::from("north"),
                position: Vec2::new(1.5, -2.0),
                tint: Color::rgb(0.25, 0.5, 1.0),
                state: DoorState::Ajar,
                keys: vec![String::from("brass"), String::from("iron")],
                note: Some(String::from("creaks")),
                hinge: Hinge {
                    squeaky: true,
                    wear: 0.75,
                },
            },
            Door {
                label: String::from("trapdoor"),
                state: DoorState::Open,
                ..Door::default()
            },
        ],
        visits: 42,
    }
}

fn assert_clean(diagnostics: &Diagnostics) {
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
}

#[test]
fn record_shape_follows_field_order() {
    let registry = registry();
    let mut ctx = PersistContext::new(&registry);

    let record = serialize(&sample_room(), &mut ctx).unwrap();
    assert_clean(ctx.diagnostics());

    assert_eq!(record.type_path(), "rooms::Room");
    assert_eq!(record.names().collect::<Vec<_>>(), ["name", "doors", "visits"]);
    assert_eq!(record.get("visits"), Some(&Value::UInt(42)));

    let Some(Value::List(doors)) = record.get("doors") else {
        panic!("doors should be a list");
    };
    let Value::Record(north) = &doors[0] else {
        panic!("a door should be a record");
    };
    assert_eq!(north.type_path(), "rooms::Door");
    assert_eq!(north.get("hp"), Some(&Value::Int(-3)));
    assert_eq!(north.get("state"), Some(&Value::Enum(5)));
    assert_eq!(north.get("note"), Some(&Value::Str(String::from("creaks"))));
    assert_eq!(north.get("position"), Some(&Value::Vec2(Vec2::new(1.5, -2.0))));

    let Value::Record(trapdoor) = &doors[1] else {
        panic!("a door should be a record");
    };
    assert_eq!(trapdoor.get("note"), Some(&Value::Null));
    assert_eq!(trapdoor.get("state"), Some(&Value::Enum(6)));
}

#[test]
fn json_round_trip() {
    let registry = registry();
    let mut ctx = PersistContext::new(&registry);
    let room = sample_room();

    let record = serialize(&room, &mut ctx).unwrap();
    let text = serde_json::to_string_pretty(&record).unwrap();
    let parsed: SaveRecord = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, record);

    let restored: Room = deserialize_as(&parsed, &mut ctx).unwrap();
    assert_eq!(restored, room);
    assert_clean(ctx.diagnostics());
}

#[test]
fn ron_round_trip() {
    let registry = registry();
    let mut ctx = PersistContext::new(&registry);
    let room = sample_room();

    let record = serialize(&room, &mut ctx).unwrap();
    let text = ron::to_string(&record).unwrap();
    let parsed: SaveRecord = ron::from_str(&text).unwrap();

    let restored = deserialize(&parsed, "rooms::Room", &mut ctx).unwrap();
    assert_eq!(restored.downcast_ref::<Room>(), Some(&room));
    assert_clean(ctx.diagnostics());
}

#[test]
fn restoring_an_older_record() {
    let registry = registry();
    let mut ctx = PersistContext::new(&registry);

    // Written by a version of `Door` that had a `color` field and no `keys`.
    let mut record = SaveRecord::new("rooms::Door");
    record.insert("locked", Value::Bool(true));
    record.insert("color", Value::Str(String::from("red")));
    record.insert("state", Value::Enum(6));

    let mut door = Door {
        keys: vec![String::from("spare")],
        ..Door::default()
    };
    restore_into(&mut door, &record, &mut ctx).unwrap();

    assert!(door.locked);
    assert_eq!(door.state, DoorState::Open);
    assert_eq!(door.keys, ["spare"]);
    assert_clean(ctx.diagnostics());
}

#[test]
fn records_restore_into_other_type_paths() {
    let registry = registry();
    let mut ctx = PersistContext::new(&registry);

    let mut record = SaveRecord::new("old_rooms::Hinge");
    record.insert("wear", Value::Float(0.5));

    let hinge: Hinge = deserialize_as(&record, &mut ctx).unwrap();
    assert_eq!(hinge.wear, 0.5);
}

#[test]
fn non_composites_cannot_be_top_level() {
    let registry = registry();
    let mut ctx = PersistContext::new(&registry);

    assert!(serialize(&DoorState::Open, &mut ctx).is_err());
    assert!(restore_into(&mut 5_u8, &SaveRecord::new("u8"), &mut ctx).is_err());
}

#[derive(Persist, Clone, Copy, Debug, Default)]
#[persist(default)]
struct Marker {
    position: Vec2,
    tint: Color,
    scale: f32,
}

const EDGE_VALUES: [f32; 10] = [
    0.0,
    -0.0,
    f32::from_bits(1),
    f32::MIN_POSITIVE,
    f32::EPSILON,
    f32::MAX,
    f32::MIN,
    f32::INFINITY,
    f32::NEG_INFINITY,
    f32::NAN,
];

fn marker(v: f32) -> Marker {
    Marker {
        position: Vec2::new(v, -v),
        tint: Color::rgba(v, 0.5, -v, v),
        scale: v,
    }
}

fn components(marker: &Marker) -> [f32; 7] {
    let [r, g, b, a] = marker.tint.to_array();
    [marker.position.x, marker.position.y, r, g, b, a, marker.scale]
}

/// Equal bit patterns, or both NaN.
fn same(a: f32, b: f32) -> bool {
    a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
}

fn assert_same(restored: &Marker, original: &Marker) {
    for (got, want) in components(restored).into_iter().zip(components(original)) {
        assert!(same(got, want), "{got:?} != {want:?} in {restored:?}");
    }
}

#[test]
fn plain_data_is_bit_exact() {
    let mut registry = TypeRegistry::new();
    registry.register::<Marker>();
    let mut ctx = PersistContext::new(&registry);

    for v in EDGE_VALUES {
        let original = marker(v);
        let record = serialize(&original, &mut ctx).unwrap();
        let restored: Marker = deserialize_as(&record, &mut ctx).unwrap();

        // Vec2 and Color are stored as they are, NaN payloads included.
        assert_eq!(restored.position.x.to_bits(), original.position.x.to_bits());
        assert_eq!(restored.position.y.to_bits(), original.position.y.to_bits());
        assert_eq!(restored.tint.r.to_bits(), original.tint.r.to_bits());
        assert_eq!(restored.tint.b.to_bits(), original.tint.b.to_bits());
        assert_same(&restored, &original);
    }
    assert_clean(ctx.diagnostics());
}

#[test]
fn ron_keeps_non_finite_values() {
    let mut registry = TypeRegistry::new();
    registry.register::<Marker>();
    let mut ctx = PersistContext::new(&registry);

    for v in EDGE_VALUES {
        let original = marker(v);
        let record = serialize(&original, &mut ctx).unwrap();
        let text = ron::to_string(&record).unwrap();
        let parsed: SaveRecord = ron::from_str(&text).unwrap();
        let restored: Marker = deserialize_as(&parsed, &mut ctx).unwrap();

        assert_same(&restored, &original);
    }
    assert_clean(ctx.diagnostics());
}

#[test]
fn json_keeps_finite_values_only() {
    let mut registry = TypeRegistry::new();
    registry.register::<Marker>();
    let mut ctx = PersistContext::new(&registry);

    for v in EDGE_VALUES {
        let record = serialize(&marker(v), &mut ctx).unwrap();
        let text = serde_json::to_string(&record).unwrap();
        let parsed = serde_json::from_str::<SaveRecord>(&text);

        if v.is_finite() {
            let restored: Marker = deserialize_as(&parsed.unwrap(), &mut ctx).unwrap();
            assert_same(&restored, &marker(v));
        } else {
            // JSON has no NaN or infinity; they are written as `null`.
            assert!(parsed.is_err());
        }
    }
}
