use std::borrow::Cow;

use fb_persist::derive::Persist;
use fb_persist::error::{FieldAccessError, FieldError, ValueError};
use fb_persist::graph::{restore_into, serialize};
use fb_persist::record::{SaveRecord, Value};
use fb_persist::registry::TypeRegistry;
use fb_persist::{Composite, Persist, PersistContext};

/// A type whose `power` accessor fails while the generator is offline.
#[derive(Persist, Default)]
#[persist(default, Composite = false)]
struct Generator {
    online: bool,
    power: f32,
    label: String,
}

impl Composite for Generator {
    fn field(&self, name: &str) -> Result<&dyn Persist, FieldAccessError> {
        match name {
            "online" => Ok(&self.online),
            "power" if self.online => Ok(&self.power),
            "power" => Err(FieldAccessError::Unavailable {
                type_path: "fault_isolation::Generator",
                field: "power",
                reason: Cow::Borrowed("generator is offline"),
            }),
            "label" => Ok(&self.label),
            _ => Err(FieldAccessError::NoSuchField {
                type_path: "fault_isolation::Generator",
                field: name.to_string(),
            }),
        }
    }

    fn field_mut(&mut self, name: &str) -> Result<&mut dyn Persist, FieldAccessError> {
        match name {
            "online" => Ok(&mut self.online),
            "power" => Ok(&mut self.power),
            "label" => Ok(&mut self.label),
            _ => Err(FieldAccessError::NoSuchField {
                type_path: "fault_isolation::Generator",
                field: name.to_string(),
            }),
        }
    }
}

#[derive(Persist, Default)]
#[persist(default)]
struct Plant {
    generators: Vec<Generator>,
    backup: Generator,
    readings: Vec<u8>,
}

#[derive(Persist, Default, Debug, PartialEq)]
#[persist(default)]
struct Valve {
    key_id: Option<u8>,
    spare_id: Option<u8>,
}

fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.register::<Plant>();
    registry.register::<Valve>();
    registry
}

#[test]
fn failing_accessor_only_loses_its_field() {
    let registry = registry();
    let mut ctx = PersistContext::new(&registry);

    let generator = Generator {
        online: false,
        power: 3.0,
        label: String::from("west"),
    };
    let record = serialize(&generator, &mut ctx).unwrap();

    assert_eq!(record.names().collect::<Vec<_>>(), ["online", "label"]);

    let diagnostics = ctx.take_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    let diagnostic = diagnostics.at("Generator.power").unwrap();
    assert!(matches!(
        diagnostic.error,
        FieldError::Access(FieldAccessError::Unavailable { field: "power", .. })
    ));
}

#[test]
fn nested_failures_carry_their_path() {
    let registry = registry();
    let mut ctx = PersistContext::new(&registry);

    let plant = Plant {
        generators: vec![
            Generator {
                online: true,
                power: 1.0,
                ..Generator::default()
            },
            Generator::default(),
        ],
        backup: Generator::default(),
        readings: vec![1, 2, 3],
    };
    let record = serialize(&plant, &mut ctx).unwrap();

    assert!(ctx.diagnostics().at("Plant.generators[1].power").is_some());
    assert!(ctx.diagnostics().at("Plant.backup.power").is_some());
    assert_eq!(ctx.diagnostics().len(), 2);

    assert_eq!(
        record.get("readings"),
        Some(&Value::List(vec![Value::UInt(1), Value::UInt(2), Value::UInt(3)]))
    );
    let Some(Value::List(generators)) = record.get("generators") else {
        panic!("generators should be saved");
    };
    assert_eq!(generators.len(), 2);
}

#[test]
fn mismatched_values_keep_the_current_value() {
    let registry = registry();
    let mut ctx = PersistContext::new(&registry);

    let mut record = SaveRecord::new("fault_isolation::Generator");
    record.insert("online", Value::Str(String::from("yes")));
    record.insert("power", Value::Float(7.5));
    record.insert("label", Value::Bool(true));

    let mut generator = Generator {
        online: true,
        power: 0.0,
        label: String::from("east"),
    };
    restore_into(&mut generator, &record, &mut ctx).unwrap();

    assert!(generator.online);
    assert_eq!(generator.power, 7.5);
    assert_eq!(generator.label, "east");

    let diagnostics = ctx.take_diagnostics();
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(
        diagnostics.at("Generator.online").map(|d| &d.error),
        Some(&FieldError::from(ValueError::Mismatch {
            expected: "bool",
            found: "string",
        }))
    );
}

#[test]
fn out_of_range_integers_are_reported() {
    let registry = registry();
    let mut ctx = PersistContext::new(&registry);

    let mut record = SaveRecord::new("fault_isolation::Plant");
    record.insert(
        "readings",
        Value::List(vec![Value::UInt(4), Value::UInt(300)]),
    );

    let mut plant = Plant::default();
    restore_into(&mut plant, &record, &mut ctx).unwrap();

    // A sequence fails as a whole, at the field that holds it.
    let diagnostic = ctx.diagnostics().at("Plant.readings").unwrap();
    assert!(matches!(
        diagnostic.error,
        FieldError::Access(FieldAccessError::Value(ValueError::OutOfRange { target: "u8", .. }))
    ));
}

#[test]
fn failed_optional_values_stay_unset() {
    let registry = registry();
    let mut ctx = PersistContext::new(&registry);

    let mut record = SaveRecord::new("fault_isolation::Valve");
    record.insert("key_id", Value::UInt(300));
    record.insert("spare_id", Value::UInt(256));

    let mut valve = Valve {
        key_id: None,
        spare_id: Some(4),
    };
    let restored = restore_into(&mut valve, &record, &mut ctx).unwrap();

    assert_eq!(
        valve,
        Valve {
            key_id: None,
            spare_id: Some(4),
        }
    );
    assert!(restored.is_empty());
    assert!(ctx.diagnostics().at("Valve.key_id").is_some());
    assert!(ctx.diagnostics().at("Valve.spare_id").is_some());
}
