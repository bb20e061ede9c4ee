use std::sync::Arc;

use fb_persist::derive::Persist;
use fb_persist::graph::{restore_into, serialize};
use fb_persist::impls::{Callback, noop_callback};
use fb_persist::info::{Classification, IgnoreReason, Typed};
use fb_persist::record::{SaveRecord, Value};
use fb_persist::registry::TypeRegistry;
use fb_persist::select::Exclusion;
use fb_persist::PersistContext;

/// A live scene node; never saved on its own.
#[derive(Persist, Default)]
#[persist(default, ignored = scene_handle)]
struct NodeRef {
    id: u32,
}

/// A scene handle that is nevertheless meaningful to save.
#[derive(Persist, Default)]
#[persist(default, ignored = resource, always_save)]
struct SoundCue {
    clip: String,
}

struct Cache(Vec<u8>);

#[derive(Persist)]
#[persist(default)]
struct Actor {
    name: String,
    node: NodeRef,
    #[persist(save)]
    anchor: NodeRef,
    cue: SoundCue,
    on_click: Callback,
    #[persist(skip)]
    frame: u32,
    __tag: u8,
    #[persist(ignore)]
    cache: Cache,
}

impl Default for Actor {
    fn default() -> Self {
        Self {
            name: String::new(),
            node: NodeRef::default(),
            anchor: NodeRef::default(),
            cue: SoundCue::default(),
            on_click: noop_callback(),
            frame: 0,
            __tag: 0,
            cache: Cache(Vec::new()),
        }
    }
}

#[derive(Persist, Default)]
#[persist(default, exclusive)]
struct Merchant {
    #[persist(base)]
    actor: Actor,
    #[persist(save)]
    gold: u32,
    mood: i8,
}

fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.register::<Merchant>();
    registry
}

#[test]
fn classification_of_marked_types() {
    assert_eq!(NodeRef::type_info().classify(), Classification::Ignored);
    assert_eq!(
        NodeRef::type_info().ignore_reason(),
        Some(IgnoreReason::SceneHandle)
    );
    assert!(SoundCue::type_info().is_force_saved());
    assert_eq!(Actor::type_info().classify(), Classification::Composite);
    assert_eq!(u32::type_info().classify(), Classification::Primitive);
}

#[test]
fn exclusions_follow_markers() {
    let registry = registry();
    let selection = registry.selection(Actor::type_info());

    let decisions = selection
        .iter()
        .map(|field| (field.name(), field.exclusion()))
        .collect::<Vec<_>>();
    assert_eq!(
        decisions,
        [
            ("name", None),
            ("node", Some(Exclusion::IgnoredType(IgnoreReason::SceneHandle))),
            ("anchor", None),
            ("cue", None),
            ("on_click", Some(Exclusion::IgnoredType(IgnoreReason::Callback))),
            ("frame", Some(Exclusion::Skipped)),
            ("__tag", Some(Exclusion::Reserved)),
        ]
    );
}

#[test]
fn inherited_fields_come_first() {
    let registry = registry();
    let selection = registry.selection(Merchant::type_info());

    let names = selection.iter().map(|field| field.name()).collect::<Vec<_>>();
    assert_eq!(
        names,
        ["name", "node", "anchor", "cue", "on_click", "frame", "__tag", "gold", "mood"]
    );

    // The allow list only governs fields `Merchant` declares.
    assert!(selection.is_included("name"));
    assert!(selection.is_included("gold"));
    assert_eq!(
        selection.get("mood").and_then(|field| field.exclusion()),
        Some(Exclusion::NotAllowListed)
    );
}

#[test]
fn only_included_fields_are_written() {
    let registry = registry();
    let mut ctx = PersistContext::new(&registry);

    let mut merchant = Merchant {
        gold: 250,
        mood: -1,
        ..Merchant::default()
    };
    merchant.actor.name = String::from("Ottilie");
    merchant.actor.anchor.id = 9;
    merchant.actor.cue.clip = String::from("bell.ogg");
    merchant.actor.frame = 77;

    let record = serialize(&merchant, &mut ctx).unwrap();
    assert!(ctx.diagnostics().is_empty());
    assert_eq!(
        record.names().collect::<Vec<_>>(),
        ["name", "anchor", "cue", "gold"]
    );

    let Some(Value::Record(anchor)) = record.get("anchor") else {
        panic!("anchor should be saved");
    };
    assert_eq!(anchor.get("id"), Some(&Value::UInt(9)));
}

#[test]
fn excluded_entries_are_not_restored() {
    let registry = registry();
    let mut ctx = PersistContext::new(&registry);

    let mut record = SaveRecord::new("Merchant");
    record.insert("gold", Value::UInt(10));
    record.insert("mood", Value::Int(3));
    record.insert("frame", Value::UInt(5));
    record.insert("__tag", Value::UInt(1));

    let mut merchant = Merchant::default();
    restore_into(&mut merchant, &record, &mut ctx).unwrap();

    assert_eq!(merchant.gold, 10);
    assert_eq!(merchant.mood, 0);
    assert_eq!(merchant.actor.frame, 0);
    assert_eq!(merchant.actor.__tag, 0);
    assert!(ctx.diagnostics().is_empty());
}

#[test]
fn selections_are_cached_per_type() {
    let registry = registry();
    let first = registry.selection(Merchant::type_info());
    let second = registry.selection(Merchant::type_info());
    assert!(Arc::ptr_eq(&first, &second));

    registry.invalidate_selections();
    let third = registry.selection(Merchant::type_info());
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(registry.selection_generation(), 1);
}
