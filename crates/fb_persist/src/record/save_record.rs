use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::record::Value;

// -----------------------------------------------------------------------------
// SaveRecord

/// The stored form of one composite value.
///
/// Holds the producing type's path and an ordered name-to-value mapping.
/// Entries keep insertion order, which for serialized values is the field
/// order of the type. Names are unique within a record.
///
/// Serializes as `{ "type": <path>, "fields": { <name>: <value>, .. } }`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    #[serde(rename = "type")]
    type_path: String,
    #[serde(with = "entries")]
    fields: Vec<(String, Value)>,
}

impl SaveRecord {
    #[inline]
    pub fn new(type_path: impl Into<String>) -> Self {
        Self {
            type_path: type_path.into(),
            fields: Vec::new(),
        }
    }

    #[inline]
    pub fn with_capacity(type_path: impl Into<String>, capacity: usize) -> Self {
        Self {
            type_path: type_path.into(),
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Path of the type that produced this record.
    #[inline]
    pub fn type_path(&self) -> &str {
        &self.type_path
    }

    #[inline]
    pub fn set_type_path(&mut self, type_path: impl Into<String>) {
        self.type_path = type_path.into();
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find_map(|(key, value)| (key == name).then_some(value))
    }

    #[inline]
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find_map(|(key, value)| (key == name).then_some(value))
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Sets the entry `name`, returning the previous value.
    ///
    /// A new name is appended; an existing one keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        let name = name.into();
        match self.get_mut(&name) {
            Some(slot) => Some(core::mem::replace(slot, value)),
            None => {
                self.fields.push((name, value));
                None
            }
        }
    }

    /// Appends an entry without looking for an existing one.
    ///
    /// `name` must not be in the record yet. Serialization writes each
    /// selected field once, so it appends directly.
    #[inline]
    pub(crate) fn push(&mut self, name: impl Into<String>, value: Value) {
        self.fields.push((name.into(), value));
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let index = self.fields.iter().position(|(key, _)| key == name)?;
        Some(self.fields.remove(index).1)
    }

    /// Iterates over entries in order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    #[inline]
    pub fn names(&self) -> impl ExactSizeIterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn map_values(self, mut f: impl FnMut(Value) -> Value) -> Self {
        Self {
            type_path: self.type_path,
            fields: self
                .fields
                .into_iter()
                .map(|(key, value)| (key, f(value)))
                .collect(),
        }
    }
}

// -----------------------------------------------------------------------------
// Entries as an ordered map

mod entries {
    use super::{MapAccess, Visitor};
    use super::{Deserializer, Serializer};
    use super::{String, Value, Vec, fmt};

    use fb_utils::hash::{FixedHashState, HashMap};

    pub(super) fn serialize<S: Serializer>(
        fields: &[(String, Value)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_map(fields.iter().map(|(key, value)| (key, value)))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(String, Value)>, D::Error> {
        deserializer.deserialize_map(EntriesVisitor)
    }

    struct EntriesVisitor;

    impl<'de> Visitor<'de> for EntriesVisitor {
        type Value = Vec<(String, Value)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map of field names to values")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let hint = map.size_hint().unwrap_or(0);
            let mut fields: Vec<(String, Value)> = Vec::with_capacity(hint);
            let mut positions: HashMap<String, usize> =
                HashMap::with_capacity_and_hasher(hint, FixedHashState);
            while let Some((key, value)) = map.next_entry::<String, Value>()? {
                // Later duplicates win, matching map semantics.
                match positions.get(&key) {
                    Some(&at) => fields[at].1 = value,
                    None => {
                        positions.insert(key.clone(), fields.len());
                        fields.push((key, value));
                    }
                }
            }
            Ok(fields)
        }
    }
}

impl fmt::Display for SaveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.type_path)?;
        for (index, (name, value)) in self.fields.iter().enumerate() {
            let sep = if index == 0 { " " } else { ", " };
            write!(f, "{sep}{name}: {}", value.kind_name())?;
        }
        f.write_str(" }")
    }
}

#[cfg(test)]
mod tests {
    use super::SaveRecord;
    use crate::record::{Color, Value};
    use glam::Vec2;

    fn sample() -> SaveRecord {
        let mut nested = SaveRecord::new("game::Hinge");
        nested.insert("angle", Value::Float(0.25));

        let mut record = SaveRecord::new("game::Door");
        record.insert("open", Value::Bool(true));
        record.insert("label", Value::Str("north".into()));
        record.insert("pos", Value::Vec2(Vec2::new(1.5, -2.0)));
        record.insert("tint", Value::Color(Color::rgba(0.1, 0.2, 0.3, 0.4)));
        record.insert("state", Value::Enum(3));
        record.insert("keys", Value::List(vec![Value::UInt(4), Value::Null]));
        record.insert("hinge", Value::Record(nested));
        record
    }

    #[test]
    fn insert_keeps_position_of_existing_names() {
        let mut record = SaveRecord::new("game::Door");
        record.insert("a", Value::Int(1));
        record.insert("b", Value::Int(2));
        assert_eq!(record.insert("a", Value::Int(3)), Some(Value::Int(1)));

        assert_eq!(record.names().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(record.get("a"), Some(&Value::Int(3)));
        assert_eq!(record.remove("a"), Some(Value::Int(3)));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn push_appends_in_order() {
        let mut record = SaveRecord::with_capacity("game::Door", 2);
        record.push("open", Value::Bool(true));
        record.push("hp", Value::Int(3));

        assert_eq!(record.names().collect::<Vec<_>>(), ["open", "hp"]);
        assert_eq!(record.get("hp"), Some(&Value::Int(3)));
    }

    #[test]
    fn duplicate_stored_entries_keep_the_last_value() {
        let text = r#"{"type":"game::Door","fields":{"hp":{"Int":1},"open":{"Bool":true},"hp":{"Int":2}}}"#;
        let record: SaveRecord = serde_json::from_str(text).unwrap();

        assert_eq!(record.names().collect::<Vec<_>>(), ["hp", "open"]);
        assert_eq!(record.get("hp"), Some(&Value::Int(2)));
    }

    #[test]
    fn json_storage_keeps_order_and_kinds() {
        let record = sample();
        let text = serde_json::to_string(&record).unwrap();
        assert!(text.starts_with(r#"{"type":"game::Door","fields":{"open""#));

        let back: SaveRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(back, record);
        assert_eq!(
            back.names().collect::<Vec<_>>(),
            record.names().collect::<Vec<_>>()
        );
    }

    #[test]
    fn ron_storage_keeps_order_and_kinds() {
        let record = sample();
        let text = ron::to_string(&record).unwrap();
        let back: SaveRecord = ron::from_str(&text).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn display_lists_entry_kinds() {
        let mut record = SaveRecord::new("game::Door");
        record.insert("open", Value::Bool(false));
        record.insert("hp", Value::Int(3));
        assert_eq!(
            record.to_string(),
            "game::Door { open: bool, hp: signed integer }"
        );
    }
}
