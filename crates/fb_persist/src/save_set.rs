//! Versioned collections of entity records.
//!
//! A save file holds one [`SaveSet`]: a format version and one
//! [`SaveEntry`] per entity, each with an optional template key that the
//! host resolves through [`ResourceLookup`](crate::ResourceLookup).

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::error::PersistError;
use crate::graph::{RestoredFields, restore_into, serialize};
use crate::lifecycle::PostRestoreArgs;
use crate::record::SaveRecord;
use crate::registry::TypeTraitPostRestore;
use crate::{Persist, PersistContext};

/// One saved entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveEntry {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    pub record: SaveRecord,
}

/// A versioned set of entity records.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveSet {
    version: u32,
    entries: Vec<SaveEntry>,
}

impl SaveSet {
    #[inline]
    pub fn new(version: u32) -> Self {
        Self {
            version,
            entries: Vec::new(),
        }
    }

    #[inline]
    pub fn version(&self) -> u32 {
        self.version
    }

    #[inline]
    pub fn entries(&self) -> &[SaveEntry] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&SaveEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializes `entity` under `key`, replacing an entry with the same key.
    pub fn capture(
        &mut self,
        key: impl Into<String>,
        entity: &dyn Persist,
        template: Option<&str>,
        ctx: &mut PersistContext,
    ) -> Result<(), PersistError> {
        let entry = SaveEntry {
            key: key.into(),
            template: template.map(String::from),
            record: serialize(entity, ctx)?,
        };

        match self.entries.iter_mut().find(|existing| existing.key == entry.key) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        Ok(())
    }

    /// Restores the entry `key` into `target`, then runs its post-restore hook.
    ///
    /// The target's type must be registered, since hooks are found through
    /// the registry.
    pub fn restore_entity(
        &self,
        key: &str,
        target: &mut dyn Persist,
        ctx: &mut PersistContext,
    ) -> Result<(), PersistError> {
        let entry = self.entry(key)?;
        let info = target.persist_type_info();
        if !ctx.registry().contains(info.type_id()) {
            return Err(PersistError::UnregisteredType {
                type_path: String::from(info.type_path()),
            });
        }
        let restored = restore_into(target, &entry.record, ctx)?;
        self.post_restore(entry, target, &restored, ctx)
    }

    /// Constructs the entity `key` from its recorded type and restores it.
    pub fn instantiate(
        &self,
        key: &str,
        ctx: &mut PersistContext,
    ) -> Result<Box<dyn Persist>, PersistError> {
        let entry = self.entry(key)?;
        let mut target = ctx.registry().construct_by_path(entry.record.type_path())?;
        let restored = restore_into(&mut *target, &entry.record, ctx)?;
        self.post_restore(entry, &mut *target, &restored, ctx)?;
        Ok(target)
    }

    fn entry(&self, key: &str) -> Result<&SaveEntry, PersistError> {
        self.get(key).ok_or_else(|| PersistError::MissingEntry {
            key: String::from(key),
        })
    }

    fn post_restore(
        &self,
        entry: &SaveEntry,
        target: &mut dyn Persist,
        restored: &RestoredFields,
        ctx: &mut PersistContext,
    ) -> Result<(), PersistError> {
        let registry = ctx.registry();
        let type_id = target.persist_type_info().type_id();
        let Some(hook) = registry.get_type_trait::<TypeTraitPostRestore>(type_id) else {
            return Ok(());
        };

        let template = match (&entry.template, ctx.resources()) {
            (Some(template), Some(resources)) => resources.resolve(template),
            _ => None,
        };
        if entry.template.is_some() && template.is_none() {
            log::debug!("template of `{}` is not available", entry.key);
        }

        let mut args = PostRestoreArgs::new(ctx, restored, self.version, template);
        hook.call(target, &mut args)
    }
}
