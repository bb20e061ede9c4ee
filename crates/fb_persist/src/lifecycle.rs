//! Post-restore hooks.
//!
//! After a [`SaveSet`](crate::save_set::SaveSet) restores an entity, the
//! entity's [`PostRestore`] hook runs with access to the save's version,
//! the entity's template, and the context of the restore. Typical hooks
//! call [`backfill_defaults`](crate::backfill::backfill_defaults) with
//! [`PostRestoreArgs::restored`] and rebuild engine state that is never saved.

use core::any::Any;

use crate::error::PersistError;
use crate::graph::RestoredFields;
use crate::{Persist, PersistContext};

/// What a post-restore hook receives.
pub struct PostRestoreArgs<'a, 'ctx> {
    ctx: &'a mut PersistContext<'ctx>,
    restored: &'a RestoredFields,
    version: u32,
    template: Option<&'ctx dyn Any>,
}

impl<'a, 'ctx> PostRestoreArgs<'a, 'ctx> {
    pub(crate) fn new(
        ctx: &'a mut PersistContext<'ctx>,
        restored: &'a RestoredFields,
        version: u32,
        template: Option<&'ctx dyn Any>,
    ) -> Self {
        Self {
            ctx,
            restored,
            version,
            template,
        }
    }

    /// The context of the restore that just ran.
    #[inline]
    pub fn ctx(&mut self) -> &mut PersistContext<'ctx> {
        self.ctx
    }

    /// The fields the restore assigned.
    ///
    /// The returned reference does not borrow `self`, so it can be passed
    /// along with [`ctx`](Self::ctx).
    #[inline]
    pub fn restored(&self) -> &'a RestoredFields {
        self.restored
    }

    /// Version of the save set being restored.
    #[inline]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// The entity's template, as resolved through the context's resources.
    #[inline]
    pub fn template(&self) -> Option<&'ctx dyn Any> {
        self.template
    }

    #[inline]
    pub fn template_as<T: Any>(&self) -> Option<&'ctx T> {
        self.template.and_then(|template| template.downcast_ref())
    }
}

/// A hook run after the type has been restored from a save set.
///
/// Register it with `#[persist(post_restore)]`.
pub trait PostRestore: Persist {
    fn on_post_restore(&mut self, args: &mut PostRestoreArgs<'_, '_>) -> Result<(), PersistError>;
}
