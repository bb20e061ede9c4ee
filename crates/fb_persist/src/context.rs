use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt::{self, Write};

use crate::error::FieldError;
use crate::registry::TypeRegistry;

// -----------------------------------------------------------------------------
// ResourceLookup

/// Host-provided access to loaded resources, such as entity templates.
///
/// Post-restore hooks receive what this returns for their entry's template key.
pub trait ResourceLookup {
    fn resolve(&self, key: &str) -> Option<&dyn Any>;
}

// -----------------------------------------------------------------------------
// Diagnostics

/// A contained, field-level failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Dotted path from the operation's root, e.g. `"Room.doors[2].locked"`.
    pub path: String,
    pub error: FieldError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.error)
    }
}

/// Field-level failures collected during one operation.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    /// Records a failure and logs it as a warning.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::warn!("{diagnostic}");
        self.0.push(diagnostic);
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Diagnostic> {
        self.0.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the first diagnostic recorded at `path`.
    pub fn at(&self, path: &str) -> Option<&Diagnostic> {
        self.0.iter().find(|diagnostic| diagnostic.path == path)
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = alloc::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// -----------------------------------------------------------------------------
// Path tracking

#[derive(Debug, Clone, Copy)]
enum Segment {
    Root(&'static str),
    Field(&'static str),
    Index(usize),
}

// -----------------------------------------------------------------------------
// PersistContext

/// State shared by the steps of one persistence operation.
///
/// Carries the registry, optional host resources, the collected
/// [`Diagnostics`] and the path of the field being processed.
///
/// A context is cheap to create; use one per save or load.
pub struct PersistContext<'a> {
    registry: &'a TypeRegistry,
    resources: Option<&'a dyn ResourceLookup>,
    diagnostics: Diagnostics,
    path: Vec<Segment>,
}

impl<'a> PersistContext<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            resources: None,
            diagnostics: Diagnostics::default(),
            path: Vec::new(),
        }
    }

    pub fn with_resources(mut self, resources: &'a dyn ResourceLookup) -> Self {
        self.resources = Some(resources);
        self
    }

    #[inline]
    pub fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    #[inline]
    pub fn resources(&self) -> Option<&'a dyn ResourceLookup> {
        self.resources
    }

    #[inline]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Takes the diagnostics collected so far, leaving none behind.
    #[inline]
    pub fn take_diagnostics(&mut self) -> Diagnostics {
        core::mem::take(&mut self.diagnostics)
    }

    /// Records a field-level failure at the current path.
    pub fn report(&mut self, error: impl Into<FieldError>) {
        let diagnostic = Diagnostic {
            path: self.current_path(),
            error: error.into(),
        };
        self.diagnostics.push(diagnostic);
    }

    /// The dotted path of the field being processed.
    pub fn current_path(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            // Writing into a `String` cannot fail.
            let _ = match segment {
                Segment::Root(name) => out.write_str(name),
                Segment::Field(name) if out.is_empty() => out.write_str(name),
                Segment::Field(name) => write!(out, ".{name}"),
                Segment::Index(index) => write!(out, "[{index}]"),
            };
        }
        out
    }

    #[inline]
    pub(crate) fn enter_root(&mut self, type_name: &'static str) {
        self.path.push(Segment::Root(type_name));
    }

    #[inline]
    pub(crate) fn enter_field(&mut self, name: &'static str) {
        self.path.push(Segment::Field(name));
    }

    #[inline]
    pub(crate) fn enter_index(&mut self, index: usize) {
        self.path.push(Segment::Index(index));
    }

    #[inline]
    pub(crate) fn leave(&mut self) {
        self.path.pop();
    }
}

impl fmt::Debug for PersistContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistContext")
            .field("path", &self.current_path())
            .field("diagnostics", &self.diagnostics.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::PersistContext;
    use crate::error::{FieldError, ValueError};
    use crate::registry::TypeRegistry;

    #[test]
    fn reports_carry_the_current_path() {
        let registry = TypeRegistry::new();
        let mut ctx = PersistContext::new(&registry);

        ctx.enter_root("Room");
        ctx.enter_field("doors");
        ctx.enter_index(2);
        ctx.enter_field("locked");
        ctx.report(ValueError::Mismatch {
            expected: "bool",
            found: "string",
        });
        ctx.leave();
        ctx.leave();
        ctx.leave();
        ctx.leave();

        let diagnostic = ctx.diagnostics().at("Room.doors[2].locked").unwrap();
        assert!(matches!(diagnostic.error, FieldError::Access(_)));
        assert_eq!(ctx.current_path(), "");
        assert_eq!(ctx.take_diagnostics().len(), 1);
        assert!(ctx.diagnostics().is_empty());
    }
}
