use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

/// The caller's parsed `Cargo.toml`, used to emit crate paths that resolve
/// from the crate invoking a derive.
///
/// # Example
///
/// ```rust
/// # use fb_macro_utils::Manifest;
/// let p: syn::Path = Manifest::shared(|m| m.get_crate_path("fb_persist"));
/// ```
///
/// # Resolution rules
///
/// 1. `name` is a direct dependency: `::name`.
/// 2. `name` starts with `fb_` and the caller depends on the facade
///    `fable`, `fb_core` or the alias `fb` (checked in that order):
///    `::facade::short_name`, e.g. `fb_persist` -> `::fb_core::persist`.
/// 3. Steps 1-2 again for `dev-dependencies`.
/// 4. Otherwise `::name`.
///
/// A crate that refers to itself from doctests needs
/// `extern crate self as name;` at its root for rule 4 to hold.
#[derive(Debug)]
pub struct Manifest {
    pub manifest: Document<Box<str>>,
    pub modified_time: SystemTime,
}

const FACADE_NAMES: [&str; 3] = ["fable", "fb_core", "fb"];
const ENGINE_PREFIX: &str = "fb_";

impl Manifest {
    #[inline(never)]
    fn manifest_path() -> PathBuf {
        env::var_os("CARGO_MANIFEST_DIR")
            .map(|dir| {
                let path = PathBuf::from(dir).join("Cargo.toml");
                assert!(
                    path.exists(),
                    "Cargo manifest does not exist at path {}",
                    path.display(),
                );
                path
            })
            .expect("CARGO_MANIFEST_DIR should be auto-defined by cargo.")
    }

    #[inline(never)]
    fn modified_time(path: &Path) -> Result<SystemTime, std::io::Error> {
        std::fs::metadata(path).and_then(|metadata| metadata.modified())
    }

    #[inline(never)]
    fn read(path: &Path) -> Document<Box<str>> {
        let text = std::fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("Unable to read cargo manifest: {}", path.display()))
            .into_boxed_str();
        Document::parse(text)
            .unwrap_or_else(|_| panic!("Failed to parse cargo manifest: {}", path.display()))
    }

    #[inline]
    fn parse_path(path: &str) -> syn::Path {
        syn::parse_str(path).unwrap()
    }

    fn find_in(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(Self::parse_path(&format!("::{name}")));
        }

        let module = name.strip_prefix(ENGINE_PREFIX)?;
        FACADE_NAMES
            .iter()
            .find(|facade| deps.contains_key(**facade))
            .map(|facade| Self::parse_path(&format!("::{facade}::{module}")))
    }

    /// Returns the path of the crate `name` as seen from the caller.
    ///
    /// See the type-level documentation for the resolution order.
    #[inline(never)]
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        ["dependencies", "dev-dependencies"]
            .into_iter()
            .find_map(|table| match self.manifest.get(table) {
                Some(Item::Table(deps)) => Self::find_in(deps, name),
                _ => None,
            })
            .unwrap_or_else(|| Self::parse_path(&format!("::{name}")))
    }

    /// Runs `func` against the caller's manifest.
    ///
    /// Parsed manifests are cached per path and re-read when the file's
    /// modification time changes.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let path = Self::manifest_path();
        let modified_time =
            Self::modified_time(&path).expect("The Cargo.toml should have a modified time.");

        {
            let cached = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(manifest) = cached.get(&path)
                && manifest.modified_time == modified_time
            {
                return func(manifest);
            }
        }

        let manifest = Manifest {
            manifest: Self::read(&path),
            modified_time,
        };
        let result = func(&manifest);

        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, manifest);

        result
    }
}
