use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

/// The caller's parsed `Cargo.toml`, used to find how generated code should
/// name a runtime crate.
///
/// Generated code must be valid from the crate invoking the macro, which
/// may depend on `vc_serial` directly or only through the `vc_asset_io`
/// facade.
///
/// # Example
///
/// ```rust
/// # use vc_macro_utils::Manifest;
/// let p: syn::Path = Manifest::shared(|m| m.get_crate_path("vc_serial"));
/// ```
///
/// Reading the manifest is not free: resolve once per macro invocation and
/// pass the path around.
///
/// # Resolution rules
///
/// 1. The requested crate is listed in `dependencies`: `::crate_name`.
/// 2. The requested name starts with `vc_` and `vc_asset_io` is listed:
///    `::vc_asset_io::short_name` (e.g. `vc_serial` -> `::vc_asset_io::serial`).
/// 3. Repeat 1-2 for `dev-dependencies`.
/// 4. Otherwise `::crate_name`.
///
/// ## Note
///
/// Inside the requested crate itself, rule 4 applies. Adding
/// `extern crate self as vc_serial;` to its root makes `::vc_serial` valid in
/// both library code and doctests.
#[derive(Debug)]
pub struct Manifest {
    pub manifest: Document<Box<str>>,
    pub modified_time: SystemTime,
}

const FACADE_NAME: &str = "vc_asset_io";
const CRATE_PREFIX: &str = "vc_";

impl Manifest {
    fn manifest_path() -> PathBuf {
        let Some(dir) = env::var_os("CARGO_MANIFEST_DIR") else {
            panic!("CARGO_MANIFEST_DIR should be defined by cargo");
        };
        let path = PathBuf::from(dir).join("Cargo.toml");
        assert!(
            path.exists(),
            "Cargo manifest does not exist at path {}",
            path.display(),
        );
        path
    }

    fn modified_time(path: &Path) -> Result<SystemTime, std::io::Error> {
        std::fs::metadata(path).and_then(|metadata| metadata.modified())
    }

    /// Parse manifest text.
    ///
    /// # Panics
    ///
    /// Panics when the text is not valid TOML, which cargo already rules out.
    pub fn parse(text: &str, origin: &Path) -> Self {
        let manifest = Document::parse(Box::from(text))
            .unwrap_or_else(|_| panic!("Failed to parse cargo manifest: {}", origin.display()));
        Self {
            manifest,
            modified_time: SystemTime::UNIX_EPOCH,
        }
    }

    fn read(path: &Path, modified_time: SystemTime) -> Self {
        let text = std::fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("Unable to read cargo manifest: {}", path.display()));
        Self {
            modified_time,
            ..Self::parse(&text, path)
        }
    }

    fn absolute(segments: &[&str]) -> syn::Path {
        let text: String = segments.iter().map(|s| format!("::{s}")).collect();
        syn::parse_str(&text).unwrap_or_else(|_| panic!("`{text}` is not a valid path"))
    }

    fn find_in_deps(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(Self::absolute(&[name]));
        }
        let short = name.strip_prefix(CRATE_PREFIX)?;
        deps.contains_key(FACADE_NAME)
            .then(|| Self::absolute(&[FACADE_NAME, short]))
    }

    /// The path generated code should use to reach the crate `name`.
    ///
    /// See the type documentation for the resolution order.
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        ["dependencies", "dev-dependencies"]
            .into_iter()
            .filter_map(|key| match self.manifest.get(key) {
                Some(Item::Table(deps)) => Some(deps),
                _ => None,
            })
            .find_map(|deps| Self::find_in_deps(deps, name))
            .unwrap_or_else(|| Self::absolute(&[name]))
    }

    /// Run `func` with the [`Manifest`] of the caller's `Cargo.toml`.
    ///
    /// Parsed manifests are cached per path and re-read when the file's
    /// modification time changes.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let path = Self::manifest_path();
        let modified_time = Self::modified_time(&path)
            .unwrap_or_else(|err| panic!("Cannot stat {}: {err}", path.display()));

        {
            let manifests = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(manifest) = manifests.get(&path)
                && manifest.modified_time == modified_time
            {
                return func(manifest);
            }
        }

        let manifest = Self::read(&path, modified_time);
        let result = func(&manifest);
        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, manifest);
        result
    }
}

// -----------------------------------------------------------------------------
// Tests
