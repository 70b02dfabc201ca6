use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

/// The caller's `Cargo.toml`, used to find how generated code must name a
/// workspace crate.
///
/// # Example
///
/// ```rust
/// # use vc_macro_utils::Manifest;
/// let p: syn::Path = Manifest::shared(|m| m.get_crate_path("vc_property"));
/// ```
///
/// Reading the manifest is not free. Resolve a path once per macro
/// invocation and pass it around.
///
/// # Resolution rules
///
/// 1. If the requested crate is listed in `dependencies`, return `::crate_name`.
/// 2. If the requested crate name begins with `vc_` and the caller depends on
///    the facade `vc_bind`, return `::vc_bind::short_name`
///    (e.g. `vc_property` -> `::vc_bind::property`).
/// 3. Repeat step 1-2 in `dev-dependencies`.
/// 4. Otherwise, fall back to the absolute path `::crate_name`.
///
/// ## Note
///
/// A crate deriving its own traits must declare
/// `extern crate self as crate_name;` in its root so that the fallback path
/// also resolves inside the crate.
#[derive(Debug)]
pub struct Manifest {
    pub manifest: Document<Box<str>>,
    pub modified_time: SystemTime,
}

const FACADE_NAME: &str = "vc_bind";
const MEMBER_PREFIX: &str = "vc_";

impl Manifest {
    #[inline(never)]
    fn manifest_path() -> PathBuf {
        let dir = env::var_os("CARGO_MANIFEST_DIR")
            .expect("CARGO_MANIFEST_DIR should be auto-defined by cargo.");
        let path = PathBuf::from(dir).join("Cargo.toml");
        assert!(
            path.exists(),
            "Cargo manifest does not exist at path {}",
            path.display(),
        );
        path
    }

    #[inline(never)]
    fn modified_time(path: &Path) -> Result<SystemTime, std::io::Error> {
        std::fs::metadata(path)?.modified()
    }

    #[inline(never)]
    fn read(path: &Path) -> Document<Box<str>> {
        let text = std::fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("Unable to read cargo manifest: {}", path.display()));
        Document::parse(text.into_boxed_str())
            .unwrap_or_else(|_| panic!("Failed to parse cargo manifest: {}", path.display()))
    }

    fn path_of(segments: &[&str]) -> syn::Path {
        let text: String = segments.iter().map(|s| format!("::{s}")).collect();
        syn::parse_str(&text).unwrap_or_else(|_| panic!("`{text}` is not a valid path"))
    }

    fn find_in(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(Self::path_of(&[name]));
        }
        let module = name.strip_prefix(MEMBER_PREFIX)?;
        deps.contains_key(FACADE_NAME)
            .then(|| Self::path_of(&[FACADE_NAME, module]))
    }

    /// Returns the path of the package `name` as seen from the caller.
    /// See the type-level documentation for the resolution order.
    #[inline(never)]
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        ["dependencies", "dev-dependencies"]
            .into_iter()
            .find_map(|table| match self.manifest.get(table) {
                Some(Item::Table(deps)) => Self::find_in(deps, name),
                _ => None,
            })
            .unwrap_or_else(|| Self::path_of(&[name]))
    }

    /// Runs `func` on the caller's manifest.
    ///
    /// Manifests are cached per path and re-read when the file changes.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let path = Self::manifest_path();
        let modified_time =
            Self::modified_time(&path).expect("The Cargo.toml should have a modified time.");

        {
            let manifests = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(manifest) = manifests.get(&path)
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

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(text: &str) -> Manifest {
        Manifest {
            manifest: Document::parse(Box::from(text)).unwrap(),
            modified_time: SystemTime::UNIX_EPOCH,
        }
    }

    fn render(path: &syn::Path) -> String {
        path.segments
            .iter()
            .map(|s| s.ident.to_string())
            .collect::<Vec<_>>()
            .join("::")
    }

    #[test]
    fn direct_dependency() {
        let m = manifest("[dependencies]\nvc_property = \"0.1\"\n");
        assert_eq!(render(&m.get_crate_path("vc_property")), "vc_property");
    }

    #[test]
    fn through_facade() {
        let m = manifest("[dev-dependencies]\nvc_bind = \"0.1\"\n");
        assert_eq!(render(&m.get_crate_path("vc_property")), "vc_bind::property");
    }

    #[test]
    fn fallback_to_absolute() {
        let m = manifest("[package]\nname = \"other\"\n");
        let path = m.get_crate_path("vc_property");
        assert!(path.leading_colon.is_some());
        assert_eq!(render(&path), "vc_property");
    }
}
