use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

/// Resolves the path under which a workspace crate is reachable from the
/// crate currently being compiled.
///
/// Derive macros emit absolute paths such as `::vc_reflect::Reflect`. A user
/// who only depends on the `vc_codec` facade has no `vc_reflect` entry in their
/// manifest, so the emitted path must become `::vc_codec::reflect::Reflect`
/// instead.
///
/// # Example
///
/// ```rust
/// # use vc_macro_utils::Manifest;
/// let p: syn::Path = Manifest::shared(|m| m.get_crate_path("vc_reflect"));
/// ```
///
/// Reading and parsing the manifest is not cheap; call this once per macro
/// expansion and reuse the path.
///
/// # Resolution rules
///
/// 1. The crate is listed in `dependencies`: `::crate_name`.
/// 2. The name starts with `vc_` and the facade `vc_codec` is listed:
///    `::vc_codec::short_name` (e.g. `vc_json` -> `::vc_codec::json`).
/// 3. Steps 1-2 again over `dev-dependencies`.
/// 4. Otherwise `::crate_name`.
///
/// A crate referring to itself from doctests needs
/// `extern crate self as vc_reflect;` at its root for rule 4 to resolve.
#[derive(Debug)]
pub struct Manifest {
    pub manifest: Document<Box<str>>,
    pub modified_time: SystemTime,
}

const FACADE_NAME: &str = "vc_codec";
const CRATE_PREFIX: &str = "vc_";

impl Manifest {
    #[inline(never)]
    fn manifest_path() -> PathBuf {
        let dir = env::var_os("CARGO_MANIFEST_DIR")
            .expect("CARGO_MANIFEST_DIR should be defined by cargo.");
        let path = PathBuf::from(dir).join("Cargo.toml");
        assert!(path.exists(), "no Cargo.toml at {}", path.display());
        path
    }

    #[inline(never)]
    fn modified_time(path: &Path) -> std::io::Result<SystemTime> {
        std::fs::metadata(path)?.modified()
    }

    #[inline(never)]
    fn read(path: &Path) -> Document<Box<str>> {
        let text = std::fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("cannot read {}", path.display()))
            .into_boxed_str();
        Document::parse(text).unwrap_or_else(|_| panic!("cannot parse {}", path.display()))
    }

    fn path_of(segments: &[&str]) -> syn::Path {
        let mut path: syn::Path = syn::parse_str(&format!("::{}", segments[0]))
            .expect("crate names are valid paths");
        for segment in &segments[1..] {
            path.segments
                .push(syn::parse_str(segment).expect("module names are valid idents"));
        }
        path
    }

    fn lookup(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(Self::path_of(&[name]));
        }
        let module = name.strip_prefix(CRATE_PREFIX)?;
        deps.contains_key(FACADE_NAME)
            .then(|| Self::path_of(&[FACADE_NAME, module]))
    }

    /// Returns the [`syn::Path`] of the crate `name` as seen from the caller,
    /// following the rules in the type documentation.
    #[inline(never)]
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        ["dependencies", "dev-dependencies"]
            .into_iter()
            .find_map(|section| match self.manifest.get(section) {
                Some(Item::Table(deps)) => Self::lookup(deps, name),
                _ => None,
            })
            .unwrap_or_else(|| Self::path_of(&[name]))
    }

    /// Runs `func` over the caller's parsed manifest.
    ///
    /// Manifests are cached per path and re-read only when the file changes.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let path = Self::manifest_path();
        let modified_time =
            Self::modified_time(&path).expect("Cargo.toml should have a modified time.");

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
    use super::Manifest;

    fn render(path: &syn::Path) -> String {
        let names: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
        format!("::{}", names.join("::"))
    }

    fn manifest(text: &str) -> Manifest {
        Manifest {
            manifest: toml_edit::Document::parse(text.into()).unwrap(),
            modified_time: std::time::SystemTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn direct_dependency_wins() {
        let m = manifest("[dependencies]\nvc_reflect = \"0.1\"\nvc_codec = \"0.1\"\n");
        assert_eq!(render(&m.get_crate_path("vc_reflect")), "::vc_reflect");
    }

    #[test]
    fn facade_dependency_maps_to_module() {
        let m = manifest("[dependencies]\nvc_codec = \"0.1\"\n");
        assert_eq!(render(&m.get_crate_path("vc_reflect")), "::vc_codec::reflect");
        assert_eq!(render(&m.get_crate_path("vc_json")), "::vc_codec::json");
    }

    #[test]
    fn dev_dependencies_and_fallback() {
        let m = manifest("[dev-dependencies]\nvc_codec = \"0.1\"\n");
        assert_eq!(render(&m.get_crate_path("vc_reflect")), "::vc_codec::reflect");
        assert_eq!(render(&m.get_crate_path("serde")), "::serde");
    }
}
