//! Path cleaning for captured stack traces
//!
//! File paths in a backtrace are absolute and machine specific. A cleaner
//! rewrites them before they are stored on an `ErrorNode`, so traces from two
//! build machines compare equal.
//!
//! The default cleaner strips the cargo registry prefix, the project root
//! (the working directory at first use) and a leading `./`:
//!
//! ```
//! use errtree_core::cleanpath::{chain, remove_dot_slash, remove_prefix};
//!
//! let clean = chain(vec![remove_prefix("/home/ci/shop"), remove_dot_slash()]);
//! assert_eq!(clean("/home/ci/shop/src/orders.rs"), "src/orders.rs");
//! ```

use std::sync::{Arc, RwLock};

/// A path rewriting function
pub type CleanPathFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

static CLEAN_PATH: RwLock<Option<CleanPathFn>> = RwLock::new(None);

const CARGO_REGISTRY_MARKER: &str = "/.cargo/registry/src/";
const RUSTC_SYSROOT_MARKER: &str = "/rustc/";

/// Strip a root directory from the front of a path
pub fn remove_prefix(root: impl Into<String>) -> CleanPathFn {
    let root = root.into();
    Arc::new(move |path: &str| {
        if root.is_empty() {
            return path.to_string();
        }
        match path.strip_prefix(root.as_str()) {
            Some(rest) => rest.trim_start_matches(['/', '\\']).to_string(),
            None => path.to_string(),
        }
    })
}

/// Strip a leading `./`
pub fn remove_dot_slash() -> CleanPathFn {
    Arc::new(|path: &str| path.strip_prefix("./").unwrap_or(path).to_string())
}

/// Reduce dependency and std paths to `crate-x.y.z/src/...` and `library/...`
pub fn remove_cargo_registry() -> CleanPathFn {
    Arc::new(|path: &str| {
        if let Some(idx) = path.find(CARGO_REGISTRY_MARKER) {
            // skip the registry index directory (`index.crates.io-<hash>/`)
            let rest = &path[idx + CARGO_REGISTRY_MARKER.len()..];
            return match rest.split_once('/') {
                Some((_, krate)) => krate.to_string(),
                None => rest.to_string(),
            };
        }
        if let Some(rest) = path.strip_prefix(RUSTC_SYSROOT_MARKER) {
            // `/rustc/<commit>/library/...`
            if let Some((_, lib)) = rest.split_once('/') {
                return lib.to_string();
            }
        }
        path.to_string()
    })
}

/// Apply cleaners in order, each one seeing the previous one's output
pub fn chain(fns: Vec<CleanPathFn>) -> CleanPathFn {
    Arc::new(move |path: &str| {
        fns.iter()
            .fold(path.to_string(), |current, clean| clean(&current))
    })
}

/// Cleaner used when nothing has been configured
pub fn default_clean_path() -> CleanPathFn {
    let root = std::env::current_dir()
        .map(|dir| dir.to_string_lossy().into_owned())
        .unwrap_or_default();
    chain(vec![
        remove_cargo_registry(),
        remove_prefix(root),
        remove_dot_slash(),
    ])
}

/// The currently configured cleaner
pub fn clean_path() -> CleanPathFn {
    if let Ok(guard) = CLEAN_PATH.read() {
        if let Some(clean) = guard.as_ref() {
            return clean.clone();
        }
    }
    let clean = default_clean_path();
    if let Ok(mut guard) = CLEAN_PATH.write() {
        guard.get_or_insert_with(|| clean.clone());
    }
    clean
}

/// Use `root` as the project root instead of the working directory
pub fn set_clean_path(root: impl Into<String>) {
    install(chain(vec![
        remove_cargo_registry(),
        remove_prefix(root),
        remove_dot_slash(),
    ]));
}

/// Run extra cleaners after the default one
///
/// ```
/// use std::sync::Arc;
/// use errtree_core::cleanpath::set_clean_path_fn;
///
/// set_clean_path_fn(vec![Arc::new(|p: &str| p.trim_start_matches("crates/").to_string())]);
/// ```
pub fn set_clean_path_fn(fns: Vec<CleanPathFn>) {
    let mut all = vec![default_clean_path()];
    all.extend(fns);
    install(chain(all));
}

/// Forget any configured cleaner
pub fn reset_clean_path() {
    if let Ok(mut guard) = CLEAN_PATH.write() {
        *guard = None;
    }
}

fn install(clean: CleanPathFn) {
    if let Ok(mut guard) = CLEAN_PATH.write() {
        *guard = Some(clean);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_prefix() {
        let clean = remove_prefix("/work/shop");
        assert_eq!(clean("/work/shop/src/lib.rs"), "src/lib.rs");
        assert_eq!(clean("/elsewhere/src/lib.rs"), "/elsewhere/src/lib.rs");
    }

    #[test]
    fn test_remove_prefix_empty_root_is_identity() {
        let clean = remove_prefix("");
        assert_eq!(clean("/abs/file.rs"), "/abs/file.rs");
    }

    #[test]
    fn test_remove_dot_slash() {
        let clean = remove_dot_slash();
        assert_eq!(clean("./src/main.rs"), "src/main.rs");
        assert_eq!(clean("src/main.rs"), "src/main.rs");
    }

    #[test]
    fn test_remove_cargo_registry() {
        let clean = remove_cargo_registry();
        assert_eq!(
            clean("/home/me/.cargo/registry/src/index.crates.io-6f17d22bba15001f/serde-1.0.200/src/de.rs"),
            "serde-1.0.200/src/de.rs"
        );
        assert_eq!(
            clean("/rustc/90b35a6239c3d8bdabc530a6a0816f7ff89a0aaf/library/std/src/rt.rs"),
            "library/std/src/rt.rs"
        );
        assert_eq!(clean("src/lib.rs"), "src/lib.rs");
    }

    #[test]
    fn test_chain_applies_in_order() {
        let upper: CleanPathFn = Arc::new(|p: &str| p.to_uppercase());
        let clean = chain(vec![remove_prefix("/root"), upper]);
        assert_eq!(clean("/root/src/a.rs"), "SRC/A.RS");

        // order matters: after upper-casing the prefix no longer matches
        let upper: CleanPathFn = Arc::new(|p: &str| p.to_uppercase());
        let clean = chain(vec![upper, remove_prefix("/root")]);
        assert_eq!(clean("/root/src/a.rs"), "/ROOT/SRC/A.RS");
    }
}
