//! Keeps `tests/unit/` a mirror of `src/`
//!
//! Every library file `src/<path>.rs` pairs with `tests/unit/<path>.rs`.
//! Crate roots and `mod.rs` files only wire modules together and are left out
//! on both sides; `tests/unit/main.rs` is the test binary root that also holds
//! the shared fixtures.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::path::Path;
    use walkdir::WalkDir;

    const WIRING_FILES: &[&str] = &["lib.rs", "main.rs", "mod.rs"];

    fn is_rust_file(path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == "rs")
    }

    fn is_wiring_file(path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| WIRING_FILES.contains(&name))
    }

    /// `/`-separated paths of module files under `root`, relative to it
    fn module_files(root: &str) -> BTreeSet<String> {
        let root = Path::new(root);
        assert!(root.is_dir(), "{} is not a directory", root.display());

        WalkDir::new(root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| is_rust_file(path) && !is_wiring_file(path))
            .filter_map(|path| {
                let relative = path.strip_prefix(root).ok()?;
                let parts: Vec<_> = relative.iter().map(|p| p.to_string_lossy()).collect();
                Some(parts.join("/"))
            })
            .collect()
    }

    fn listing(paths: &[&String], from: &str, to: &str) -> String {
        paths
            .iter()
            .map(|path| format!("  - {from}/{path} -> {to}/{path}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_every_library_file_has_unit_tests() {
        let sources = module_files("src");
        let unit_tests = module_files("tests/unit");

        let untested: Vec<_> = sources.difference(&unit_tests).collect();
        assert!(
            untested.is_empty(),
            "Library files without a unit test file:\n{}",
            listing(&untested, "src", "tests/unit")
        );
    }

    #[test]
    fn test_every_unit_test_file_has_a_library_file() {
        let sources = module_files("src");
        let unit_tests = module_files("tests/unit");

        let stray: Vec<_> = unit_tests.difference(&sources).collect();
        assert!(
            stray.is_empty(),
            "Unit test files for code that no longer exists:\n{}",
            listing(&stray, "tests/unit", "src")
        );
    }

    #[test]
    fn test_test_files_define_tests() {
        let empty: Vec<String> = WalkDir::new("tests")
            .into_iter()
            .filter_map(Result::ok)
            .map(|entry| entry.into_path())
            .filter(|path| path.is_file() && is_rust_file(path) && !is_wiring_file(path))
            .filter(|path| !std::fs::read_to_string(path).is_ok_and(|text| text.contains("#[test]")))
            .map(|path| format!("  - {}", path.display()))
            .collect();

        assert!(
            empty.is_empty(),
            "Test files without a #[test] function:\n{}",
            empty.join("\n")
        );
    }
}
