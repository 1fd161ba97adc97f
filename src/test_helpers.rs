//! Shared test utilities.
//!
//! Builds throwaway site trees in a [`TempDir`] so tests can mutate them
//! freely.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_bilingual_site();
//! assemble(tmp.path(), &bilingual_config(), |_| {}).unwrap();
//! assert!(read(tmp.path(), "about.fr.html").contains("Bonjour"));
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::config::{Language, SiteConfig};

// =========================================================================
// Fixture setup
// =========================================================================

/// Write `contents` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

/// Read `root/rel` as a string. Panics with the path on failure.
pub fn read(root: &Path, rel: &str) -> String {
    let path = root.join(rel);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("could not read {}: {e}", path.display()))
}

/// English (default) and French.
pub fn bilingual_languages() -> Vec<Language> {
    vec![
        Language::new("en", Some("English"), true),
        Language::new("fr", Some("Français"), false),
    ]
}

pub fn bilingual_config() -> SiteConfig {
    SiteConfig {
        languages: bilingual_languages(),
        ..SiteConfig::default()
    }
}

/// A two-language site:
///
/// ```text
/// bits/en/head.html   <nav><a href="FR_URL">FR_TXT</a></nav>\n
/// bits/en/foot.html   <footer>en</footer>
/// bits/fr/head.html   <nav><a href="EN_URL">EN_TXT</a></nav>\n
/// bits/fr/foot.html   <footer>fr</footer>
/// pages/en/about.html Hello
/// pages/en/index.html Home
/// pages/en/CVS/Entries
/// pages/fr/about.html Bonjour
/// ```
pub fn setup_bilingual_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_file(
        root,
        "bits/en/head.html",
        "<nav><a href=\"FR_URL\">FR_TXT</a></nav>\n",
    );
    write_file(root, "bits/en/foot.html", "<footer>en</footer>");
    write_file(
        root,
        "bits/fr/head.html",
        "<nav><a href=\"EN_URL\">EN_TXT</a></nav>\n",
    );
    write_file(root, "bits/fr/foot.html", "<footer>fr</footer>");
    write_file(root, "pages/en/about.html", "Hello");
    write_file(root, "pages/en/index.html", "Home");
    write_file(root, "pages/en/CVS/Entries", "/about.html/1.1/");
    write_file(root, "pages/fr/about.html", "Bonjour");
    tmp
}
