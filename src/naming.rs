//! File naming conventions shared by the page assembler and the gallery.
//!
//! ## Localized Names
//!
//! Non-default languages get a `.<lang>.` infix at the extension boundary,
//! which is the last dot of the name:
//! - `about.html` → `about.fr.html`
//! - `site.min.html` → `site.min.fr.html`
//! - `README` → `README.fr` (no extension, the code is appended)
//!
//! ## Canonical Gallery Names
//!
//! Gallery images are renamed to `screen_<n>.jpg` with a thumbnail at
//! `screen_<n>_thumb.jpg`, `n` counting from 1.

/// Legacy version-control directory that can sit among content pages.
pub const VCS_DIR: &str = "CVS";

/// Stem shared by all canonical gallery names.
pub const SCREEN_STEM: &str = "screen";

/// Whether a directory entry must never be treated as content.
///
/// Hidden entries (leading `.`) and the legacy `CVS` directory are skipped.
pub fn is_ignored_entry(name: &str) -> bool {
    name.starts_with('.') || name == VCS_DIR
}

/// Insert `.<lang>.` before the extension of `name`.
pub fn localized_filename(name: &str, lang: &str) -> String {
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}.{}.{}", &name[..dot], lang, &name[dot + 1..]),
        _ => format!("{name}.{lang}"),
    }
}

/// Output name of a page: untouched for the default language, localized otherwise.
pub fn output_filename(name: &str, lang: &str, is_default: bool) -> String {
    if is_default {
        name.to_string()
    } else {
        localized_filename(name, lang)
    }
}

/// Canonical image and thumbnail names for the 1-based gallery `index`.
pub fn canonical_names(index: usize) -> (String, String) {
    (
        format!("{SCREEN_STEM}_{index}.jpg"),
        format!("{SCREEN_STEM}_{index}_thumb.jpg"),
    )
}
