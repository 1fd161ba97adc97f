//! # Site Assembler
//!
//! Build tooling for a small multi-language static website. Two independent
//! utilities live here:
//!
//! - **Page assembly**: wraps every content page in its language's header and
//!   footer bits and resolves the language-switcher placeholders in the header.
//! - **Gallery building**: renames a directory of screenshots to canonical
//!   `screen_N.jpg` names, creates thumbnails with an external conversion
//!   program, and writes an HTML fragment linking them all.
//!
//! ```text
//! site-assembler pages               bits/ + pages/  →  about.html, about.fr.html, ...
//! site-assembler check               same, but only lists what would be written
//! site-assembler gallery --confirm   screenshots     →  screen_N.jpg, thumbs, frag.html
//! site-assembler gen-config          documented site.toml on stdout
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`assemble`] | Header/body/footer concatenation and placeholder substitution |
//! | [`gallery`] | Canonical renaming, thumbnailing, fragment rendering with Maud |
//! | [`thumbnail`] | [`thumbnail::Thumbnailer`] seam and the external-program implementation |
//! | [`config`] | `site.toml` loading, merging over stock defaults, and validation |
//! | [`naming`] | Localized output names, ignored entries, canonical gallery names |
//! | [`invocation`] | Refuses to run from a web server (CGI) context |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Plain Concatenation, No Templates
//!
//! Fragments are opaque text. The only rewriting is literal token replacement
//! in headers (`FR_URL`, `FR_TXT`, ...), so page bodies and footers come out
//! byte-for-byte as they went in.
//!
//! ## Explicit Configuration
//!
//! Paths, the language table and gallery settings form one immutable
//! [`config::SiteConfig`] that is passed into each utility. Nothing reads
//! global state.
//!
//! ## Fail Fast
//!
//! Every error aborts the run and surfaces as a non-zero exit. Files written
//! before the failure stay on disk; rerunning `pages` simply rewrites them.
//!
//! ## Opt-In Renames
//!
//! The gallery builder renames files in place. It lists its plan and stops
//! unless `--confirm` is passed.

pub mod assemble;
pub mod config;
pub mod gallery;
pub mod invocation;
pub mod naming;
pub mod output;
pub mod thumbnail;

#[cfg(test)]
pub(crate) mod test_helpers;
