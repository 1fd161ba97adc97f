//! Multi-language page assembly.
//!
//! Every content page is wrapped in its language's header and footer bits:
//!
//! ```text
//! site/
//! ├── site.toml
//! ├── bits/
//! │   ├── en/head.html         # Header with EN_URL, FR_URL, EN_TXT, FR_TXT
//! │   ├── en/foot.html
//! │   ├── fr/head.html
//! │   └── fr/foot.html
//! ├── pages/
//! │   ├── en/about.html        # → about.html
//! │   └── fr/about.html        # → about.fr.html
//! ├── about.html               # written
//! └── about.fr.html            # written
//! ```
//!
//! ## Placeholders
//!
//! Headers carry two tokens per configured language, named after the
//! upper-cased language code:
//!
//! - `FR_URL` → the current page's file name as seen in French
//!   (`about.fr.html`, or `about.html` for the default language)
//! - `FR_TXT` → the French display label, or `[MISSING]` when none is set
//!
//! Substitution starts from the pristine header for every page, so nothing
//! leaks from one page into the next.
//!
//! ## Byte Fidelity
//!
//! Page bodies and footers are copied as raw bytes. Only the header has to be
//! UTF-8, since it is the one fragment that is rewritten.

use crate::config::{Language, SiteConfig};
use crate::naming::{is_ignored_entry, output_filename};
use std::cmp::Reverse;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Label substituted for a `_TXT` placeholder whose language has no label.
pub const MISSING_LABEL: &str = "[MISSING]";

const HEAD_FILE: &str = "head.html";
const FOOT_FILE: &str = "foot.html";

#[derive(Error, Debug)]
pub enum AssembleError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("Failed to list {}: {source}", .path.display())]
    List { path: PathBuf, source: io::Error },
    #[error("Failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("Header fragment is not valid UTF-8: {}", .0.display())]
    HeadEncoding(PathBuf),
    #[error("Missing fragment: {}", .0.display())]
    MissingFragment(PathBuf),
    #[error("Page file name is not valid UTF-8: {}", .0.display())]
    NonUtf8Name(PathBuf),
}

/// Where the bits, pages and output live for one site root.
#[derive(Debug, Clone)]
pub struct Layout {
    bits_dir: PathBuf,
    pages_dir: PathBuf,
    output_dir: PathBuf,
}

impl Layout {
    pub fn new(root: &Path, config: &SiteConfig) -> Self {
        Self {
            bits_dir: under(root, &config.bits_dir),
            pages_dir: under(root, &config.pages_dir),
            output_dir: under(root, &config.output_dir),
        }
    }

    pub fn head_path(&self, lang: &Language) -> PathBuf {
        self.bits_dir.join(&lang.code).join(HEAD_FILE)
    }

    pub fn foot_path(&self, lang: &Language) -> PathBuf {
        self.bits_dir.join(&lang.code).join(FOOT_FILE)
    }

    pub fn pages_dir(&self, lang: &Language) -> PathBuf {
        self.pages_dir.join(&lang.code)
    }

    pub fn output_path(&self, page_name: &str, lang: &Language) -> PathBuf {
        self.output_dir
            .join(output_filename(page_name, &lang.code, lang.is_default))
    }
}

/// Header and footer of one language.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragments {
    pub head: String,
    pub foot: Vec<u8>,
}

impl Fragments {
    /// Load `head.html` and `foot.html` for `lang`.
    pub fn load(layout: &Layout, lang: &Language) -> Result<Self, AssembleError> {
        let head_path = layout.head_path(lang);
        let head = String::from_utf8(read_file(&head_path)?)
            .map_err(|_| AssembleError::HeadEncoding(head_path))?;
        let foot = read_file(&layout.foot_path(lang))?;
        Ok(Self { head, foot })
    }
}

/// A page that `assemble` would write.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedPage {
    pub language: String,
    pub source: PathBuf,
    pub output: PathBuf,
}

/// Progress reported while assembling.
#[derive(Debug, Clone, PartialEq)]
pub enum AssembleEvent {
    LanguageStarted { code: String, page_count: usize },
    PageWritten { language: String, output: PathBuf },
}

/// Totals of a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssembleReport {
    pub languages: usize,
    pub pages: usize,
}

/// Resolve every `<CODE>_URL` and `<CODE>_TXT` token in `head` for `page_name`.
///
/// Longer codes are substituted first so that a code which is a suffix of
/// another (`br` inside `pt_br`) cannot eat part of the longer token.
pub fn substitute_placeholders(head: &str, page_name: &str, languages: &[Language]) -> String {
    let mut ordered: Vec<&Language> = languages.iter().collect();
    ordered.sort_by_key(|l| Reverse(l.code.len()));

    let mut out = head.to_string();
    for lang in &ordered {
        let token = format!("{}_URL", lang.code.to_uppercase());
        let url = output_filename(page_name, &lang.code, lang.is_default);
        out = out.replace(&token, &url);
    }
    for lang in &ordered {
        let token = format!("{}_TXT", lang.code.to_uppercase());
        let label = lang.label.as_deref().unwrap_or(MISSING_LABEL);
        out = out.replace(&token, label);
    }
    out
}

/// `header + body + footer`, with the header resolved for `page_name`.
pub fn assemble_page(
    fragments: &Fragments,
    body: &[u8],
    page_name: &str,
    languages: &[Language],
) -> Vec<u8> {
    let head = substitute_placeholders(&fragments.head, page_name, languages);
    let mut out = Vec::with_capacity(head.len() + body.len() + fragments.foot.len());
    out.extend_from_slice(head.as_bytes());
    out.extend_from_slice(body);
    out.extend_from_slice(&fragments.foot);
    out
}

/// List the content pages of one language directory, sorted by name.
///
/// Hidden entries, the `CVS` directory and any other subdirectory are skipped.
pub fn list_pages(dir: &Path) -> Result<Vec<PathBuf>, AssembleError> {
    let list_err = |source| AssembleError::List {
        path: dir.to_path_buf(),
        source,
    };
    let mut pages = Vec::new();
    for entry in fs::read_dir(dir).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        let name = entry.file_name();
        if is_ignored_entry(&name.to_string_lossy()) {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        pages.push(path);
    }
    pages.sort();
    Ok(pages)
}

/// Compute every page `assemble` would write, without writing anything.
///
/// Fails on the first missing fragment or unreadable page directory, exactly
/// where `assemble` would.
pub fn plan(root: &Path, config: &SiteConfig) -> Result<Vec<PlannedPage>, AssembleError> {
    let layout = Layout::new(root, config);
    let mut planned = Vec::new();
    for lang in &config.languages {
        for fragment in [layout.head_path(lang), layout.foot_path(lang)] {
            if !fragment.is_file() {
                return Err(AssembleError::MissingFragment(fragment));
            }
        }
        for source in list_pages(&layout.pages_dir(lang))? {
            let name = page_name(&source)?;
            planned.push(PlannedPage {
                language: lang.code.clone(),
                output: layout.output_path(&name, lang),
                source,
            });
        }
    }
    Ok(planned)
}

/// Assemble every page of every configured language into the output directory.
///
/// Any read or write failure aborts the run; pages written before the failure
/// stay on disk.
pub fn assemble(
    root: &Path,
    config: &SiteConfig,
    mut on_event: impl FnMut(AssembleEvent),
) -> Result<AssembleReport, AssembleError> {
    let layout = Layout::new(root, config);
    fs::create_dir_all(&layout.output_dir).map_err(|source| AssembleError::Write {
        path: layout.output_dir.clone(),
        source,
    })?;

    let mut report = AssembleReport::default();
    for lang in &config.languages {
        let fragments = Fragments::load(&layout, lang)?;
        let pages = list_pages(&layout.pages_dir(lang))?;
        on_event(AssembleEvent::LanguageStarted {
            code: lang.code.clone(),
            page_count: pages.len(),
        });

        for source in &pages {
            let name = page_name(source)?;
            let body = read_file(source)?;
            let html = assemble_page(&fragments, &body, &name, &config.languages);
            let output = layout.output_path(&name, lang);
            write_output(&output, &html)?;
            on_event(AssembleEvent::PageWritten {
                language: lang.code.clone(),
                output,
            });
            report.pages += 1;
        }
        report.languages += 1;
    }
    Ok(report)
}

fn under(root: &Path, rel: &str) -> PathBuf {
    if rel.is_empty() || rel == "." {
        root.to_path_buf()
    } else {
        root.join(rel)
    }
}

/// Page names are spliced into header text, so they must be UTF-8.
fn page_name(path: &Path) -> Result<String, AssembleError> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| AssembleError::NonUtf8Name(path.to_path_buf()))
}

fn read_file(path: &Path) -> Result<Vec<u8>, AssembleError> {
    fs::read(path).map_err(|source| AssembleError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace whatever sits at `path` with `contents`.
fn write_output(path: &Path, contents: &[u8]) -> Result<(), AssembleError> {
    // Absent is fine; a real permission problem resurfaces on write.
    let _ = fs::remove_file(path);
    fs::write(path, contents).map_err(|source| AssembleError::Write {
        path: path.to_path_buf(),
        source,
    })
}
