//! CLI output formatting.
//!
//! Each command has `format_*` functions returning `Vec<String>` and a
//! `print_*` wrapper that writes to stdout. Format functions are pure: no I/O,
//! no side effects.
//!
//! ## Pages
//!
//! ```text
//! Language en (2 pages)
//!     → ./about.html
//!     → ./index.html
//! Language fr (1 page)
//!     → ./about.fr.html
//!
//! Assembled 3 pages in 2 languages
//! ```
//!
//! ## Gallery
//!
//! ```text
//! 001 Snapshot-12.jpg → screen_1.jpg (screen_1_thumb.jpg)
//! 002 Snapshot-17.jpg → screen_2.jpg (screen_2_thumb.jpg)
//! ```

use crate::assemble::{AssembleEvent, AssembleReport, PlannedPage};
use crate::gallery::{GalleryEvent, GalleryItem, GalleryReport};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// Pages
// ============================================================================

/// Format a single assembly progress event as display lines.
pub fn format_assemble_event(event: &AssembleEvent) -> Vec<String> {
    match event {
        AssembleEvent::LanguageStarted { code, page_count } => {
            vec![format!("Language {} ({})", code, plural(*page_count, "page"))]
        }
        AssembleEvent::PageWritten { output, .. } => {
            vec![format!("    \u{2192} {}", output.display())]
        }
    }
}

pub fn format_assemble_summary(report: &AssembleReport) -> Vec<String> {
    vec![
        String::new(),
        format!(
            "Assembled {} in {}",
            plural(report.pages, "page"),
            plural(report.languages, "language")
        ),
    ]
}

/// Format the `check` listing: every page grouped by language.
pub fn format_plan(planned: &[PlannedPage]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Option<&str> = None;
    for page in planned {
        if current != Some(page.language.as_str()) {
            lines.push(format!("Language {}", page.language));
            current = Some(page.language.as_str());
        }
        lines.push(format!(
            "    {} \u{2192} {}",
            file_name(&page.source),
            page.output.display()
        ));
    }
    lines.push(String::new());
    lines.push(format!("{} would be written", plural(planned.len(), "page")));
    lines
}

pub fn print_assemble_event(event: &AssembleEvent) {
    for line in format_assemble_event(event) {
        println!("{}", line);
    }
}

pub fn print_assemble_summary(report: &AssembleReport) {
    for line in format_assemble_summary(report) {
        println!("{}", line);
    }
}

pub fn print_plan(planned: &[PlannedPage]) {
    for line in format_plan(planned) {
        println!("{}", line);
    }
}

// ============================================================================
// Gallery
// ============================================================================

fn item_line(item: &GalleryItem) -> String {
    format!(
        "{} {} \u{2192} {} ({})",
        format_index(item.index),
        file_name(&item.source),
        item.image,
        item.thumbnail
    )
}

/// Format a single gallery event.
///
/// Planned items are listed with their target names; processed items are
/// marked done so an interrupted run shows how far it got.
pub fn format_gallery_event(event: &GalleryEvent) -> Vec<String> {
    match event {
        GalleryEvent::Planned(item) => vec![item_line(item)],
        GalleryEvent::Processed(item) => vec![format!("    done {}", item.image)],
        GalleryEvent::FragmentWritten { path, count } => {
            vec![format!(
                "Wrote {} with {}",
                path.display(),
                plural(*count, "image")
            )]
        }
    }
}

pub fn format_gallery_summary(report: &GalleryReport) -> Vec<String> {
    vec![format!(
        "Gallery complete: {} \u{2192} {}",
        plural(report.images, "image"),
        file_name(&report.fragment)
    )]
}

pub fn print_gallery_event(event: &GalleryEvent) {
    for line in format_gallery_event(event) {
        println!("{}", line);
    }
}

pub fn print_gallery_summary(report: &GalleryReport) {
    for line in format_gallery_summary(report) {
        println!("{}", line);
    }
}
