//! Screenshot gallery builder.
//!
//! Turns a directory of freshly dropped screenshots into canonically named
//! images, thumbnails, and an HTML fragment that can be pasted into a page:
//!
//! ```text
//! gallery/0.3.0/                gallery/0.3.0/
//! ├── Snapshot-12.jpg      →    ├── screen_1.jpg
//! ├── Snapshot-17.jpg           ├── screen_1_thumb.jpg
//! └── build.sh                  ├── screen_2.jpg
//!                               ├── screen_2_thumb.jpg
//!                               ├── build.sh          (script, untouched)
//!                               └── frag.html
//! ```
//!
//! Renaming is destructive, so nothing happens unless the run is explicitly
//! confirmed. An unconfirmed run only reports what it would do.
//!
//! A failure midway leaves the images processed so far renamed; the builder
//! refuses to overwrite an existing canonical name, so a second run over the
//! same directory aborts on the first collision instead of clobbering it.

use crate::config::{CONFIG_FILE, GalleryConfig};
use crate::naming::canonical_names;
use crate::thumbnail::{ThumbnailError, ThumbnailParams, Thumbnailer};
use maud::html;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Dir open failed {}: {source}", .path.display())]
    List { path: PathBuf, source: io::Error },
    #[error("New filename exists: {}", .0.display())]
    NameCollision(PathBuf),
    #[error("Could not rename {} to {}: {source}", .from.display(), .to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
    #[error(transparent)]
    Thumbnail(#[from] ThumbnailError),
    #[error("Failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("Refusing to rename {count} file(s) without --confirm")]
    NotConfirmed { count: usize },
}

/// One image and the canonical names it will receive.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryItem {
    /// 1-based position in the listing.
    pub index: usize,
    /// File as found in the directory.
    pub source: PathBuf,
    /// Canonical image name, e.g. `screen_1.jpg`.
    pub image: String,
    /// Canonical thumbnail name, e.g. `screen_1_thumb.jpg`.
    pub thumbnail: String,
}

/// Progress reported while building.
#[derive(Debug, Clone, PartialEq)]
pub enum GalleryEvent {
    /// Reported for every item before anything is touched.
    Planned(GalleryItem),
    /// Renamed and thumbnailed.
    Processed(GalleryItem),
    FragmentWritten { path: PathBuf, count: usize },
}

/// Totals of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryReport {
    pub images: usize,
    pub fragment: PathBuf,
}

/// Entries of `dir` that are gallery images, sorted by name.
///
/// Subdirectories, hidden entries, the fragment file, `site.toml` or whichever
/// config file the run was loaded from, and anything whose name contains a
/// script marker are left out.
pub fn list_candidates(dir: &Path, config: &GalleryConfig) -> Result<Vec<PathBuf>, GalleryError> {
    let list_err = |source| GalleryError::List {
        path: dir.to_path_buf(),
        source,
    };
    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.')
            || name == config.fragment_file
            || name == CONFIG_FILE
            || name == config.config_file
        {
            continue;
        }
        if config
            .script_markers
            .iter()
            .any(|marker| name.contains(marker.as_str()))
        {
            continue;
        }
        candidates.push(path);
    }
    candidates.sort();
    Ok(candidates)
}

/// Assign canonical names to every candidate in `dir`.
pub fn plan(dir: &Path, config: &GalleryConfig) -> Result<Vec<GalleryItem>, GalleryError> {
    Ok(list_candidates(dir, config)?
        .into_iter()
        .enumerate()
        .map(|(i, source)| {
            let (image, thumbnail) = canonical_names(i + 1);
            GalleryItem {
                index: i + 1,
                source,
                image,
                thumbnail,
            }
        })
        .collect())
}

/// Render the gallery fragment: one linked thumbnail per item.
pub fn render_fragment(items: &[GalleryItem], config: &GalleryConfig) -> String {
    let [width, height] = config.thumb_size;
    let prefix = &config.url_prefix;
    html! {
        div.thumbnails {
            @for item in items {
                a href=(format!("{prefix}{}", item.image)) title="" {
                    img src=(format!("{prefix}{}", item.thumbnail)) alt="" width=(width) height=(height);
                }
            }
        }
    }
    .into_string()
}

/// Rename, thumbnail, and write the fragment for every image in `dir`.
///
/// Without `confirm`, every item is reported as [`GalleryEvent::Planned`] and
/// the run stops with [`GalleryError::NotConfirmed`] before touching any file.
pub fn build(
    dir: &Path,
    config: &GalleryConfig,
    thumbnailer: &dyn Thumbnailer,
    confirm: bool,
    mut on_event: impl FnMut(GalleryEvent),
) -> Result<GalleryReport, GalleryError> {
    let items = plan(dir, config)?;
    for item in &items {
        on_event(GalleryEvent::Planned(item.clone()));
    }
    if !confirm {
        return Err(GalleryError::NotConfirmed { count: items.len() });
    }

    let [width, height] = config.thumb_size;
    for item in &items {
        let image_path = dir.join(&item.image);
        if image_path.exists() {
            return Err(GalleryError::NameCollision(image_path));
        }
        fs::rename(&item.source, &image_path).map_err(|source| GalleryError::Rename {
            from: item.source.clone(),
            to: image_path.clone(),
            source,
        })?;
        thumbnailer.thumbnail(&ThumbnailParams {
            source: image_path,
            output: dir.join(&item.thumbnail),
            width,
            height,
        })?;
        on_event(GalleryEvent::Processed(item.clone()));
    }

    let fragment = dir.join(&config.fragment_file);
    fs::write(&fragment, render_fragment(&items, config)).map_err(|source| {
        GalleryError::Write {
            path: fragment.clone(),
            source,
        }
    })?;
    on_event(GalleryEvent::FragmentWritten {
        path: fragment.clone(),
        count: items.len(),
    });

    Ok(GalleryReport {
        images: items.len(),
        fragment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use crate::thumbnail::tests::MockThumbnailer;
    use tempfile::TempDir;

    fn screenshot_dir() -> TempDir {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "b-shot.jpg", "B");
        write_file(tmp.path(), "a-shot.png", "A");
        write_file(tmp.path(), "make_gallery.php", "<?php");
        write_file(tmp.path(), "resize.sh", "#!/bin/sh");
        write_file(tmp.path(), ".DS_Store", "");
        write_file(tmp.path(), "old/screen_9.jpg", "old");
        tmp
    }

    #[test]
    fn candidates_skip_scripts_dirs_and_hidden() {
        let tmp = screenshot_dir();
        let names: Vec<String> = list_candidates(tmp.path(), &GalleryConfig::default())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a-shot.png", "b-shot.jpg"]);
    }

    #[test]
    fn candidates_skip_fragment_and_config() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "frag.html", "<div></div>");
        write_file(tmp.path(), "site.toml", "");
        write_file(tmp.path(), "shot.jpg", "x");
        let candidates = list_candidates(tmp.path(), &GalleryConfig::default()).unwrap();
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn plan_numbers_from_one() {
        let tmp = screenshot_dir();
        let items = plan(tmp.path(), &GalleryConfig::default()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].index, 1);
        assert_eq!(items[0].image, "screen_1.jpg");
        assert!(items[0].source.ends_with("a-shot.png"));
        assert_eq!(items[1].thumbnail, "screen_2_thumb.jpg");
    }

    #[test]
    fn render_fragment_markup() {
        let items = vec![GalleryItem {
            index: 1,
            source: PathBuf::from("x.jpg"),
            image: "screen_1.jpg".to_string(),
            thumbnail: "screen_1_thumb.jpg".to_string(),
        }];
        let html = render_fragment(&items, &GalleryConfig::default());
        assert_eq!(
            html,
            "<div class=\"thumbnails\"><a href=\"gallery/0.3.0/screen_1.jpg\" title=\"\">\
             <img src=\"gallery/0.3.0/screen_1_thumb.jpg\" alt=\"\" width=\"128\" height=\"96\">\
             </a></div>"
        );
    }

    #[test]
    fn render_fragment_empty_gallery() {
        assert_eq!(
            render_fragment(&[], &GalleryConfig::default()),
            "<div class=\"thumbnails\"></div>"
        );
    }

    #[test]
    fn render_fragment_escapes_prefix() {
        let config = GalleryConfig {
            url_prefix: "a\"b/".to_string(),
            ..GalleryConfig::default()
        };
        let items = plan_for(&["x.jpg"]);
        assert!(render_fragment(&items, &config).contains("a&quot;b/screen_1.jpg"));
    }

    fn plan_for(names: &[&str]) -> Vec<GalleryItem> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let (image, thumbnail) = canonical_names(i + 1);
                GalleryItem {
                    index: i + 1,
                    source: PathBuf::from(name),
                    image,
                    thumbnail,
                }
            })
            .collect()
    }

    #[test]
    fn unconfirmed_build_touches_nothing() {
        let tmp = screenshot_dir();
        let thumbs = MockThumbnailer::new();
        let mut events = Vec::new();

        let result = build(
            tmp.path(),
            &GalleryConfig::default(),
            &thumbs,
            false,
            |e| events.push(e),
        );

        assert!(matches!(result, Err(GalleryError::NotConfirmed { count: 2 })));
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| matches!(e, GalleryEvent::Planned(_))));
        assert!(tmp.path().join("a-shot.png").exists());
        assert!(!tmp.path().join("screen_1.jpg").exists());
        assert!(!tmp.path().join("frag.html").exists());
        assert!(thumbs.get_requests().is_empty());
    }

    #[test]
    fn confirmed_build_renames_and_thumbnails() {
        let tmp = screenshot_dir();
        let thumbs = MockThumbnailer::new();

        let report = build(tmp.path(), &GalleryConfig::default(), &thumbs, true, |_| {}).unwrap();

        assert_eq!(report.images, 2);
        assert_eq!(read(tmp.path(), "screen_1.jpg"), "A");
        assert_eq!(read(tmp.path(), "screen_2.jpg"), "B");
        assert!(tmp.path().join("screen_1_thumb.jpg").exists());
        assert!(tmp.path().join("screen_2_thumb.jpg").exists());
        assert!(!tmp.path().join("a-shot.png").exists());
        // Scripts and subdirectories untouched
        assert!(tmp.path().join("make_gallery.php").exists());
        assert!(tmp.path().join("old/screen_9.jpg").exists());

        let requests = thumbs.get_requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].source.ends_with("screen_1.jpg"));
        assert!(requests[0].output.ends_with("screen_1_thumb.jpg"));
        assert_eq!((requests[0].width, requests[0].height), (128, 96));

        let fragment = read(tmp.path(), "frag.html");
        assert_eq!(fragment.matches("<a ").count(), 2);
        assert!(fragment.contains("gallery/0.3.0/screen_2_thumb.jpg"));
    }

    #[test]
    fn collision_aborts_before_renaming() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "new-shot.jpg", "new");
        write_file(tmp.path(), "screen_1.jpg", "previous");
        let thumbs = MockThumbnailer::new();

        let result = build(tmp.path(), &GalleryConfig::default(), &thumbs, true, |_| {});

        assert!(matches!(result, Err(GalleryError::NameCollision(p)) if p.ends_with("screen_1.jpg")));
        assert_eq!(read(tmp.path(), "screen_1.jpg"), "previous");
        assert_eq!(read(tmp.path(), "new-shot.jpg"), "new");
        assert!(thumbs.get_requests().is_empty());
        assert!(!tmp.path().join("frag.html").exists());
    }

    #[test]
    fn collision_midway_keeps_earlier_work_and_touches_nothing_after() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "a.jpg", "a");
        write_file(tmp.path(), "b.jpg", "b");
        write_file(tmp.path(), "screen_2.jpg", "old");
        let thumbs = MockThumbnailer::new();

        let result = build(tmp.path(), &GalleryConfig::default(), &thumbs, true, |_| {});

        assert!(matches!(result, Err(GalleryError::NameCollision(p)) if p.ends_with("screen_2.jpg")));
        assert_eq!(read(tmp.path(), "screen_1.jpg"), "a");
        assert_eq!(read(tmp.path(), "b.jpg"), "b");
        assert_eq!(read(tmp.path(), "screen_2.jpg"), "old");
        assert!(!tmp.path().join("a.jpg").exists());
        assert_eq!(thumbs.get_requests().len(), 1);
        assert!(!tmp.path().join("frag.html").exists());
    }

    #[test]
    fn custom_config_file_is_never_a_candidate() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "shot.png", "x");
        write_file(tmp.path(), "custom.toml", "[gallery]\n");
        let config = GalleryConfig {
            config_file: "custom.toml".to_string(),
            ..GalleryConfig::default()
        };

        let names: Vec<String> = list_candidates(tmp.path(), &config)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["shot.png"]);

        build(tmp.path(), &config, &MockThumbnailer::new(), true, |_| {}).unwrap();
        assert_eq!(read(tmp.path(), "custom.toml"), "[gallery]\n");
    }

    #[test]
    fn thumbnail_failure_aborts_remaining_items() {
        let tmp = screenshot_dir();
        let thumbs = MockThumbnailer::failing_on(1);

        let result = build(tmp.path(), &GalleryConfig::default(), &thumbs, true, |_| {});

        assert!(matches!(result, Err(GalleryError::Thumbnail(_))));
        // First image was already renamed; the second was never touched
        assert!(tmp.path().join("screen_1.jpg").exists());
        assert!(tmp.path().join("b-shot.jpg").exists());
        assert!(!tmp.path().join("frag.html").exists());
    }

    #[test]
    fn fragment_is_overwritten() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "frag.html", "stale");
        write_file(tmp.path(), "shot.jpg", "x");

        build(
            tmp.path(),
            &GalleryConfig::default(),
            &MockThumbnailer::new(),
            true,
            |_| {},
        )
        .unwrap();

        let fragment = read(tmp.path(), "frag.html");
        assert!(fragment.starts_with("<div class=\"thumbnails\">"));
        assert!(!fragment.contains("stale"));
    }
}
