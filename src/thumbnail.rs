//! Thumbnail generation through an external image conversion program.
//!
//! The [`Thumbnailer`] trait is the seam between the gallery builder (which
//! decides what to produce) and the program that does the pixel work. The
//! production implementation, [`ConvertThumbnailer`], runs ImageMagick-style
//! commands:
//!
//! ```text
//! convert screen_1.jpg -adaptive-resize 128x96 screen_1_thumb.jpg
//! ```
//!
//! The call blocks until the program exits. A non-success exit status is an
//! error; there are no retries.

use crate::config::GalleryConfig;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThumbnailError {
    #[error("Could not run {program}: {source}")]
    Spawn { program: String, source: io::Error },
    #[error("Convert command failed \"{command}\" ({status})")]
    Failed { command: String, status: ExitStatus },
}

/// What to produce: `output` as a thumbnail of `source` fitting `width`x`height`.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl ThumbnailParams {
    pub fn geometry(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

pub trait Thumbnailer {
    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), ThumbnailError>;
}

/// Runs `<program> <source> <resize_flag> <WxH> <output>`.
#[derive(Debug, Clone)]
pub struct ConvertThumbnailer {
    program: String,
    resize_flag: String,
}

impl ConvertThumbnailer {
    pub fn new(program: impl Into<String>, resize_flag: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            resize_flag: resize_flag.into(),
        }
    }

    pub fn from_config(config: &GalleryConfig) -> Self {
        Self::new(&config.program, &config.resize_flag)
    }

    /// Arguments passed to the program, in order.
    pub fn args(&self, params: &ThumbnailParams) -> Vec<OsString> {
        vec![
            params.source.clone().into_os_string(),
            OsString::from(&self.resize_flag),
            OsString::from(params.geometry()),
            params.output.clone().into_os_string(),
        ]
    }

    /// Human-readable command line, used in error messages.
    pub fn command_line(&self, params: &ThumbnailParams) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(
            self.args(params)
                .iter()
                .map(|a| a.to_string_lossy().into_owned()),
        );
        parts.join(" ")
    }
}

impl Thumbnailer for ConvertThumbnailer {
    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), ThumbnailError> {
        let status = Command::new(&self.program)
            .args(self.args(params))
            .status()
            .map_err(|source| ThumbnailError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if !status.success() {
            return Err(ThumbnailError::Failed {
                command: self.command_line(params),
                status,
            });
        }
        Ok(())
    }
}
