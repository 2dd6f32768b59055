//! Capture session: the in-memory configuration plus the filename counter,
//! and the capture trigger that ties them together.
//!
//! The counter is never persisted. It is derived from the output folder
//! when the session starts or the folder changes, bumped after every
//! successful capture, and left alone when a capture fails so the same
//! filename is retried.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::capture::{self, CaptureError, CropError, Grabber, Region};
use crate::config::Config;
use crate::naming::{self, DEFAULT_PAD_WIDTH, IMAGE_EXTENSION};

pub struct Session<G: Grabber> {
    config: Config,
    counter: u64,
    grabber: G,
}

impl<G: Grabber> Session<G> {
    /// Starts a session, seeding the counter from the configured folder.
    pub fn new(config: Config, grabber: G) -> Self {
        let counter = derive_counter(&config);
        log::info!(
            "[SESSION] Output {} starts at counter {}",
            config.output_path.display(),
            counter
        );
        Self {
            config,
            counter,
            grabber,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Consumes the session, handing back the configuration to persist.
    pub fn into_config(self) -> Config {
        self.config
    }

    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Filename the next capture will be written under.
    pub fn next_filename(&self) -> String {
        naming::format_filename(
            &self.config.prefix,
            self.counter,
            &self.config.suffix,
            IMAGE_EXTENSION,
            DEFAULT_PAD_WIDTH,
        )
    }

    pub fn next_path(&self) -> PathBuf {
        self.config.output_path.join(self.next_filename())
    }

    pub fn reset_counter(&mut self) {
        self.counter = 1;
    }

    /// Overrides the counter. Callers collecting user input are expected to
    /// have rejected zero already.
    pub fn set_counter(&mut self, counter: u64) {
        self.counter = counter;
    }

    /// Selects a new output folder and re-derives the counter from it.
    pub fn set_output_path(&mut self, path: impl Into<PathBuf>) {
        self.config.output_path = path.into();
        self.rescan();
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.config.prefix = prefix.into();
    }

    pub fn set_suffix(&mut self, suffix: impl Into<String>) {
        self.config.suffix = suffix.into();
    }

    pub fn set_region(&mut self, region: Region) {
        self.config.region = region;
    }

    /// Re-derives the counter from the current folder, prefix and suffix.
    pub fn rescan(&mut self) {
        self.counter = derive_counter(&self.config);
        log::debug!("[SESSION] Rescanned, next counter {}", self.counter);
    }

    /// Captures the configured region into the next sequential file.
    ///
    /// Returns the written path. On error nothing is mutated and the next
    /// attempt reuses the same filename.
    pub fn capture(&mut self) -> Result<PathBuf, SnapError> {
        validate(&self.config)?;

        let start = Instant::now();
        let dir = &self.config.output_path;
        std::fs::create_dir_all(dir).map_err(|source| SnapError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let target = self.next_path();
        let image = self.grabber.grab(&self.config.region)?;
        capture::write_jpeg(&image, &target).map_err(|source| SnapError::Write {
            path: target.clone(),
            source,
        })?;

        self.counter = self.counter.saturating_add(1);
        log::info!(
            "[SESSION] Saved {} in {}ms",
            target.display(),
            start.elapsed().as_millis()
        );
        Ok(target)
    }
}

fn derive_counter(config: &Config) -> u64 {
    naming::next_counter(
        &config.output_path,
        &config.prefix,
        &config.suffix,
        IMAGE_EXTENSION,
    )
}

/// Checks the inputs a capture depends on without touching the filesystem.
pub fn validate(config: &Config) -> Result<(), SnapError> {
    if config.output_path.as_os_str().is_empty() {
        return Err(SnapError::EmptyOutputPath);
    }
    let region = config.region;
    if !region.has_area() {
        return Err(SnapError::InvalidRegion {
            width: region.width,
            height: region.height,
        });
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum SnapError {
    #[error("No output folder selected")]
    EmptyOutputPath,

    #[error("Region width and height must be positive, got {width}x{height}")]
    InvalidRegion { width: i32, height: i32 },

    #[error("Cannot create output folder {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("Cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: CropError,
    },
}

impl SnapError {
    /// Validation failures are the user's to fix; the rest come from the
    /// system.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SnapError::EmptyOutputPath | SnapError::InvalidRegion { .. }
        )
    }
}

/// Path of the folder a session writes into, for display.
pub fn describe_output(path: &Path) -> String {
    if path.as_os_str().is_empty() {
        "(no folder selected)".to_string()
    } else {
        path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbaImage};

    struct BlankGrabber;

    impl Grabber for BlankGrabber {
        fn grab(&self, region: &Region) -> Result<DynamicImage, CaptureError> {
            let image = RgbaImage::new(region.width as u32, region.height as u32);
            Ok(DynamicImage::ImageRgba8(image))
        }
    }

    fn config_in(dir: &Path) -> Config {
        Config {
            output_path: dir.to_path_buf(),
            prefix: "Shot-".into(),
            suffix: "-final".into(),
            region: Region::new(0, 0, 8, 8),
        }
    }

    #[test]
    fn next_filename_uses_prefix_suffix_and_padding() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(config_in(dir.path()), BlankGrabber);
        session.set_counter(7);
        assert_eq!(session.next_filename(), "Shot-0007-final.jpg");
    }

    #[test]
    fn reset_and_set_counter() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(config_in(dir.path()), BlankGrabber);
        session.set_counter(99);
        assert_eq!(session.counter(), 99);
        session.reset_counter();
        assert_eq!(session.counter(), 1);
    }

    #[test]
    fn validate_rejects_empty_path() {
        let mut config = config_in(Path::new("x"));
        config.output_path = PathBuf::new();
        assert!(matches!(validate(&config), Err(SnapError::EmptyOutputPath)));
    }

    #[test]
    fn validate_rejects_non_positive_dimensions() {
        let mut config = config_in(Path::new("x"));
        config.region = Region::new(0, 0, 0, 10);
        assert!(matches!(
            validate(&config),
            Err(SnapError::InvalidRegion { width: 0, height: 10 })
        ));
        config.region = Region::new(0, 0, 10, -5);
        let err = validate(&config).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn describe_output_handles_empty_path() {
        assert_eq!(describe_output(Path::new("")), "(no folder selected)");
        assert_eq!(describe_output(Path::new("shots")), "shots");
    }
}
