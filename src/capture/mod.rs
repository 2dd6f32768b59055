//! Screen capture domain: public API.
//!
//! `region` holds the pure cropping and encoding logic, `screenshot` talks
//! to the OS through `xcap`. Callers go through the [`Grabber`] trait so a
//! session can run against a test double.

mod region;
mod screenshot;

pub use region::{crop_region, write_jpeg, CropError};
pub use screenshot::{clip_to_monitor, pick_monitor, CaptureError, MonitorRect, ScreenGrabber};

use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// Rectangle of the screen to capture, in raw pixel offsets.
///
/// Width and height are signed so that hand-edited or mistyped values
/// survive loading and can be rejected at capture time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// True when both dimensions are strictly positive.
    pub fn has_area(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Right and bottom edges, exclusive.
    pub fn right(&self) -> i64 {
        self.left as i64 + self.width as i64
    }

    pub fn bottom(&self) -> i64 {
        self.top as i64 + self.height as i64
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::new(0, 0, 2560, 1440)
    }
}

/// Source of screen pixels for a region.
pub trait Grabber {
    fn grab(&self, region: &Region) -> Result<DynamicImage, CaptureError>;
}
