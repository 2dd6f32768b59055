//! Region capture using the `xcap` crate.
//!
//! This is the infrastructure layer: it talks to the OS. The region is
//! grabbed from the monitor containing its top-left corner and clipped to
//! that monitor, so a region larger than the screen still yields the part
//! that is visible. Neighbouring monitors are not stitched in.

use image::DynamicImage;
use std::time::Instant;
use xcap::Monitor;

use super::{crop_region, CropError, Grabber, Region};

/// Grabs screen regions from the real display.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScreenGrabber;

impl ScreenGrabber {
    pub fn new() -> Self {
        Self
    }
}

impl Grabber for ScreenGrabber {
    fn grab(&self, region: &Region) -> Result<DynamicImage, CaptureError> {
        if !region.has_area() {
            return Err(CaptureError::EmptyRegion {
                width: region.width,
                height: region.height,
            });
        }

        let start = Instant::now();

        let monitors = Monitor::all().map_err(|e| CaptureError::MonitorEnumeration(e.to_string()))?;
        let rects: Vec<Option<MonitorRect>> = monitors.iter().map(MonitorRect::of).collect();
        let primary = monitors.iter().position(|m| m.is_primary().unwrap_or(false));

        let index = pick_monitor(&rects, primary, region.left, region.top).ok_or(CaptureError::NoMonitor)?;
        let monitor = &monitors[index];
        let origin = rects[index].ok_or_else(|| {
            CaptureError::MonitorEnumeration("monitor geometry unavailable".to_string())
        })?;

        let image = monitor
            .capture_image()
            .map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;
        let screenshot = DynamicImage::ImageRgba8(image);

        log::info!(
            "[CAPTURE] Monitor at ({},{}) captured {}x{} in {}ms",
            origin.x,
            origin.y,
            screenshot.width(),
            screenshot.height(),
            start.elapsed().as_millis()
        );

        // Clip against the pixels we actually got back
        let bounds = MonitorRect {
            x: origin.x,
            y: origin.y,
            width: screenshot.width(),
            height: screenshot.height(),
        };
        let (x, y, width, height) = clip_to_monitor(&bounds, region).ok_or(CaptureError::OutsideMonitor {
            left: region.left,
            top: region.top,
        })?;

        if (width, height) != (region.width as u32, region.height as u32) {
            log::warn!(
                "[CAPTURE] Region {}x{} clipped to {}x{} by monitor bounds",
                region.width,
                region.height,
                width,
                height
            );
        }

        Ok(crop_region(&screenshot, x, y, width, height)?)
    }
}

/// Position and size of one monitor in global pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl MonitorRect {
    fn of(monitor: &Monitor) -> Option<Self> {
        Some(Self {
            x: monitor.x().ok()?,
            y: monitor.y().ok()?,
            width: monitor.width().ok()?,
            height: monitor.height().ok()?,
        })
    }

    fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        let (x, y) = (x as i64, y as i64);
        x >= self.x as i64 && y >= self.y as i64 && x < self.right() && y < self.bottom()
    }
}

/// Index of the monitor containing (x, y).
///
/// Falls back to `primary`, then to the first monitor. Monitors whose
/// geometry could not be read never match the point.
pub fn pick_monitor(
    monitors: &[Option<MonitorRect>],
    primary: Option<usize>,
    x: i32,
    y: i32,
) -> Option<usize> {
    if let Some(index) = monitors
        .iter()
        .position(|m| m.is_some_and(|m| m.contains(x, y)))
    {
        return Some(index);
    }

    if monitors.is_empty() {
        return None;
    }

    log::warn!(
        "[CAPTURE] No monitor contains ({},{}), falling back to primary",
        x,
        y
    );
    Some(primary.filter(|&i| i < monitors.len()).unwrap_or(0))
}

/// Intersects `region` with `monitor` and translates the result into
/// monitor-local coordinates as (x, y, width, height).
///
/// Returns `None` when the two do not overlap.
pub fn clip_to_monitor(monitor: &MonitorRect, region: &Region) -> Option<(u32, u32, u32, u32)> {
    let left = (region.left as i64).max(monitor.x as i64);
    let top = (region.top as i64).max(monitor.y as i64);
    let right = region.right().min(monitor.right());
    let bottom = region.bottom().min(monitor.bottom());

    if right <= left || bottom <= top {
        return None;
    }

    Some((
        (left - monitor.x as i64) as u32,
        (top - monitor.y as i64) as u32,
        (right - left) as u32,
        (bottom - top) as u32,
    ))
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Failed to enumerate monitors: {0}")]
    MonitorEnumeration(String),

    #[error("No monitor found")]
    NoMonitor,

    #[error("Screen capture failed: {0}")]
    CaptureFailed(String),

    #[error("Region must have a positive size, got {width}x{height}")]
    EmptyRegion { width: i32, height: i32 },

    #[error("Region at ({left},{top}) does not overlap the captured monitor")]
    OutsideMonitor { left: i32, top: i32 },

    #[error(transparent)]
    Crop(#[from] CropError),
}
