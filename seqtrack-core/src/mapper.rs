//! Coordinate mapping capability
//!
//! The zoom/pan controller owns the visible window; the track only borrows a
//! [`CoordinateMapper`] and re-reads it on every redraw.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Monotonic mapping from sequence coordinate to pixel x
///
/// Must accept any finite coordinate, including non-integers and values
/// outside the visible window.
pub trait CoordinateMapper {
    fn map(&self, coord: f64) -> f64;

    /// Pixel span of one coordinate unit at the current scale
    fn unit_width(&self) -> f64 {
        self.map(2.0) - self.map(1.0)
    }
}

impl<F> CoordinateMapper for F
where
    F: Fn(f64) -> f64,
{
    fn map(&self, coord: f64) -> f64 {
        self(coord)
    }
}

/// `x * scale + offset`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearMapper {
    pub scale: f64,
    pub offset: f64,
}

impl LinearMapper {
    pub fn new(scale: f64, offset: f64) -> Self {
        Self { scale, offset }
    }
}

impl CoordinateMapper for LinearMapper {
    fn map(&self, coord: f64) -> f64 {
        coord * self.scale + self.offset
    }
}

/// Visible window over a sequence of `length` residues drawn `width` pixels wide
///
/// The domain is `[display_start, display_end + 1]` so that the last visible
/// residue gets a full unit of width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomWindow {
    pub length: u64,
    pub display_start: f64,
    pub display_end: f64,
    pub width: f64,
}

impl ZoomWindow {
    pub fn new(length: u64, width: f64) -> Self {
        let length = length.max(1);
        Self {
            length,
            display_start: 1.0,
            display_end: length as f64,
            width,
        }
    }

    /// Set the visible range, clamped to the sequence
    pub fn set_display(&mut self, start: f64, end: f64) {
        let max = self.length as f64;
        let (mut start, mut end) = if end < start { (end, start) } else { (start, end) };
        start = start.clamp(1.0, max);
        end = end.clamp(start, max);
        self.display_start = start;
        self.display_end = end;
    }

    /// Zoom by `factor` (> 1 zooms in) keeping `center` fixed
    pub fn zoom(&mut self, factor: f64, center: f64) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        let start = center - (center - self.display_start) / factor;
        let end = center + (self.display_end - center) / factor;
        self.set_display(start, end);
    }

    /// Shift the window by `delta` units, keeping its span
    pub fn pan(&mut self, delta: f64) {
        let span = self.display_end - self.display_start;
        let max = self.length as f64;
        let start = (self.display_start + delta).clamp(1.0, (max - span).max(1.0));
        self.display_start = start;
        self.display_end = (start + span).min(max);
    }

    pub fn visible_units(&self) -> f64 {
        self.display_end + 1.0 - self.display_start
    }
}

impl CoordinateMapper for ZoomWindow {
    fn map(&self, coord: f64) -> f64 {
        let span = self.visible_units();
        if span <= 0.0 {
            return 0.0;
        }
        (coord - self.display_start) * self.width / span
    }
}

/// Shared handle onto a [`ZoomWindow`]
///
/// The controller mutates the window through one clone while the track maps
/// coordinates through another, so the track always sees the current window.
#[derive(Debug, Clone)]
pub struct ZoomHandle {
    window: Rc<RefCell<ZoomWindow>>,
}

impl ZoomHandle {
    pub fn new(window: ZoomWindow) -> Self {
        Self {
            window: Rc::new(RefCell::new(window)),
        }
    }

    pub fn window(&self) -> ZoomWindow {
        *self.window.borrow()
    }

    pub fn update<F: FnOnce(&mut ZoomWindow)>(&self, f: F) {
        f(&mut self.window.borrow_mut());
    }
}

impl CoordinateMapper for ZoomHandle {
    fn map(&self, coord: f64) -> f64 {
        self.window.borrow().map(coord)
    }
}
