//! Edge auto-scrolling while a drag is in progress.

/// Distance from a viewport edge, in pixels, at which scrolling kicks in.
pub const DEFAULT_MARGIN: f64 = 20.0;

/// Scroll speed, in pixels per step, with the pointer on the very edge.
pub const DEFAULT_MAX_SPEED: f64 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
    pub down: bool,
}

/// A scroll step. Negative values scroll towards the top or left.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollDelta {
    pub dx: f64,
    pub dy: f64,
}

impl ScrollDelta {
    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AutoScroll {
    margin: f64,
    max_speed: f64,
}

impl Default for AutoScroll {
    fn default() -> Self {
        Self::new(DEFAULT_MARGIN)
    }
}

impl AutoScroll {
    pub fn new(margin: f64) -> Self {
        Self {
            margin,
            max_speed: DEFAULT_MAX_SPEED,
        }
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// The step to apply now. Zero unless `dragging`, the pointer is down,
    /// and it sits within the margin of an edge. Speed grows linearly as
    /// the pointer approaches the edge.
    pub fn scroll_delta(&self, viewport: Viewport, pointer: Pointer, dragging: bool) -> ScrollDelta {
        if !dragging || !pointer.down || self.margin <= 0.0 {
            return ScrollDelta::default();
        }
        ScrollDelta {
            dx: self.axis(pointer.x, viewport.width),
            dy: self.axis(pointer.y, viewport.height),
        }
    }

    fn axis(&self, pos: f64, extent: f64) -> f64 {
        if pos < self.margin {
            -self.speed(self.margin - pos.max(0.0))
        } else if pos > extent - self.margin {
            self.speed(pos.min(extent) - (extent - self.margin))
        } else {
            0.0
        }
    }

    fn speed(&self, depth: f64) -> f64 {
        (depth / self.margin).min(1.0) * self.max_speed
    }
}
