use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Linear interpolation from `a` (amount 0) to `b` (amount 1).
    pub fn lerp(a: Point, b: Point, amount: f64) -> Point {
        Point {
            x: a.x + (b.x - a.x) * amount,
            y: a.y + (b.y - a.y) * amount,
        }
    }
}

/// Label box. `y` grows downward, so `top <= bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Horizontal spans intersect once widened by `gap` on both sides.
    pub fn overlaps_horizontally(&self, other: &Rect, gap: f64) -> bool {
        self.left() - gap < other.right() && self.right() + gap > other.left()
    }

    pub fn overlaps_vertically(&self, other: &Rect, gap: f64) -> bool {
        self.top() - gap < other.bottom() && self.bottom() + gap > other.top()
    }

    pub fn overlaps(&self, other: &Rect, h_gap: f64, v_gap: f64) -> bool {
        self.overlaps_horizontally(other, h_gap) && self.overlaps_vertically(other, v_gap)
    }
}

/// Vertical stem between the axis point and a label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Line {
    pub top: f64,
    pub bottom: f64,
}

impl Line {
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            bottom: top + height,
        }
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}
