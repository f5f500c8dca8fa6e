use serde::{Deserialize, Serialize};

use crate::ir::{EventId, Placement};

use super::geometry::{Line, Point, Rect};

/// Pixel box a rendered label occupies, as reported by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelSize {
    pub width: f64,
    pub height: f64,
}

impl LabelSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Drawing surface the axis is laid out against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
}

impl Surface {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEventProperties {
    pub id: EventId,
    pub placement: Placement,
    pub point: Point,
    pub label: Rect,
    pub stem: Line,
}

/// Result of one layout pass. Events are listed in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineProperties {
    pub width: f64,
    pub height: f64,
    pub axis_y: f64,
    pub axis_start: Point,
    pub axis_end: Point,
    pub events: Vec<TimelineEventProperties>,
}

impl TimelineProperties {
    pub fn get(&self, id: EventId) -> Option<&TimelineEventProperties> {
        self.events.iter().find(|props| props.id == id)
    }

    pub fn side(&self, placement: Placement) -> impl Iterator<Item = &TimelineEventProperties> {
        self.events
            .iter()
            .filter(move |props| props.placement == placement)
    }
}
