use crate::config::Padding;

use super::geometry::Point;
use super::types::TimelineEventProperties;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedBounds {
    pub height: f64,
    /// Vertical translation applied to every element.
    pub shift: f64,
}

/// Translate everything so the topmost extent sits `padding.top` below the
/// origin, and derive the surface height that holds all labels and the axis.
pub fn fit_vertically(
    events: &mut [TimelineEventProperties],
    axis_start: &mut Point,
    axis_end: &mut Point,
    padding: &Padding,
) -> FittedBounds {
    let axis_y = axis_start.y;
    let mut min_y = axis_y;
    let mut max_y = axis_y;
    for props in events.iter() {
        min_y = min_y.min(props.label.top());
        max_y = max_y.max(props.label.bottom());
    }

    let shift = padding.top - min_y;
    for props in events.iter_mut() {
        props.label.y += shift;
        props.stem.top += shift;
        props.stem.bottom += shift;
        props.point.y += shift;
    }
    axis_start.y += shift;
    axis_end.y += shift;

    FittedBounds {
        height: max_y - min_y + padding.top + padding.bottom,
        shift,
    }
}
