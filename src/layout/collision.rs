//! Same-side label stacking.
//!
//! Labels are placed one at a time in chronological order. Each starts at
//! the base stem length from its axis point and is pushed away from the
//! axis past every earlier label it collides with, so later events always
//! yield to earlier ones. The stem grows with the push.

use crate::ir::Placement;

use super::geometry::{Line, Point, Rect};
use super::types::LabelSize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionConfig {
    pub base_stem_length: f64,
    pub vertical_gap: f64,
    pub horizontal_gap: f64,
}

/// One event waiting to be placed: its axis point and measured label.
#[derive(Debug, Clone, Copy)]
pub struct PendingLabel {
    pub index: usize,
    pub point: Point,
    pub size: LabelSize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedLabel {
    pub index: usize,
    pub point: Point,
    pub label: Rect,
    pub stem: Line,
}

/// Label and stem at the base stem length, before collision handling.
pub fn initial_placement(
    side: Placement,
    point: Point,
    size: LabelSize,
    stem_length: f64,
) -> (Rect, Line) {
    let x = point.x - size.width / 2.0;
    match side {
        Placement::Up => (
            Rect::new(x, point.y - stem_length - size.height, size.width, size.height),
            Line::new(point.y - stem_length, stem_length),
        ),
        Placement::Down => (
            Rect::new(x, point.y + stem_length, size.width, size.height),
            Line::new(point.y, stem_length),
        ),
    }
}

/// Place every label of one side. `pending` must be in chronological order.
pub fn resolve_side(
    side: Placement,
    pending: &[PendingLabel],
    config: &CollisionConfig,
) -> Vec<PlacedLabel> {
    let mut placed: Vec<PlacedLabel> = Vec::with_capacity(pending.len());
    let h_gap = config.horizontal_gap;
    let v_gap = config.vertical_gap;

    for item in pending {
        let (mut label, mut stem) =
            initial_placement(side, item.point, item.size, config.base_stem_length);

        // Anything sharing horizontal space could collide once we move.
        let mut candidates: Vec<Rect> = placed
            .iter()
            .map(|other| other.label)
            .filter(|other| label.overlaps_horizontally(other, h_gap))
            .collect();

        match side {
            Placement::Up => candidates.sort_by(|a, b| b.top().total_cmp(&a.top())),
            Placement::Down => candidates.sort_by(|a, b| a.bottom().total_cmp(&b.bottom())),
        }

        let mut pushes = 0usize;
        for neighbor in &candidates {
            let blocked = candidates
                .iter()
                .any(|other| label.overlaps(other, h_gap, v_gap));
            if !blocked {
                break;
            }
            let shift = match side {
                Placement::Up => (neighbor.top() - v_gap) - label.bottom(),
                Placement::Down => (neighbor.bottom() + v_gap) - label.top(),
            };
            label.y += shift;
            match side {
                Placement::Up => stem.top = label.bottom(),
                Placement::Down => stem.bottom = label.top(),
            }
            pushes += 1;
        }

        if pushes > 0 {
            tracing::trace!(
                index = item.index,
                ?side,
                pushes,
                stem = stem.height(),
                "label pushed away from axis"
            );
        }

        placed.push(PlacedLabel {
            index: item.index,
            point: item.point,
            label,
            stem,
        });
    }

    placed
}
