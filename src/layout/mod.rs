mod axis;
mod bounds;
mod collision;
pub mod geometry;
mod measure;
mod partition;
pub(crate) mod types;
pub use axis::{AxisMapper, axis_endpoints};
pub use bounds::{FittedBounds, fit_vertically};
pub use collision::{CollisionConfig, PendingLabel, PlacedLabel, initial_placement, resolve_side};
pub use geometry::{Line, Point, Rect};
pub use measure::{
    FixedMeasurer, FnMeasurer, LabelMeasurer, SizeTableMeasurer, TextLabelMeasurer, label_lines,
};
pub use partition::{SidePartition, chronological_order, partition_sides, resolve_placement};
pub use types::*;

use crate::config::LayoutConfig;
use crate::ir::{Placement, TimelineEvent};

/// One full layout pass.
///
/// `events` may be in any order; they are sorted (stably) by date first.
/// Sides come from the alternate policy or each event's explicit request.
/// The result lists events chronologically and is a pure function of its
/// inputs.
pub fn compute_layout(
    events: &[TimelineEvent],
    config: &LayoutConfig,
    surface: Surface,
    measurer: &dyn LabelMeasurer,
) -> TimelineProperties {
    let order = chronological_order(events);
    let sorted: Vec<&TimelineEvent> = order.iter().map(|&idx| &events[idx]).collect();

    let (mut axis_start, mut axis_end) = axis_endpoints(surface, &config.axis);
    let mapper = AxisMapper::new(axis_start, axis_end, events);

    let placements: Vec<Placement> = sorted
        .iter()
        .enumerate()
        .map(|(position, event)| resolve_placement(event, position, config.alternate_sides))
        .collect();
    let sides = partition_sides(&placements);

    let collision = CollisionConfig {
        base_stem_length: config.base_stem_length,
        vertical_gap: config.vertical_gap,
        horizontal_gap: config.horizontal_gap,
    };

    let mut slots: Vec<Option<TimelineEventProperties>> = vec![None; sorted.len()];
    for side in [Placement::Up, Placement::Down] {
        let pending: Vec<PendingLabel> = sides
            .side(side)
            .iter()
            .map(|&position| PendingLabel {
                index: position,
                point: mapper.point_for(sorted[position]),
                size: measurer.measure(sorted[position]),
            })
            .collect();
        for placed in resolve_side(side, &pending, &collision) {
            slots[placed.index] = Some(TimelineEventProperties {
                id: sorted[placed.index].id,
                placement: side,
                point: placed.point,
                label: placed.label,
                stem: placed.stem,
            });
        }
    }
    let mut placed: Vec<TimelineEventProperties> = slots.into_iter().flatten().collect();

    let fitted = fit_vertically(&mut placed, &mut axis_start, &mut axis_end, &config.padding);
    tracing::debug!(
        events = placed.len(),
        up = sides.up.len(),
        down = sides.down.len(),
        height = fitted.height,
        "timeline layout pass"
    );

    TimelineProperties {
        width: surface.width,
        height: fitted.height,
        axis_y: axis_start.y,
        axis_start,
        axis_end,
        events: placed,
    }
}
