use crate::ir::{Placement, TimelineEvent};

/// Indices into the chronologically sorted event list, split by side.
/// Each list keeps the relative date order of the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SidePartition {
    pub up: Vec<usize>,
    pub down: Vec<usize>,
}

impl SidePartition {
    pub fn side(&self, placement: Placement) -> &[usize] {
        match placement {
            Placement::Up => &self.up,
            Placement::Down => &self.down,
        }
    }
}

/// Stable chronological order of `events`, as indices. Ties keep their
/// insertion order.
pub fn chronological_order(events: &[TimelineEvent]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..events.len()).collect();
    order.sort_by_key(|&idx| events[idx].date);
    order
}

/// Side for the event at `position` in the sorted list. An explicit
/// request always wins; otherwise alternate mode uses index parity and
/// non-alternate mode defaults to `Up`.
pub fn resolve_placement(event: &TimelineEvent, position: usize, alternate: bool) -> Placement {
    match event.requested_placement {
        Some(placement) => placement,
        None if alternate => Placement::alternating(position),
        None => Placement::Up,
    }
}

pub fn partition_sides(placements: &[Placement]) -> SidePartition {
    let mut partition = SidePartition::default();
    for (position, placement) in placements.iter().enumerate() {
        match placement {
            Placement::Up => partition.up.push(position),
            Placement::Down => partition.down.push(position),
        }
    }
    partition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{EventId, EventInput, parse_date};

    fn event(id: usize, date: &str, placement: Option<Placement>) -> TimelineEvent {
        let mut input = EventInput::new(parse_date(date).unwrap());
        input.placement = placement;
        TimelineEvent::from_input(EventId(id), input)
    }

    #[test]
    fn sort_is_stable_for_equal_dates() {
        let events = vec![
            event(0, "2021-03-01", None),
            event(1, "2021-01-01", None),
            event(2, "2021-03-01", None),
            event(3, "2021-02-01", None),
        ];
        assert_eq!(chronological_order(&events), vec![1, 3, 0, 2]);
    }

    #[test]
    fn alternate_mode_uses_sorted_position() {
        let plain = event(0, "2021-01-01", None);
        assert_eq!(resolve_placement(&plain, 0, true), Placement::Up);
        assert_eq!(resolve_placement(&plain, 1, true), Placement::Down);
        assert_eq!(resolve_placement(&plain, 1, false), Placement::Up);
    }

    #[test]
    fn explicit_placement_overrides_policy() {
        let pinned = event(0, "2021-01-01", Some(Placement::Down));
        assert_eq!(resolve_placement(&pinned, 0, true), Placement::Down);
        assert_eq!(resolve_placement(&pinned, 0, false), Placement::Down);
    }

    #[test]
    fn partition_preserves_order_within_sides() {
        use Placement::*;
        let partition = partition_sides(&[Up, Down, Up, Up, Down]);
        assert_eq!(partition.up, vec![0, 2, 3]);
        assert_eq!(partition.down, vec![1, 4]);
        assert_eq!(partition.side(Down), &[1, 4]);
    }
}
