use crate::config::AxisConfig;
use crate::ir::TimelineEvent;

use super::geometry::Point;
use super::types::Surface;

/// Axis endpoints for a surface, before any vertical fitting.
pub fn axis_endpoints(surface: Surface, axis: &AxisConfig) -> (Point, Point) {
    let y = surface.height * axis.line_position;
    (
        Point::new(surface.width * axis.start, y),
        Point::new(surface.width * axis.end, y),
    )
}

/// Maps event instants onto the axis segment.
#[derive(Debug, Clone, Copy)]
pub struct AxisMapper {
    start: Point,
    end: Point,
    min_time: f64,
    max_time: f64,
    count: usize,
}

impl AxisMapper {
    pub fn new(start: Point, end: Point, events: &[TimelineEvent]) -> Self {
        let mut min_time = f64::INFINITY;
        let mut max_time = f64::NEG_INFINITY;
        for event in events {
            let time = event.time();
            min_time = min_time.min(time);
            max_time = max_time.max(time);
        }
        Self {
            start,
            end,
            min_time,
            max_time,
            count: events.len(),
        }
    }

    /// Interpolation amount for `time`. A lone event, or a set whose
    /// instants are all equal, sits at the midpoint.
    pub fn ratio(&self, time: f64) -> f64 {
        let span = self.max_time - self.min_time;
        if self.count <= 1 || span <= 0.0 {
            return 0.5;
        }
        (time - self.min_time) / span
    }

    pub fn point_for(&self, event: &TimelineEvent) -> Point {
        Point::lerp(self.start, self.end, self.ratio(event.time()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{EventId, EventInput, parse_date};

    fn events(dates: &[&str]) -> Vec<TimelineEvent> {
        dates
            .iter()
            .enumerate()
            .map(|(idx, date)| {
                TimelineEvent::from_input(EventId(idx), EventInput::new(parse_date(date).unwrap()))
            })
            .collect()
    }

    #[test]
    fn endpoints_follow_surface_fractions() {
        let (start, end) = axis_endpoints(Surface::new(1000.0, 400.0), &AxisConfig::default());
        assert_eq!(start, Point::new(150.0, 200.0));
        assert_eq!(end, Point::new(850.0, 200.0));
    }

    #[test]
    fn extremes_land_on_endpoints() {
        let list = events(&["2021-01-01", "2021-06-01", "2021-12-01"]);
        let mapper = AxisMapper::new(Point::new(100.0, 0.0), Point::new(900.0, 0.0), &list);
        assert_eq!(mapper.point_for(&list[0]).x, 100.0);
        assert_eq!(mapper.point_for(&list[2]).x, 900.0);
        let mid = mapper.point_for(&list[1]).x;
        assert!(mid > 100.0 && mid < 900.0);
    }

    #[test]
    fn single_event_is_centered() {
        let list = events(&["2021-03-14"]);
        let mapper = AxisMapper::new(Point::new(100.0, 50.0), Point::new(900.0, 50.0), &list);
        assert_eq!(mapper.point_for(&list[0]), Point::new(500.0, 50.0));
    }

    #[test]
    fn same_instant_collapses_to_one_point() {
        let list = events(&["2021-03-14", "2021-03-14", "2021-03-14"]);
        let mapper = AxisMapper::new(Point::new(0.0, 0.0), Point::new(800.0, 0.0), &list);
        let xs: Vec<f64> = list.iter().map(|e| mapper.point_for(e).x).collect();
        assert!(xs.iter().all(|x| *x == xs[0] && x.is_finite()));
    }
}
