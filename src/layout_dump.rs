use crate::ir::{Placement, TimelineEvent};
use crate::layout::TimelineProperties;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: f64,
    pub height: f64,
    pub axis_y: f64,
    pub axis_start: [f64; 2],
    pub axis_end: [f64; 2],
    pub events: Vec<EventDump>,
}

#[derive(Debug, Serialize)]
pub struct EventDump {
    pub id: usize,
    pub date: String,
    pub description: String,
    pub placement: Placement,
    pub point: [f64; 2],
    /// x, y, width, height
    pub label: [f64; 4],
    pub stem_top: f64,
    pub stem_bottom: f64,
}

impl LayoutDump {
    pub fn from_layout(layout: &TimelineProperties, events: &[TimelineEvent]) -> Self {
        let by_id: HashMap<_, _> = events.iter().map(|event| (event.id, event)).collect();
        let events = layout
            .events
            .iter()
            .map(|props| {
                let event = by_id.get(&props.id);
                EventDump {
                    id: props.id.0,
                    date: event
                        .map(|e| e.date.format("%Y-%m-%dT%H:%M:%S").to_string())
                        .unwrap_or_default(),
                    description: event.map(|e| e.description.clone()).unwrap_or_default(),
                    placement: props.placement,
                    point: [props.point.x, props.point.y],
                    label: [
                        props.label.x,
                        props.label.y,
                        props.label.width,
                        props.label.height,
                    ],
                    stem_top: props.stem.top,
                    stem_bottom: props.stem.bottom,
                }
            })
            .collect();

        LayoutDump {
            width: layout.width,
            height: layout.height,
            axis_y: layout.axis_y,
            axis_start: [layout.axis_start.x, layout.axis_start.y],
            axis_end: [layout.axis_end.x, layout.axis_end.y],
            events,
        }
    }
}

pub fn layout_dump_json(layout: &TimelineProperties, events: &[TimelineEvent]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&LayoutDump::from_layout(layout, events))?)
}

pub fn write_layout_dump(
    path: &Path,
    layout: &TimelineProperties,
    events: &[TimelineEvent],
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, events);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::{EventId, EventInput, parse_date};
    use crate::layout::{FixedMeasurer, Surface, compute_layout};

    #[test]
    fn dump_carries_event_metadata() {
        let events = vec![TimelineEvent::from_input(
            EventId(7),
            EventInput::new(parse_date("2021-05-05").unwrap()).with_description("Only"),
        )];
        let layout = compute_layout(
            &events,
            &LayoutConfig::default(),
            Surface::new(1000.0, 400.0),
            &FixedMeasurer::new(40.0, 20.0),
        );
        let json: serde_json::Value =
            serde_json::from_str(&layout_dump_json(&layout, &events).unwrap()).unwrap();
        assert_eq!(json["events"][0]["id"], 7);
        assert_eq!(json["events"][0]["placement"], "up");
        assert_eq!(json["events"][0]["date"], "2021-05-05T00:00:00");
        assert_eq!(json["events"][0]["point"][0].as_f64(), Some(500.0));
    }
}
