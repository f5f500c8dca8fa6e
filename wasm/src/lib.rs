use serde::Deserialize;
use simple_timeline::layout::SizeTableMeasurer;
use simple_timeline::{
    EventId, EventInput, LabelSize, LayoutConfig, Surface, TimelineProperties, compute_layout,
};
use wasm_bindgen::prelude::*;

/// Browser-side request: events in caller order plus the label boxes the
/// page measured for each of them (same order).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutRequest {
    events: Vec<EventInput>,
    sizes: Vec<LabelSize>,
    width: f64,
    height: f64,
    alternate: Option<bool>,
    vertical_gap: Option<f64>,
    horizontal_gap: Option<f64>,
    base_stem_length: Option<f64>,
}

fn run_layout(request: LayoutRequest) -> Result<TimelineProperties, String> {
    if request.sizes.len() != request.events.len() {
        return Err(format!(
            "got {} label sizes for {} events",
            request.sizes.len(),
            request.events.len()
        ));
    }
    let mut config = LayoutConfig::default();
    if let Some(value) = request.alternate {
        config.alternate_sides = value;
    }
    if let Some(value) = request.vertical_gap {
        config.vertical_gap = value;
    }
    if let Some(value) = request.horizontal_gap {
        config.horizontal_gap = value;
    }
    if let Some(value) = request.base_stem_length {
        config.base_stem_length = value;
    }
    config.validate().map_err(|error| error.to_string())?;

    let mut measurer = SizeTableMeasurer::new(LabelSize::new(0.0, 0.0));
    let events: Vec<_> = request
        .events
        .into_iter()
        .enumerate()
        .map(|(idx, input)| {
            measurer.insert(EventId(idx), request.sizes[idx]);
            simple_timeline::TimelineEvent::from_input(EventId(idx), input)
        })
        .collect();

    Ok(compute_layout(
        &events,
        &config,
        Surface::new(request.width, request.height),
        &measurer,
    ))
}

/// Event ids in the result are positions in the request's `events` array.
#[wasm_bindgen]
pub fn layout_timeline(request_json: &str) -> Result<String, JsValue> {
    let request: LayoutRequest = serde_json::from_str(request_json)
        .map_err(|error| JsValue::from_str(&error.to_string()))?;
    let properties = run_layout(request).map_err(|error| JsValue::from_str(&error))?;
    serde_json::to_string(&properties)
        .map_err(|error| JsValue::from_str(&error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lays_out_measured_events() {
        let request: LayoutRequest = serde_json::from_str(
            r#"{
                "events": [
                    {"date": "2021-05-05", "description": "One"},
                    {"date": "2021-05-05", "description": "Two"},
                    {"date": "2021-05-05", "description": "Three"}
                ],
                "sizes": [
                    {"width": 40, "height": 20},
                    {"width": 40, "height": 20},
                    {"width": 40, "height": 20}
                ],
                "width": 1000,
                "height": 400,
                "alternate": false
            }"#,
        )
        .unwrap();
        let properties = run_layout(request).unwrap();
        let stems: Vec<f64> = properties.events.iter().map(|p| p.stem.height()).collect();
        assert_eq!(stems, vec![30.0, 58.0, 86.0]);
    }

    #[test]
    fn size_count_must_match() {
        let request: LayoutRequest = serde_json::from_str(
            r#"{"events": [{"date": "2021-05-05"}], "sizes": [], "width": 10, "height": 10}"#,
        )
        .unwrap();
        assert!(run_layout(request).is_err());
    }
}
