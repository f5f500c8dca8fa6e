use crate::error::TimelineError;
use crate::ir::{EventInput, Placement, parse_date};
use once_cell::sync::Lazy;
use regex::Regex;

static EVENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<date>\d{4}-\d{2}-\d{2}(?:[ T]\d{2}:\d{2}(?::\d{2})?(?:Z|[+-]\d{2}:\d{2})?)?)\s*:\s*(?P<rest>.*)$",
    )
    .unwrap()
});
static INIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^%%\{\s*init\s*:\s*(\{.*\})\s*\}%%").unwrap());
static ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<key>[A-Za-z]+)\s*=\s*(?P<value>.+)$").unwrap());

#[derive(Debug, Default)]
pub struct ParseOutput {
    pub events: Vec<EventInput>,
    pub init_config: Option<serde_json::Value>,
}

/// Parse either the line-based format or a JSON array of events.
pub fn parse_input(input: &str) -> Result<ParseOutput, TimelineError> {
    if input.trim_start().starts_with('[') {
        return Ok(ParseOutput {
            events: parse_events_json(input)?,
            init_config: None,
        });
    }
    parse_timeline(input)
}

pub fn parse_events_json(input: &str) -> Result<Vec<EventInput>, TimelineError> {
    Ok(serde_json::from_str(input)?)
}

/// Line-based input:
///
/// ```text
/// timeline
/// %%{init: {"layout": {"verticalGap": 10}}}%%
/// 2021-05-05 : First event
/// 2021-06-03 : Second event | color=#2196F3 | placement=down
/// ```
pub fn parse_timeline(input: &str) -> Result<ParseOutput, TimelineError> {
    let mut output = ParseOutput::default();

    for (idx, raw_line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(caps) = INIT_RE.captures(line) {
            let json_str = caps.get(1).map(|m| m.as_str()).unwrap_or("{}");
            let value = json5::from_str::<serde_json::Value>(json_str).map_err(|err| {
                TimelineError::Syntax {
                    line: line_no,
                    message: format!("bad init directive: {err}"),
                }
            })?;
            output.init_config = Some(match output.init_config.take() {
                Some(previous) => merge_json(previous, value),
                None => value,
            });
            continue;
        }
        if line.starts_with("%%") {
            continue;
        }
        if line.eq_ignore_ascii_case("timeline") {
            continue;
        }

        let caps = EVENT_RE.captures(line).ok_or_else(|| TimelineError::Syntax {
            line: line_no,
            message: format!("expected 'YYYY-MM-DD : description', got '{line}'"),
        })?;
        let date = parse_date(&caps["date"]).map_err(|err| TimelineError::Syntax {
            line: line_no,
            message: err.to_string(),
        })?;
        let mut event = EventInput::new(date);

        let mut parts = caps["rest"].split('|').map(str::trim);
        if let Some(description) = parts.next().filter(|d| !d.is_empty()) {
            event.description = Some(description.to_string());
        }
        for attr in parts.filter(|part| !part.is_empty()) {
            apply_attribute(&mut event, attr).map_err(|err| TimelineError::Syntax {
                line: line_no,
                message: err.to_string(),
            })?;
        }
        output.events.push(event);
    }

    Ok(output)
}

fn apply_attribute(event: &mut EventInput, attr: &str) -> Result<(), TimelineError> {
    let caps = ATTR_RE
        .captures(attr)
        .ok_or_else(|| TimelineError::InvalidConfig(format!("malformed attribute '{attr}'")))?;
    let value = caps["value"].trim();
    match caps["key"].to_ascii_lowercase().as_str() {
        "color" => event.color = Some(value.to_string()),
        "placement" | "side" => {
            let placement = Placement::from_token(value)
                .ok_or_else(|| TimelineError::UnknownPlacement(value.to_string()))?;
            event.placement = Some(placement);
        }
        "custom" | "data" => {
            event.custom = serde_json::from_str(value)
                .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
        }
        other => {
            return Err(TimelineError::InvalidConfig(format!(
                "unknown attribute '{other}'"
            )));
        }
    }
    Ok(())
}

fn merge_json(base: serde_json::Value, overlay: serde_json::Value) -> serde_json::Value {
    match (base, overlay) {
        (serde_json::Value::Object(mut base), serde_json::Value::Object(overlay)) => {
            for (key, value) in overlay {
                let merged = match base.remove(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            serde_json::Value::Object(base)
        }
        (_, overlay) => overlay,
    }
}
