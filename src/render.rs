use crate::config::{LayoutConfig, RenderConfig};
use crate::ir::{EventId, Placement, TimelineEvent};
use crate::layout::{TimelineEventProperties, TimelineProperties, label_lines};
use crate::theme::Theme;
use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;

const POINT_RADIUS: f64 = 5.0;
const STEM_WIDTH: f64 = 2.0;
const AXIS_WIDTH: f64 = 4.0;

/// Draw a computed layout. Positions are applied as-is; this never moves
/// anything.
pub fn render_svg(
    layout: &TimelineProperties,
    events: &[TimelineEvent],
    theme: &Theme,
    config: &LayoutConfig,
) -> String {
    let by_id: HashMap<EventId, &TimelineEvent> =
        events.iter().map(|event| (event.id, event)).collect();
    let width = layout.width.max(1.0);
    let height = layout.height.max(1.0);
    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    // Full-width line, then the track between the axis endpoints.
    svg.push_str(&format!(
        "<line class=\"st-line\" x1=\"0\" y1=\"{y:.2}\" x2=\"{width:.2}\" y2=\"{y:.2}\" stroke=\"{}\" stroke-width=\"{AXIS_WIDTH}\"/>",
        theme.axis_color,
        y = layout.axis_y,
    ));
    svg.push_str(&format!(
        "<line class=\"st-line-track\" x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"{AXIS_WIDTH}\"/>",
        layout.axis_start.x,
        layout.axis_start.y,
        layout.axis_end.x,
        layout.axis_end.y,
        theme.axis_track_color,
    ));

    for props in &layout.events {
        let Some(event) = by_id.get(&props.id) else {
            continue;
        };
        svg.push_str(&event_svg(props, event, theme, config));
    }

    svg.push_str("</svg>");
    svg
}

fn event_svg(
    props: &TimelineEventProperties,
    event: &TimelineEvent,
    theme: &Theme,
    config: &LayoutConfig,
) -> String {
    let mut out = String::new();
    let color = escape_xml(&event.color);
    let side = match props.placement {
        Placement::Up => "st-up",
        Placement::Down => "st-down",
    };
    out.push_str(&format!(
        "<g class=\"st-event {side}\" data-st-event-ref=\"{}\">",
        props.id.0
    ));
    out.push_str(&format!(
        "<line class=\"st-event-line\" x1=\"{x:.2}\" y1=\"{:.2}\" x2=\"{x:.2}\" y2=\"{:.2}\" stroke=\"{color}\" stroke-width=\"{STEM_WIDTH}\"/>",
        props.stem.top,
        props.stem.bottom,
        x = props.point.x,
    ));
    let label = &props.label;
    out.push_str(&format!(
        "<rect class=\"st-event-label\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"4\" ry=\"4\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"/>",
        label.x,
        label.y,
        label.width,
        label.height,
        theme.label_background,
        theme.label_border,
    ));

    let [date_line, description] = label_lines(event);
    let advance = (theme.font_size * config.label_line_height) as f64;
    let center_x = label.x + label.width / 2.0;
    let first_baseline = label.y + config.label_padding_y as f64 + theme.font_size as f64;
    out.push_str(&format!(
        "<text x=\"{center_x:.2}\" y=\"{first_baseline:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\">",
        escape_xml(&theme.font_family),
        theme.font_size,
    ));
    out.push_str(&format!(
        "<tspan x=\"{center_x:.2}\" dy=\"0\" font-weight=\"bold\" fill=\"{}\">{}</tspan>",
        theme.date_text_color,
        escape_xml(&date_line)
    ));
    out.push_str(&format!(
        "<tspan x=\"{center_x:.2}\" dy=\"{advance:.2}\" fill=\"{}\">{}</tspan>",
        theme.description_text_color,
        escape_xml(&description)
    ));
    out.push_str("</text>");

    out.push_str(&format!(
        "<circle class=\"st-event-point\" cx=\"{:.2}\" cy=\"{:.2}\" r=\"{POINT_RADIUS}\" fill=\"{color}\"/>",
        props.point.x, props.point.y,
    ));
    out.push_str("</g>");
    out
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(
    svg: &str,
    output: &Path,
    render_cfg: &RenderConfig,
    theme: &Theme,
) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = theme
        .font_family
        .split(',')
        .next()
        .map(|name| name.trim().trim_matches('"').to_string())
        .unwrap_or_else(|| "sans-serif".to_string());
    opt.fontdb_mut().load_system_fonts();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("invalid render size"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(
    _svg: &str,
    _output: &Path,
    _render_cfg: &RenderConfig,
    _theme: &Theme,
) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires building with the `png` feature"
    ))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{EventInput, parse_date};
    use crate::layout::{FixedMeasurer, Surface, compute_layout};

    fn sample() -> Vec<TimelineEvent> {
        [("2021-05-05", "Launch <beta>"), ("2021-06-03", "Ship")]
            .iter()
            .enumerate()
            .map(|(idx, (date, text))| {
                TimelineEvent::from_input(
                    EventId(idx),
                    EventInput::new(parse_date(date).unwrap())
                        .with_description(*text)
                        .with_color("#FF9800"),
                )
            })
            .collect()
    }

    #[test]
    fn render_svg_basic() {
        let events = sample();
        let config = LayoutConfig::default();
        let layout = compute_layout(
            &events,
            &config,
            Surface::new(800.0, 300.0),
            &FixedMeasurer::new(90.0, 44.0),
        );
        let svg = render_svg(&layout, &events, &Theme::classic(), &config);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Launch &lt;beta&gt;"));
        assert!(svg.contains("May 5"));
        assert_eq!(svg.matches("class=\"st-event-point\"").count(), 2);
        assert!(svg.contains("st-up") && svg.contains("st-down"));
    }

    #[test]
    fn events_missing_from_collection_are_skipped() {
        let events = sample();
        let config = LayoutConfig::default();
        let layout = compute_layout(
            &events,
            &config,
            Surface::new(800.0, 300.0),
            &FixedMeasurer::new(90.0, 44.0),
        );
        let svg = render_svg(&layout, &events[..1], &Theme::modern(), &config);
        assert_eq!(svg.matches("class=\"st-event-point\"").count(), 1);
    }
}
