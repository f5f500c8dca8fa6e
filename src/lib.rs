#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod debounce;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod text_metrics;
pub mod theme;
pub mod timeline;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use error::TimelineError;
pub use ir::{EventId, EventInput, EventUpdate, Placement, TimelineEvent};
pub use layout::{
    FixedMeasurer, LabelMeasurer, LabelSize, Surface, TextLabelMeasurer, TimelineEventProperties,
    TimelineProperties, compute_layout,
};
pub use parser::parse_input;
pub use render::render_svg;
pub use theme::Theme;
pub use timeline::Timeline;

/// Parse timeline text (or JSON), lay it out with font metrics, and render
/// SVG.
pub fn render_timeline(input: &str, config: Config) -> anyhow::Result<String> {
    let parsed = parse_input(input)?;
    let config = match parsed.init_config {
        Some(init) => config::merge_init_config(config, init)?,
        None => config,
    };
    config.render.validate()?;
    let surface = Surface::new(config.render.width as f64, config.render.height as f64);
    let measurer = TextLabelMeasurer::new(&config.theme, &config.layout);
    let timeline = Timeline::new(parsed.events, config.layout.clone(), surface, measurer)?;
    Ok(render_svg(
        timeline.properties(),
        timeline.events(),
        &config.theme,
        &config.layout,
    ))
}
