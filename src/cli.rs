use crate::config::{Config, load_config, merge_init_config};
use crate::ir::TimelineEvent;
use crate::layout::{Surface, TextLabelMeasurer, TimelineProperties};
use crate::layout_dump::{layout_dump_json, write_layout_dump};
use crate::parser::parse_input;
use crate::render::{render_svg, write_output_png, write_output_svg};
use crate::timeline::Timeline;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stl", version, about = "Lay out and render a horizontal event timeline")]
pub struct Args {
    /// Input file (.tl, .json, .md) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Surface width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Surface height used to place the axis before auto-sizing
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Put every label above the axis unless an event asks otherwise
    #[arg(long = "no-alternate")]
    pub no_alternate: bool,

    /// Also write the computed layout as JSON to this path
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
            OutputFormat::Json => "json",
        }
    }
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let base_config = load_config(args.config.as_deref())
        .with_context(|| format!("loading config {:?}", args.config))?;
    let base_config = apply_overrides(base_config, &args)?;

    let (input, is_markdown) = read_input(args.input.as_deref())?;
    let sources = if is_markdown {
        extract_timeline_blocks(&input)
    } else {
        vec![input]
    };

    if sources.is_empty() {
        return Err(anyhow::anyhow!("No timeline blocks found in input"));
    }

    let outputs: Vec<Option<PathBuf>> = if sources.len() == 1 {
        vec![args.output.clone()]
    } else {
        resolve_multi_outputs(args.output.as_deref(), args.output_format, sources.len())?
            .into_iter()
            .map(Some)
            .collect()
    };

    for (idx, (source, output)) in sources.iter().zip(outputs).enumerate() {
        let rendered = render_source(source, &base_config, args.output_format)
            .with_context(|| format!("timeline {}", idx + 1))?;
        if let Some(path) = args.dump_layout.as_deref() {
            let path = if sources.len() == 1 {
                path.to_path_buf()
            } else {
                numbered_path(path, idx, "json")
            };
            write_layout_dump(&path, &rendered.timeline_layout, &rendered.events)?;
        }
        match args.output_format {
            OutputFormat::Svg | OutputFormat::Json => {
                write_output_svg(&rendered.body, output.as_deref())?;
            }
            OutputFormat::Png => {
                let output = output
                    .ok_or_else(|| anyhow::anyhow!("Output path required for png output"))?;
                write_output_png(&rendered.body, &output, &rendered.config.render, &rendered.config.theme)?;
            }
        }
        tracing::info!(
            timeline = idx + 1,
            events = rendered.events.len(),
            height = rendered.timeline_layout.height,
            "rendered timeline"
        );
    }

    Ok(())
}

/// Command-line flags win over the config file.
fn apply_overrides(mut config: Config, args: &Args) -> Result<Config> {
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    if args.no_alternate {
        config.layout.alternate_sides = false;
    }
    config.render.validate()?;
    Ok(config)
}

struct Rendered {
    body: String,
    config: Config,
    timeline_layout: TimelineProperties,
    events: Vec<TimelineEvent>,
}

fn render_source(source: &str, base_config: &Config, format: OutputFormat) -> Result<Rendered> {
    let parsed = parse_input(source)?;
    let mut config = base_config.clone();
    if let Some(init_cfg) = parsed.init_config {
        config = merge_init_config(config, init_cfg)?;
    }
    let surface = Surface::new(config.render.width as f64, config.render.height as f64);
    let measurer = TextLabelMeasurer::new(&config.theme, &config.layout);
    let timeline = Timeline::new(parsed.events, config.layout.clone(), surface, measurer)?;

    let timeline_layout = timeline.properties().clone();
    let events = timeline.events().to_vec();
    let body = match format {
        OutputFormat::Json => layout_dump_json(&timeline_layout, &events)?,
        OutputFormat::Svg | OutputFormat::Png => {
            render_svg(&timeline_layout, &events, &config.theme, &config.layout)
        }
    };
    Ok(Rendered {
        body,
        config,
        timeline_layout,
        events,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(path: Option<&Path>) -> Result<(String, bool)> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok((buf, false));
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let is_md = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| matches!(ext, "md" | "markdown"))
            .unwrap_or(false);
        return Ok((content, is_md));
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok((buf, false))
}

/// Fenced ```timeline blocks from a Markdown document.
fn extract_timeline_blocks(input: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut fence: Option<&str> = None;

    for line in input.lines() {
        let trimmed = line.trim();
        match fence {
            None => fence = detect_timeline_fence(trimmed),
            Some(open) if is_fence_end(trimmed, open) => {
                blocks.push(current.join("\n"));
                current.clear();
                fence = None;
            }
            Some(_) => current.push(line),
        }
    }

    blocks
}

fn detect_timeline_fence(line: &str) -> Option<&'static str> {
    for fence in ["```", "~~~"] {
        if let Some(rest) = line.strip_prefix(fence)
            && rest.trim_start_matches(&fence[..1]).trim().starts_with("timeline")
        {
            return Some(fence);
        }
    }
    None
}

fn is_fence_end(line: &str, fence: &str) -> bool {
    line.strip_prefix(fence)
        .map(|rest| rest.trim().is_empty())
        .unwrap_or(false)
}

fn numbered_path(base: &Path, idx: usize, ext: &str) -> PathBuf {
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("timeline");
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    parent.join(format!("{}-{}.{}", stem, idx + 1, ext))
}

fn resolve_multi_outputs(
    output: Option<&Path>,
    format: OutputFormat,
    count: usize,
) -> Result<Vec<PathBuf>> {
    let ext = format.extension();
    let base = output.ok_or_else(|| anyhow::anyhow!("Output path required for markdown input"))?;
    if base.is_dir() {
        return Ok((0..count)
            .map(|idx| base.join(format!("timeline-{}.{}", idx + 1, ext)))
            .collect());
    }
    Ok((0..count).map(|idx| numbered_path(base, idx, ext)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_flags_override_config() {
        let args = Args::try_parse_from(["stl", "-w", "640", "-H", "200", "--no-alternate"]).unwrap();
        let config = apply_overrides(Config::default(), &args).unwrap();
        assert_eq!(config.render.width, 640.0);
        assert_eq!(config.render.height, 200.0);
        assert!(!config.layout.alternate_sides);
    }

    #[test]
    fn non_positive_size_flags_are_rejected() {
        let args = Args::try_parse_from(["stl", "-w", "0"]).unwrap();
        let err = apply_overrides(Config::default(), &args).unwrap_err();
        assert!(err.to_string().contains("render width"));

        let args = Args::try_parse_from(["stl", "--height=-10"]).unwrap();
        assert!(apply_overrides(Config::default(), &args).is_err());
    }

    #[test]
    fn extracts_timeline_blocks() {
        let input = r#"
text
``` timeline
2021-01-01 : One
```
more
~~~timeline
2021-02-01 : Two
2021-03-01 : Three
~~~
```rust
fn main() {}
```
"#;
        let blocks = extract_timeline_blocks(input);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].contains("One"));
        assert_eq!(blocks[1].lines().count(), 2);
    }

    #[test]
    fn numbered_outputs_share_stem() {
        let outputs =
            resolve_multi_outputs(Some(Path::new("out/chart.svg")), OutputFormat::Svg, 2).unwrap();
        assert_eq!(outputs[0], PathBuf::from("out/chart-1.svg"));
        assert_eq!(outputs[1], PathBuf::from("out/chart-2.svg"));
    }

    #[test]
    fn renders_json_layout() {
        let rendered = render_source(
            "2021-01-01 : One\n2021-02-01 : Two",
            &Config::default(),
            OutputFormat::Json,
        )
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&rendered.body).unwrap();
        assert_eq!(json["events"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn init_directive_overrides_base_config() {
        let rendered = render_source(
            "%%{init: {layout: {alternate: false}}}%%\n2021-01-01 : One\n2021-02-01 : Two",
            &Config::default(),
            OutputFormat::Svg,
        )
        .unwrap();
        assert!(!rendered.config.layout.alternate_sides);
        assert!(!rendered.body.contains("st-down"));
    }
}
