use crate::error::TimelineError;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

impl Default for Padding {
    fn default() -> Self {
        Self::uniform(20.0)
    }
}

/// Axis placement as fractions of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    pub start: f64,
    pub end: f64,
    pub line_position: f64,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            start: 0.15,
            end: 0.85,
            line_position: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub alternate_sides: bool,
    pub vertical_gap: f64,
    pub horizontal_gap: f64,
    pub base_stem_length: f64,
    pub padding: Padding,
    pub axis: AxisConfig,
    pub label_padding_x: f32,
    pub label_padding_y: f32,
    pub label_line_height: f32,
    pub resize_debounce_ms: u64,
    pub fast_text_metrics: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            alternate_sides: true,
            vertical_gap: 8.0,
            horizontal_gap: 0.0,
            base_stem_length: 30.0,
            padding: Padding::default(),
            axis: AxisConfig::default(),
            label_padding_x: 8.0,
            label_padding_y: 6.0,
            label_line_height: 1.4,
            resize_debounce_ms: 100,
            fast_text_metrics: false,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), TimelineError> {
        let non_negative = [
            ("verticalGap", self.vertical_gap),
            ("horizontalGap", self.horizontal_gap),
            ("baseStemLength", self.base_stem_length),
            ("padding.top", self.padding.top),
            ("padding.right", self.padding.right),
            ("padding.bottom", self.padding.bottom),
            ("padding.left", self.padding.left),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(TimelineError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        let axis = &self.axis;
        for (name, value) in [
            ("axis.start", axis.start),
            ("axis.end", axis.end),
            ("axis.linePosition", axis.line_position),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TimelineError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if axis.start >= axis.end {
            return Err(TimelineError::InvalidConfig(format!(
                "axis.start ({}) must be lower than axis.end ({})",
                axis.start, axis.end
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), TimelineError> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(TimelineError::InvalidConfig(format!(
                    "render {name} must be a positive number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 400.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::classic();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    date_text_color: Option<String>,
    description_text_color: Option<String>,
    label_background: Option<String>,
    label_border: Option<String>,
    axis_color: Option<String>,
    axis_track_color: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct PaddingFile {
    top: Option<f64>,
    right: Option<f64>,
    bottom: Option<f64>,
    left: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PaddingValue {
    Uniform(f64),
    Sides(PaddingFile),
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct AxisConfigFile {
    start: Option<f64>,
    end: Option<f64>,
    line_position: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    #[serde(alias = "alternate")]
    alternate_sides: Option<bool>,
    vertical_gap: Option<f64>,
    horizontal_gap: Option<f64>,
    base_stem_length: Option<f64>,
    /// Axis position as a percentage of the surface height.
    line_height: Option<f64>,
    padding: Option<PaddingValue>,
    axis: Option<AxisConfigFile>,
    label_padding_x: Option<f32>,
    label_padding_y: Option<f32>,
    label_line_height: Option<f32>,
    resize_debounce_ms: Option<u64>,
    fast_text_metrics: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    background: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;
    Ok(apply_config_file(config, parsed)?)
}

/// Merge an inline `%%{init: ...}%%` object into `config`.
pub fn merge_init_config(config: Config, init: serde_json::Value) -> anyhow::Result<Config> {
    let parsed: ConfigFile = serde_json::from_value(init)?;
    Ok(apply_config_file(config, parsed)?)
}

fn apply_config_file(mut config: Config, parsed: ConfigFile) -> Result<Config, TimelineError> {
    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = Theme::by_name(theme_name).ok_or_else(|| {
            TimelineError::InvalidConfig(format!("unknown theme '{theme_name}'"))
        })?;
        config.render.background = config.theme.background.clone();
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.date_text_color {
            config.theme.date_text_color = v;
        }
        if let Some(v) = vars.description_text_color {
            config.theme.description_text_color = v;
        }
        if let Some(v) = vars.label_background {
            config.theme.label_background = v;
        }
        if let Some(v) = vars.label_border {
            config.theme.label_border = v;
        }
        if let Some(v) = vars.axis_color {
            config.theme.axis_color = v;
        }
        if let Some(v) = vars.axis_track_color {
            config.theme.axis_track_color = v;
        }
        if let Some(v) = vars.background {
            config.render.background = v.clone();
            config.theme.background = v;
        }
    }

    if let Some(layout) = parsed.layout {
        let target = &mut config.layout;
        if let Some(v) = layout.alternate_sides {
            target.alternate_sides = v;
        }
        if let Some(v) = layout.vertical_gap {
            target.vertical_gap = v;
        }
        if let Some(v) = layout.horizontal_gap {
            target.horizontal_gap = v;
        }
        if let Some(v) = layout.base_stem_length {
            target.base_stem_length = v;
        }
        match layout.padding {
            Some(PaddingValue::Uniform(v)) => target.padding = Padding::uniform(v),
            Some(PaddingValue::Sides(sides)) => {
                if let Some(v) = sides.top {
                    target.padding.top = v;
                }
                if let Some(v) = sides.right {
                    target.padding.right = v;
                }
                if let Some(v) = sides.bottom {
                    target.padding.bottom = v;
                }
                if let Some(v) = sides.left {
                    target.padding.left = v;
                }
            }
            None => {}
        }
        if let Some(percent) = layout.line_height {
            target.axis.line_position = percent / 100.0;
        }
        if let Some(axis) = layout.axis {
            if let Some(v) = axis.start {
                target.axis.start = v;
            }
            if let Some(v) = axis.end {
                target.axis.end = v;
            }
            if let Some(v) = axis.line_position {
                target.axis.line_position = v;
            }
        }
        if let Some(v) = layout.label_padding_x {
            target.label_padding_x = v;
        }
        if let Some(v) = layout.label_padding_y {
            target.label_padding_y = v;
        }
        if let Some(v) = layout.label_line_height {
            target.label_line_height = v;
        }
        if let Some(v) = layout.resize_debounce_ms {
            target.resize_debounce_ms = v;
        }
        if let Some(v) = layout.fast_text_metrics {
            target.fast_text_metrics = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.background {
            config.render.background = v;
        }
    }

    config.layout.validate()?;
    config.render.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_documented_values() {
        let layout = LayoutConfig::default();
        assert!(layout.alternate_sides);
        assert_eq!(layout.vertical_gap, 8.0);
        assert_eq!(layout.horizontal_gap, 0.0);
        assert_eq!(layout.base_stem_length, 30.0);
        assert_eq!(layout.padding, Padding::uniform(20.0));
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn merges_layout_and_theme_overrides() {
        let init = json!({
            "theme": "modern",
            "themeVariables": {"fontSize": 12, "axisColor": "#000000"},
            "layout": {"verticalGap": 12, "alternate": false, "padding": {"top": 5}},
            "render": {"width": 640}
        });
        let config = merge_init_config(Config::default(), init).unwrap();
        assert_eq!(config.theme.font_size, 12.0);
        assert_eq!(config.theme.axis_color, "#000000");
        assert_eq!(config.layout.vertical_gap, 12.0);
        assert!(!config.layout.alternate_sides);
        assert_eq!(config.layout.padding.top, 5.0);
        assert_eq!(config.layout.padding.bottom, 20.0);
        assert_eq!(config.render.width, 640.0);
    }

    #[test]
    fn uniform_padding_shorthand() {
        let init = json!({"layout": {"padding": 4}});
        let config = merge_init_config(Config::default(), init).unwrap();
        assert_eq!(config.layout.padding, Padding::uniform(4.0));
    }

    #[test]
    fn rejects_inverted_axis() {
        let init = json!({"layout": {"axis": {"start": 0.9, "end": 0.1}}});
        let err = merge_init_config(Config::default(), init).unwrap_err();
        assert!(err.to_string().contains("axis.start"));
    }

    #[test]
    fn rejects_negative_gap() {
        let mut layout = LayoutConfig::default();
        layout.vertical_gap = -1.0;
        assert!(matches!(
            layout.validate(),
            Err(TimelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn line_height_percent_moves_the_axis() {
        let init = json!({"layout": {"lineHeight": 30}});
        let config = merge_init_config(Config::default(), init).unwrap();
        assert!((config.layout.axis.line_position - 0.3).abs() < 1e-12);
        assert_eq!(config.layout.base_stem_length, 30.0);
    }

    #[test]
    fn explicit_line_position_beats_line_height() {
        let init = json!({"layout": {"lineHeight": 30, "axis": {"linePosition": 0.7}}});
        let config = merge_init_config(Config::default(), init).unwrap();
        assert_eq!(config.layout.axis.line_position, 0.7);
    }

    #[test]
    fn line_height_over_hundred_percent_is_rejected() {
        let init = json!({"layout": {"lineHeight": 150}});
        let err = merge_init_config(Config::default(), init).unwrap_err();
        assert!(err.to_string().contains("axis.linePosition"));
    }

    #[test]
    fn rejects_non_positive_render_size() {
        let init = json!({"render": {"width": 0}});
        let err = merge_init_config(Config::default(), init).unwrap_err();
        assert!(err.to_string().contains("render width"));

        let render = RenderConfig {
            height: -5.0,
            ..RenderConfig::default()
        };
        assert!(matches!(
            render.validate(),
            Err(TimelineError::InvalidConfig(_))
        ));
        assert!(RenderConfig::default().validate().is_ok());
    }

    #[test]
    fn unknown_theme_is_an_error() {
        let init = json!({"theme": "neon"});
        assert!(merge_init_config(Config::default(), init).is_err());
    }
}
