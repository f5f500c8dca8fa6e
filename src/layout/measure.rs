use std::collections::HashMap;

use crate::config::LayoutConfig;
use crate::ir::{EventId, TimelineEvent};
use crate::text_metrics;
use crate::theme::Theme;

use super::types::LabelSize;

/// Reports the box a label would occupy once rendered. Sizes must stay
/// stable for the duration of one layout pass.
pub trait LabelMeasurer {
    fn measure(&self, event: &TimelineEvent) -> LabelSize;
}

impl<M: LabelMeasurer + ?Sized> LabelMeasurer for &M {
    fn measure(&self, event: &TimelineEvent) -> LabelSize {
        (**self).measure(event)
    }
}

impl<M: LabelMeasurer + ?Sized> LabelMeasurer for Box<M> {
    fn measure(&self, event: &TimelineEvent) -> LabelSize {
        (**self).measure(event)
    }
}

/// Same size for every label.
#[derive(Debug, Clone, Copy)]
pub struct FixedMeasurer(pub LabelSize);

impl FixedMeasurer {
    pub fn new(width: f64, height: f64) -> Self {
        Self(LabelSize::new(width, height))
    }
}

impl LabelMeasurer for FixedMeasurer {
    fn measure(&self, _event: &TimelineEvent) -> LabelSize {
        self.0
    }
}

pub struct FnMeasurer<F>(pub F);

impl<F> LabelMeasurer for FnMeasurer<F>
where
    F: Fn(&TimelineEvent) -> LabelSize,
{
    fn measure(&self, event: &TimelineEvent) -> LabelSize {
        (self.0)(event)
    }
}

/// Sizes reported back by a rendering layer, keyed by event id.
#[derive(Debug, Clone)]
pub struct SizeTableMeasurer {
    sizes: HashMap<EventId, LabelSize>,
    fallback: LabelSize,
}

impl SizeTableMeasurer {
    pub fn new(fallback: LabelSize) -> Self {
        Self {
            sizes: HashMap::new(),
            fallback,
        }
    }

    pub fn insert(&mut self, id: EventId, size: LabelSize) {
        self.sizes.insert(id, size);
    }

    pub fn remove(&mut self, id: EventId) {
        self.sizes.remove(&id);
    }
}

impl LabelMeasurer for SizeTableMeasurer {
    fn measure(&self, event: &TimelineEvent) -> LabelSize {
        self.sizes.get(&event.id).copied().unwrap_or(self.fallback)
    }
}

/// Text of the default label: a short date line and the description.
pub fn label_lines(event: &TimelineEvent) -> [String; 2] {
    [
        event.date.format("%b %-d").to_string(),
        event.description.clone(),
    ]
}

/// Sizes the default two-line label with font metrics.
#[derive(Debug, Clone)]
pub struct TextLabelMeasurer {
    font_family: String,
    font_size: f32,
    line_height: f32,
    padding_x: f32,
    padding_y: f32,
    fast: bool,
}

impl TextLabelMeasurer {
    pub fn new(theme: &Theme, config: &LayoutConfig) -> Self {
        Self {
            font_family: theme.font_family.clone(),
            font_size: theme.font_size,
            line_height: config.label_line_height,
            padding_x: config.label_padding_x,
            padding_y: config.label_padding_y,
            fast: config.fast_text_metrics,
        }
    }

    pub fn line_advance(&self) -> f32 {
        self.font_size * self.line_height
    }
}

impl LabelMeasurer for TextLabelMeasurer {
    fn measure(&self, event: &TimelineEvent) -> LabelSize {
        let lines = label_lines(event);
        let text_width = lines
            .iter()
            .map(|line| {
                text_metrics::text_width(line, self.font_size, &self.font_family, self.fast)
            })
            .fold(0.0, f32::max);
        let text_height = lines.len() as f32 * self.line_advance();
        LabelSize::new(
            (text_width + self.padding_x * 2.0) as f64,
            (text_height + self.padding_y * 2.0) as f64,
        )
    }
}
