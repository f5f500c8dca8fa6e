use std::time::{Duration, Instant};

use crate::config::LayoutConfig;
use crate::debounce::ResizeDebouncer;
use crate::error::TimelineError;
use crate::ir::{EventId, EventInput, EventUpdate, TimelineEvent};
use crate::layout::{LabelMeasurer, Surface, TimelineProperties, compute_layout};

/// Owns the event collection and keeps a layout for it current.
///
/// Every mutation runs a full relayout before returning. Resize
/// notifications are debounced and applied from [`Timeline::poll`]; a
/// mutation that happens while a resize is pending applies that size in its
/// own pass.
pub struct Timeline<M: LabelMeasurer> {
    events: Vec<TimelineEvent>,
    next_id: usize,
    config: LayoutConfig,
    surface: Surface,
    measurer: M,
    debouncer: ResizeDebouncer,
    properties: TimelineProperties,
    passes: u64,
}

impl<M: LabelMeasurer> Timeline<M> {
    pub fn new(
        inputs: Vec<EventInput>,
        config: LayoutConfig,
        surface: Surface,
        measurer: M,
    ) -> Result<Self, TimelineError> {
        config.validate()?;
        let debouncer = ResizeDebouncer::new(Duration::from_millis(config.resize_debounce_ms));
        let properties = compute_layout(&[], &config, surface, &measurer);
        let mut timeline = Self {
            events: Vec::new(),
            next_id: 0,
            config,
            surface,
            measurer,
            debouncer,
            properties,
            passes: 0,
        };
        timeline.add_events(inputs);
        Ok(timeline)
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn event(&self, id: EventId) -> Option<&TimelineEvent> {
        self.events.iter().find(|event| event.id == id)
    }

    pub fn properties(&self) -> &TimelineProperties {
        &self.properties
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn measurer(&self) -> &M {
        &self.measurer
    }

    /// Label sizes may change through this handle; call
    /// [`Timeline::relayout`] afterwards.
    pub fn measurer_mut(&mut self) -> &mut M {
        &mut self.measurer
    }

    /// Number of layout passes run so far.
    pub fn pass_count(&self) -> u64 {
        self.passes
    }

    /// Add events and lay everything out once.
    pub fn add_events(&mut self, inputs: Vec<EventInput>) -> Vec<EventId> {
        let mut ids = Vec::with_capacity(inputs.len());
        for input in inputs {
            let id = EventId(self.next_id);
            self.next_id += 1;
            self.events.push(TimelineEvent::from_input(id, input));
            ids.push(id);
        }
        self.relayout();
        ids
    }

    /// Replace the whole collection. Ids keep increasing across calls.
    pub fn set_events(&mut self, inputs: Vec<EventInput>) -> Vec<EventId> {
        self.events.clear();
        self.add_events(inputs)
    }

    pub fn update(&mut self, id: EventId, update: EventUpdate) -> Result<(), TimelineError> {
        let event = self
            .events
            .iter_mut()
            .find(|event| event.id == id)
            .ok_or(TimelineError::UnknownEvent(id))?;
        update.apply(event);
        self.relayout();
        Ok(())
    }

    pub fn delete(&mut self, id: EventId) -> Result<TimelineEvent, TimelineError> {
        let position = self
            .events
            .iter()
            .position(|event| event.id == id)
            .ok_or(TimelineError::UnknownEvent(id))?;
        let removed = self.events.remove(position);
        self.relayout();
        Ok(removed)
    }

    pub fn set_alternate(&mut self, alternate: bool) {
        if self.config.alternate_sides != alternate {
            self.config.alternate_sides = alternate;
            self.relayout();
        }
    }

    /// Record a surface size change. The relayout happens from
    /// [`Timeline::poll`] once notifications settle.
    pub fn notify_resize(&mut self, surface: Surface, now: Instant) {
        self.debouncer.notify(surface, now);
    }

    /// Run the debounced resize relayout if it is due.
    pub fn poll(&mut self, now: Instant) -> Option<&TimelineProperties> {
        let surface = self.debouncer.poll(now)?;
        self.surface = surface;
        self.run_pass();
        Some(&self.properties)
    }

    pub fn resize_pending(&self) -> bool {
        self.debouncer.has_pending()
    }

    /// Full relayout from the current events. A pending resize is applied
    /// now instead of later.
    pub fn relayout(&mut self) -> &TimelineProperties {
        if let Some(surface) = self.debouncer.take() {
            self.surface = surface;
        }
        self.run_pass();
        &self.properties
    }

    fn run_pass(&mut self) {
        self.events.sort_by_key(|event| event.date);
        self.properties = compute_layout(&self.events, &self.config, self.surface, &self.measurer);
        // Sorted input keeps positions aligned with the chronological output.
        for (event, props) in self.events.iter_mut().zip(&self.properties.events) {
            event.placement = props.placement;
        }
        self.passes += 1;
    }
}
