use std::collections::BTreeMap;
use std::rc::Rc;

use log::{debug, info};

use super::hover::HoverState;
use super::registry::StepRegistry;
use super::render::{render, render_connector, ConnectorState, VisualState};
use super::visibility::{IntersectionNotice, ObservationBackend, RevealPolicy, RevealedSet, VisibilityTracker};

/// Inbound platform notifications, applied one at a time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JourneyEvent {
    Intersection(IntersectionNotice),
    PointerEnter(usize),
    PointerLeave(usize),
}

/// Per-mount state of the journey section: which steps have entered the
/// viewport and which one is hovered. Dropping it releases observation.
pub struct JourneySession<B: ObservationBackend> {
    registry: Rc<StepRegistry>,
    tracker: VisibilityTracker<B>,
    hover: HoverState,
}

impl<B: ObservationBackend> JourneySession<B> {
    pub fn new(registry: Rc<StepRegistry>, policy: RevealPolicy, backend: Option<B>) -> Self {
        info!("Starting journey session with {} steps", registry.len());
        Self {
            registry,
            tracker: VisibilityTracker::new(policy, backend),
            hover: HoverState::new(),
        }
    }

    pub fn tracker(&self) -> &VisibilityTracker<B> {
        &self.tracker
    }

    /// Returns whether any step's visual state changed.
    pub fn attach(&mut self, step: usize, target: B::Target) -> bool {
        if !self.registry.contains(step) {
            debug!("Not attaching unknown step {}", step);
            return false;
        }
        self.tracker.attach(step, target)
    }

    pub fn detach(&mut self, step: usize) {
        self.tracker.detach(step);
    }

    pub fn detach_all(&mut self) {
        info!("Releasing journey observation");
        self.tracker.detach_all();
    }

    /// Processes one event to completion. Returns whether anything a renderer
    /// would show changed.
    pub fn apply(&mut self, event: JourneyEvent) -> bool {
        match event {
            JourneyEvent::Intersection(notice) => self.tracker.notify(&notice),
            JourneyEvent::PointerEnter(step) => {
                if !self.registry.contains(step) {
                    debug!("Ignoring pointer enter for unknown step {}", step);
                    return false;
                }
                let changed = self.hover.set_hovered(step);
                if changed {
                    debug!("Hovering step {}", step);
                }
                changed
            }
            JourneyEvent::PointerLeave(step) => self.hover.clear_hovered(step),
        }
    }

    pub fn revealed(&self) -> &RevealedSet {
        self.tracker.revealed()
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hover.current()
    }

    pub fn visual_state(&self, step: usize) -> Option<VisualState> {
        self.registry
            .get(step)
            .map(|descriptor| render(descriptor, self.revealed(), self.hovered()))
    }

    pub fn visual_states(&self) -> BTreeMap<usize, VisualState> {
        self.registry
            .iter()
            .map(|step| (step.index, render(step, self.revealed(), self.hovered())))
            .collect()
    }

    pub fn connector(&self) -> ConnectorState {
        render_connector(self.hovered())
    }
}
