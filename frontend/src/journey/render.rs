use serde::Serialize;

use super::registry::StepDescriptor;
use super::visibility::RevealedSet;

/// Reveal axis. `Revealed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RevealPhase {
    Hidden,
    Revealed,
}

/// Hover axis. Cycles freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HoverPhase {
    Idle,
    Active,
}

/// Both axes for one step, kept separate so each can be reasoned about alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepState {
    pub reveal: RevealPhase,
    pub hover: HoverPhase,
}

impl StepState {
    pub fn of(step: usize, revealed: &RevealedSet, hovered: Option<usize>) -> Self {
        let reveal = if revealed.contains(step) {
            RevealPhase::Revealed
        } else {
            RevealPhase::Hidden
        };
        let hover = if hovered == Some(step) {
            HoverPhase::Active
        } else {
            HoverPhase::Idle
        };
        Self { reveal, hover }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VisualState {
    /// Gates only the entrance transition.
    pub revealed: bool,
    pub hovered: bool,
    /// Detail text is shown while hovered, whether or not the step has entered.
    pub expanded: bool,
}

impl From<StepState> for VisualState {
    fn from(state: StepState) -> Self {
        let hovered = state.hover == HoverPhase::Active;
        Self {
            revealed: state.reveal == RevealPhase::Revealed,
            hovered,
            expanded: hovered,
        }
    }
}

/// The guide line running behind the steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConnectorState {
    pub emphasized: bool,
}

pub fn render(step: &StepDescriptor, revealed: &RevealedSet, hovered: Option<usize>) -> VisualState {
    StepState::of(step.index, revealed, hovered).into()
}

pub fn render_connector(hovered: Option<usize>) -> ConnectorState {
    ConnectorState {
        emphasized: hovered.is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journey::registry::sample_registry;

    #[test]
    fn fresh_step_is_hidden_and_idle() {
        let registry = sample_registry(4);
        let state = render(registry.get(0).unwrap(), &RevealedSet::new(), None);
        assert_eq!(
            state,
            VisualState {
                revealed: false,
                hovered: false,
                expanded: false
            }
        );
    }

    #[test]
    fn revealed_and_hovered_step_expands() {
        let registry = sample_registry(4);
        let revealed: RevealedSet = [1].into_iter().collect();
        let state = render(registry.get(1).unwrap(), &revealed, Some(1));
        assert!(state.revealed && state.hovered && state.expanded);
    }

    #[test]
    fn hover_does_not_wait_for_reveal() {
        let registry = sample_registry(4);
        let state = render(registry.get(2).unwrap(), &RevealedSet::new(), Some(2));
        assert!(!state.revealed);
        assert!(state.hovered);
        assert!(state.expanded);
    }

    #[test]
    fn hovering_another_step_leaves_this_one_collapsed() {
        let registry = sample_registry(4);
        let revealed: RevealedSet = (0..4).collect();
        let state = render(registry.get(0).unwrap(), &revealed, Some(3));
        assert!(state.revealed);
        assert!(!state.hovered);
        assert!(!state.expanded);
    }

    #[test]
    fn identical_inputs_render_identical_output() {
        let registry = sample_registry(4);
        let revealed: RevealedSet = [0, 2].into_iter().collect();
        for step in registry.iter() {
            let first = serde_json::to_string(&render(step, &revealed, Some(2))).unwrap();
            let second = serde_json::to_string(&render(step, &revealed, Some(2))).unwrap();
            assert_eq!(first, second);
        }
        let snapshot = serde_json::to_string(&render(registry.get(2).unwrap(), &revealed, Some(2))).unwrap();
        assert_eq!(snapshot, r#"{"revealed":true,"hovered":true,"expanded":true}"#);
    }

    #[test]
    fn step_state_keeps_axes_independent() {
        let revealed: RevealedSet = [1].into_iter().collect();
        assert_eq!(
            StepState::of(1, &revealed, None),
            StepState {
                reveal: RevealPhase::Revealed,
                hover: HoverPhase::Idle
            }
        );
        assert_eq!(
            StepState::of(0, &revealed, Some(0)),
            StepState {
                reveal: RevealPhase::Hidden,
                hover: HoverPhase::Active
            }
        );
    }

    #[test]
    fn connector_is_emphasized_while_any_step_is_hovered() {
        assert!(!render_connector(None).emphasized);
        assert!(render_connector(Some(0)).emphasized);
    }
}
