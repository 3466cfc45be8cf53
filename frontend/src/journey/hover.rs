/// Which step, if any, is under the pointer. At most one at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoverState {
    active: Option<usize>,
}

impl HoverState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last call wins. Returns whether the active step changed.
    pub fn set_hovered(&mut self, step: usize) -> bool {
        let changed = self.active != Some(step);
        self.active = Some(step);
        changed
    }

    /// Only the active step can clear the hover; a late leave from a step the
    /// pointer already moved away from must not wipe the newer hover.
    pub fn clear_hovered(&mut self, step: usize) -> bool {
        if self.active == Some(step) {
            self.active = None;
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> Option<usize> {
        self.active
    }

    pub fn is_hovered(&self, step: usize) -> bool {
        self.active == Some(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        assert_eq!(HoverState::new().current(), None);
    }

    #[test]
    fn enter_then_matching_leave_returns_to_idle() {
        let mut hover = HoverState::new();
        assert!(hover.set_hovered(1));
        assert!(hover.is_hovered(1));
        assert!(hover.clear_hovered(1));
        assert_eq!(hover.current(), None);
    }

    #[test]
    fn newer_enter_overwrites_previous() {
        let mut hover = HoverState::new();
        hover.set_hovered(0);
        hover.set_hovered(3);
        assert_eq!(hover.current(), Some(3));
        assert!(!hover.is_hovered(0));
    }

    #[test]
    fn stale_leave_is_a_no_op() {
        let mut hover = HoverState::new();
        hover.set_hovered(0);
        hover.set_hovered(2);
        assert!(!hover.clear_hovered(0));
        assert_eq!(hover.current(), Some(2));
    }

    #[test]
    fn leave_while_idle_is_a_no_op() {
        let mut hover = HoverState::new();
        assert!(!hover.clear_hovered(1));
        assert_eq!(hover.current(), None);
    }

    #[test]
    fn repeated_enter_reports_no_change() {
        let mut hover = HoverState::new();
        assert!(hover.set_hovered(2));
        assert!(!hover.set_hovered(2));
        assert_eq!(hover.current(), Some(2));
    }
}
