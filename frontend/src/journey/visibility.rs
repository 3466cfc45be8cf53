use std::collections::BTreeMap;
use std::collections::BTreeSet;

use log::{debug, warn};

use crate::config;

/// Indices of steps seen in the viewport at least once. Only ever grows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevealedSet {
    steps: BTreeSet<usize>,
}

impl RevealedSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, step: usize) -> bool {
        self.steps.insert(step)
    }

    pub fn contains(&self, step: usize) -> bool {
        self.steps.contains(&step)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.steps.iter().copied()
    }
}

impl FromIterator<usize> for RevealedSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

/// One intersection observation for a step's element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionNotice {
    pub step: usize,
    pub is_intersecting: bool,
    pub ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealPolicy {
    pub threshold: f64,
    pub root_margin_px: u32,
}

impl Default for RevealPolicy {
    fn default() -> Self {
        Self {
            threshold: config::REVEAL_THRESHOLD,
            root_margin_px: config::REVEAL_ROOT_MARGIN_PX,
        }
    }
}

impl RevealPolicy {
    pub fn qualifies(&self, notice: &IntersectionNotice) -> bool {
        notice.is_intersecting && notice.ratio >= self.threshold
    }

    /// Inset applied to the viewport on every side, in CSS margin syntax.
    pub fn root_margin(&self) -> String {
        if self.root_margin_px == 0 {
            "0px".to_string()
        } else {
            format!("-{}px", self.root_margin_px)
        }
    }
}

/// Platform primitive that reports when targets enter the viewport.
pub trait ObservationBackend {
    type Target;

    fn observe(&mut self, target: &Self::Target);
    fn unobserve(&mut self, target: &Self::Target);
    fn disconnect(&mut self);
}

/// Tracks which steps have been scrolled into view.
///
/// Without a backend the tracker runs fail-open: every attached step counts
/// as revealed immediately, so content is never stuck hidden.
pub struct VisibilityTracker<B: ObservationBackend> {
    policy: RevealPolicy,
    backend: Option<B>,
    attached: BTreeMap<usize, B::Target>,
    revealed: RevealedSet,
}

impl<B: ObservationBackend> VisibilityTracker<B> {
    pub fn new(policy: RevealPolicy, backend: Option<B>) -> Self {
        if backend.is_none() {
            warn!("No intersection observer available, revealing steps on attach");
        }
        Self {
            policy,
            backend,
            attached: BTreeMap::new(),
            revealed: RevealedSet::new(),
        }
    }

    pub fn is_fail_open(&self) -> bool {
        self.backend.is_none()
    }

    /// Starts observing `target` for `step`, replacing any earlier target for
    /// the same step. Returns whether the revealed set grew.
    pub fn attach(&mut self, step: usize, target: B::Target) -> bool {
        let Some(backend) = self.backend.as_mut() else {
            self.attached.insert(step, target);
            return self.reveal(step);
        };

        if let Some(previous) = self.attached.remove(&step) {
            debug!("Re-attaching step {}", step);
            backend.unobserve(&previous);
        }
        backend.observe(&target);
        self.attached.insert(step, target);
        false
    }

    /// Safe to call for steps that were never attached.
    pub fn detach(&mut self, step: usize) {
        if let Some(target) = self.attached.remove(&step) {
            if let Some(backend) = self.backend.as_mut() {
                backend.unobserve(&target);
            }
        }
    }

    pub fn detach_all(&mut self) {
        self.attached.clear();
        if let Some(backend) = self.backend.as_mut() {
            backend.disconnect();
        }
    }

    pub fn is_observing(&self, step: usize) -> bool {
        self.attached.contains_key(&step)
    }

    pub fn observed_count(&self) -> usize {
        self.attached.len()
    }

    /// Applies one notice. Returns whether the revealed set grew.
    pub fn notify(&mut self, notice: &IntersectionNotice) -> bool {
        if !self.attached.contains_key(&notice.step) {
            debug!("Ignoring intersection for unattached step {}", notice.step);
            return false;
        }
        if !self.policy.qualifies(notice) {
            return false;
        }
        self.reveal(notice.step)
    }

    pub fn revealed(&self) -> &RevealedSet {
        &self.revealed
    }

    fn reveal(&mut self, step: usize) -> bool {
        let grew = self.revealed.insert(step);
        if grew {
            debug!("Step {} revealed", step);
        }
        grew
    }
}

impl<B: ObservationBackend> Drop for VisibilityTracker<B> {
    fn drop(&mut self) {
        self.detach_all();
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingBackend;
    use super::*;

    fn notice(step: usize, is_intersecting: bool, ratio: f64) -> IntersectionNotice {
        IntersectionNotice {
            step,
            is_intersecting,
            ratio,
        }
    }

    fn observed_tracker(steps: usize) -> (VisibilityTracker<RecordingBackend>, RecordingBackend) {
        let backend = RecordingBackend::default();
        let mut tracker = VisibilityTracker::new(RevealPolicy::default(), Some(backend.clone()));
        let names = ["s0", "s1", "s2", "s3", "s4", "s5"];
        for step in 0..steps {
            tracker.attach(step, names[step]);
        }
        (tracker, backend)
    }

    #[test]
    fn default_policy_matches_reveal_settings() {
        let policy = RevealPolicy::default();
        assert_eq!(policy.threshold, 0.3);
        assert_eq!(policy.root_margin(), "-50px");
    }

    #[test]
    fn policy_requires_intersection_and_threshold() {
        let policy = RevealPolicy::default();
        assert!(policy.qualifies(&notice(0, true, 0.3)));
        assert!(policy.qualifies(&notice(0, true, 1.0)));
        assert!(!policy.qualifies(&notice(0, true, 0.29)));
        assert!(!policy.qualifies(&notice(0, false, 0.9)));
    }

    #[test]
    fn qualifying_notice_reveals_only_that_step() {
        let (mut tracker, _) = observed_tracker(4);
        assert!(tracker.notify(&notice(2, true, 0.5)));
        assert_eq!(tracker.revealed().iter().collect::<Vec<_>>(), vec![2]);
        for step in [0, 1, 3] {
            assert!(!tracker.revealed().contains(step));
        }
    }

    #[test]
    fn scrolling_away_never_hides_a_step() {
        let (mut tracker, _) = observed_tracker(2);
        tracker.notify(&notice(1, true, 0.8));
        assert!(!tracker.notify(&notice(1, false, 0.0)));
        assert!(tracker.revealed().contains(1));
    }

    #[test]
    fn revealed_set_never_shrinks() {
        let (mut tracker, _) = observed_tracker(4);
        let sequence = [
            notice(3, true, 0.4),
            notice(3, false, 0.0),
            notice(0, true, 0.1),
            notice(0, true, 0.35),
            notice(3, true, 0.9),
            notice(1, false, 0.0),
            notice(2, true, 1.0),
        ];
        let mut previous = tracker.revealed().clone();
        for n in &sequence {
            tracker.notify(n);
            let current = tracker.revealed();
            assert!(current.len() >= previous.len());
            assert!(previous.iter().all(|s| current.contains(s)));
            previous = current.clone();
        }
        assert_eq!(previous.iter().collect::<Vec<_>>(), vec![0, 2, 3]);
    }

    #[test]
    fn notice_order_does_not_change_the_outcome() {
        let notices = [notice(0, true, 0.5), notice(2, true, 0.7), notice(1, true, 0.2)];
        let (mut forward, _) = observed_tracker(3);
        let (mut backward, _) = observed_tracker(3);
        notices.iter().for_each(|n| {
            forward.notify(n);
        });
        notices.iter().rev().for_each(|n| {
            backward.notify(n);
        });
        assert_eq!(forward.revealed(), backward.revealed());
    }

    #[test]
    fn duplicate_notice_is_ignored() {
        let (mut tracker, _) = observed_tracker(2);
        assert!(tracker.notify(&notice(0, true, 0.6)));
        assert!(!tracker.notify(&notice(0, true, 0.6)));
        assert_eq!(tracker.revealed().len(), 1);
    }

    #[test]
    fn notice_for_unattached_step_is_ignored() {
        let (mut tracker, _) = observed_tracker(4);
        assert!(!tracker.notify(&notice(99, true, 1.0)));
        assert!(tracker.revealed().is_empty());
    }

    #[test]
    fn attaching_twice_keeps_one_observation() {
        let backend = RecordingBackend::default();
        let mut tracker = VisibilityTracker::new(RevealPolicy::default(), Some(backend.clone()));
        tracker.attach(1, "old");
        tracker.attach(1, "new");
        assert_eq!(tracker.observed_count(), 1);
        assert_eq!(backend.calls.borrow().observing, vec!["new"]);
    }

    #[test]
    fn detach_is_idempotent() {
        let (mut tracker, backend) = observed_tracker(2);
        tracker.detach(1);
        tracker.detach(1);
        tracker.detach(42);
        assert!(!tracker.is_observing(1));
        assert_eq!(backend.calls.borrow().observing, vec!["s0"]);
        assert!(!tracker.notify(&notice(1, true, 1.0)));
    }

    #[test]
    fn detach_all_keeps_revealed_steps() {
        let (mut tracker, backend) = observed_tracker(3);
        tracker.notify(&notice(0, true, 1.0));
        tracker.detach_all();
        assert_eq!(tracker.observed_count(), 0);
        assert!(backend.calls.borrow().observing.is_empty());
        assert!(tracker.revealed().contains(0));
    }

    #[test]
    fn dropping_the_tracker_releases_observation() {
        let (tracker, backend) = observed_tracker(3);
        drop(tracker);
        let calls = backend.calls.borrow();
        assert!(calls.observing.is_empty());
        assert!(calls.disconnects >= 1);
    }

    #[test]
    fn without_backend_every_attached_step_is_revealed() {
        let mut tracker: VisibilityTracker<RecordingBackend> =
            VisibilityTracker::new(RevealPolicy::default(), None);
        assert!(tracker.is_fail_open());
        assert!(tracker.attach(0, "a"));
        assert!(tracker.attach(3, "b"));
        assert!(!tracker.attach(3, "c"));
        assert_eq!(tracker.revealed().iter().collect::<Vec<_>>(), vec![0, 3]);
    }
}
