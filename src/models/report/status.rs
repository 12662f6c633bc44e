use serde::Serialize;

/// Report lifecycle: submitted → under_review → action_taken → resolved.
///
/// Administrators may set any state from any state; ordering only drives the timeline display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    #[default]
    Submitted,
    UnderReview,
    ActionTaken,
    Resolved,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 4] = [
        ReportStatus::Submitted,
        ReportStatus::UnderReview,
        ReportStatus::ActionTaken,
        ReportStatus::Resolved,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "submitted" => Some(ReportStatus::Submitted),
            "under_review" => Some(ReportStatus::UnderReview),
            "action_taken" => Some(ReportStatus::ActionTaken),
            "resolved" => Some(ReportStatus::Resolved),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReportStatus::Submitted => "submitted",
            ReportStatus::UnderReview => "under_review",
            ReportStatus::ActionTaken => "action_taken",
            ReportStatus::Resolved => "resolved",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReportStatus::Submitted => "Submitted",
            ReportStatus::UnderReview => "Under Review",
            ReportStatus::ActionTaken => "Action Taken",
            ReportStatus::Resolved => "Resolved",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ReportStatus::Submitted => "Your submission has been successfully received by our system.",
            ReportStatus::UnderReview => "The appropriate authorities are currently reviewing your submission.",
            ReportStatus::ActionTaken => "Initial action or investigation has been initiated based on your submission.",
            ReportStatus::Resolved => "The case has been resolved or closed. Thank you for your contribution.",
        }
    }

    /// Zero-based position in the lifecycle.
    pub fn position(self) -> usize {
        self as usize
    }

    pub fn is_terminal(self) -> bool {
        self == ReportStatus::Resolved
    }

    /// Every pair is allowed, including moving backwards.
    pub fn can_transition(self, _to: ReportStatus) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepState {
    Complete,
    Active,
    Pending,
}

/// One row of the status timeline.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineStep {
    pub status: ReportStatus,
    pub state: StepState,
}

impl TimelineStep {
    pub fn label(&self) -> &'static str {
        self.status.label()
    }

    pub fn description(&self) -> &'static str {
        self.status.description()
    }

    /// CSS modifier used by the timeline partial.
    pub fn css_class(&self) -> &'static str {
        match self.state {
            StepState::Complete => "complete",
            StepState::Active => "active",
            StepState::Pending => "pending",
        }
    }
}

/// Steps before `current` are complete, `current` is active, the rest pending.
pub fn timeline(current: ReportStatus) -> Vec<TimelineStep> {
    ReportStatus::ALL
        .iter()
        .map(|&status| {
            let state = match status.position().cmp(&current.position()) {
                std::cmp::Ordering::Less => StepState::Complete,
                std::cmp::Ordering::Equal => StepState::Active,
                std::cmp::Ordering::Greater => StepState::Pending,
            };
            TimelineStep { status, state }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_as_str_agree() {
        for status in ReportStatus::ALL {
            assert_eq!(ReportStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ReportStatus::parse("closed"), None);
        assert_eq!(ReportStatus::parse("Under Review"), None);
    }

    #[test]
    fn default_is_submitted_and_resolved_is_terminal() {
        assert_eq!(ReportStatus::default(), ReportStatus::Submitted);
        assert!(ReportStatus::Resolved.is_terminal());
        assert!(!ReportStatus::ActionTaken.is_terminal());
    }

    #[test]
    fn any_state_reaches_any_other() {
        for from in ReportStatus::ALL {
            for to in ReportStatus::ALL {
                assert!(from.can_transition(to));
            }
        }
    }

    #[test]
    fn timeline_marks_previous_steps_complete() {
        let steps = timeline(ReportStatus::ActionTaken);
        let states: Vec<StepState> = steps.iter().map(|s| s.state).collect();
        assert_eq!(
            states,
            vec![StepState::Complete, StepState::Complete, StepState::Active, StepState::Pending]
        );
        assert_eq!(steps[2].label(), "Action Taken");
        assert_eq!(steps[3].css_class(), "pending");
    }

    #[test]
    fn timeline_for_submitted_has_nothing_complete() {
        let steps = timeline(ReportStatus::Submitted);
        assert_eq!(steps[0].state, StepState::Active);
        assert!(steps[1..].iter().all(|s| s.state == StepState::Pending));
    }
}
