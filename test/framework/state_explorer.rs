//! # State Space Explorer
//!
//! Executes custody action sequences against a [`CustodyHarness`] and
//! verifies invariants after every transition.
//!
//! Each explored state is a [`CustodySnapshot`]; edges are
//! [`CustodyAction`]s. Runs are bounded by `max_steps`.

extern crate std;

use std::string::String;
use std::vec::Vec;

use super::generators::CustodyAction;
use super::invariants::{InvariantSet, TransitionInvariantSet};
use super::{ActionOutcome, CustodyHarness, CustodySnapshot, TestRunSummary};

// ── Explorer Configuration ───────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    /// Maximum number of actions to execute in a single exploration run.
    pub max_steps: usize,
    /// Whether to halt on the first invariant violation (fail-fast).
    pub fail_fast: bool,
    /// Whether to record snapshots for later analysis.
    pub record_snapshots: bool,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            max_steps: 100,
            fail_fast: true,
            record_snapshots: false,
        }
    }
}

// ── Exploration Result ───────────────────────────────────────────────────────

#[derive(Debug)]
pub struct ExplorationResult {
    pub summary: TestRunSummary,
    pub snapshots: Vec<CustodySnapshot>,
    pub action_log: Vec<(CustodyAction, ActionOutcome)>,
}

impl ExplorationResult {
    pub fn passed(&self) -> bool {
        self.summary.passed()
    }

    /// Number of actions the contracts accepted.
    pub fn accepted(&self) -> usize {
        self.action_log
            .iter()
            .filter(|(_, outcome)| *outcome == ActionOutcome::Ok)
            .count()
    }
}

// ── State Space Explorer ─────────────────────────────────────────────────────

/// Drives a harness through action sequences, checking state and transition
/// invariants after each step.
pub struct StateExplorer<'a> {
    harness: &'a CustodyHarness,
    invariants: InvariantSet,
    transitions: TransitionInvariantSet,
    config: ExplorerConfig,
    /// Prescription ids in creation order; actions address them by slot.
    created: Vec<u64>,
}

impl<'a> StateExplorer<'a> {
    pub fn new(
        harness: &'a CustodyHarness,
        invariants: InvariantSet,
        transitions: TransitionInvariantSet,
        config: ExplorerConfig,
    ) -> Self {
        Self {
            harness,
            invariants,
            transitions,
            config,
            created: Vec::new(),
        }
    }

    /// Create an explorer with default configuration and built-in invariants.
    pub fn with_defaults(harness: &'a CustodyHarness) -> Self {
        Self::new(
            harness,
            InvariantSet::custody_defaults(),
            TransitionInvariantSet::custody_defaults(),
            ExplorerConfig::default(),
        )
    }

    /// Execute a sequence of actions, checking invariants after each.
    pub fn explore(&mut self, actions: &[CustodyAction]) -> ExplorationResult {
        let mut summary = TestRunSummary::new();
        let mut snapshots = Vec::new();
        let mut action_log = Vec::new();

        let mut before = self.harness.snapshot();
        if self.config.record_snapshots {
            snapshots.push(before.clone());
        }

        let steps = actions.len().min(self.config.max_steps);

        for action in actions.iter().take(steps) {
            let outcome = self.execute_action(action);
            summary.entry_points_hit.insert(action_entry_point(action));
            summary.actions_executed += 1;
            if outcome == ActionOutcome::Ok {
                summary.transitions_observed += 1;
            }
            action_log.push((action.clone(), outcome));

            let after = self.harness.snapshot();
            let mut violations = self.invariants.check_all(&after);
            violations.extend(self.transitions.check_all(&before, &after));
            summary.invariant_checks += 1;

            let failed = !violations.is_empty();
            for (name, msg) in violations {
                summary.invariant_violations.push(std::format!(
                    "After action #{} ({:?}): [{}] {}",
                    summary.actions_executed,
                    action,
                    name,
                    msg
                ));
            }

            if self.config.record_snapshots {
                snapshots.push(after.clone());
            }
            if failed && self.config.fail_fast {
                break;
            }
            before = after;
        }

        ExplorationResult {
            summary,
            snapshots,
            action_log,
        }
    }

    /// Prescription id for `slot`, or an id no prescription holds yet.
    fn target(&self, slot: usize) -> u64 {
        if self.created.is_empty() {
            return self.harness.registry.prescription_count() + 1;
        }
        self.created[slot % self.created.len()]
    }

    fn execute_action(&mut self, action: &CustodyAction) -> ActionOutcome {
        let h = self.harness;
        match action {
            CustodyAction::Create { doctor, patient } => {
                let result = h.try_create(
                    &h.address_of(*doctor),
                    &h.address_of(*patient),
                    "rx:generated",
                );
                if let Ok(id) = result {
                    self.created.push(id);
                }
                result.into()
            }
            CustodyAction::Dispense { slot, actor } => {
                h.dispense(self.target(*slot), &h.address_of(*actor)).into()
            }
            CustodyAction::AcceptDelivery { slot, actor } => h
                .accept_delivery(self.target(*slot), &h.address_of(*actor))
                .into(),
            CustodyAction::Receive { slot, actor } => {
                h.receive(self.target(*slot), &h.address_of(*actor)).into()
            }
            CustodyAction::AcceptLogistics { slot, actor } => h
                .accept_logistics(self.target(*slot), &h.address_of(*actor))
                .into(),
            CustodyAction::Confirm { slot, actor } => {
                h.confirm(self.target(*slot), &h.address_of(*actor)).into()
            }
            CustodyAction::AdvanceTime { delta } => {
                h.env.advance_time(*delta);
                ActionOutcome::Ok
            }
        }
    }
}

/// Map a custody action to its contract entry point for coverage tracking.
fn action_entry_point(action: &CustodyAction) -> String {
    match action {
        CustodyAction::Create { .. } => "create".into(),
        CustodyAction::Dispense { .. } => "record_dispense".into(),
        CustodyAction::AcceptDelivery { .. } => "record_accept".into(),
        CustodyAction::Receive { .. } => "record_receive".into(),
        CustodyAction::AcceptLogistics { .. } => "record_logistics_accept".into(),
        CustodyAction::Confirm { .. } => "record_confirmation".into(),
        CustodyAction::AdvanceTime { .. } => "advance_time".into(),
    }
}

/// Every custody write entry point, for coverage calculation.
pub const CUSTODY_ENTRY_POINTS: &[&str] = &[
    "create",
    "record_dispense",
    "record_accept",
    "record_receive",
    "record_logistics_accept",
    "record_confirmation",
];
