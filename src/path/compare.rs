use crate::{
    api::{Diagnostics, LOG_ONLY, Trace, Variance, VarianceKind},
    path::PathNode,
};
use chrono::Duration;
use std::collections::HashSet;

/// Walks a standard and an actual path in lock-step and records every deviation.
///
/// Identity and timing rules apply only when the standard task is mandatory. The
/// next-step checks compare child task names and look at the mandatory flag of the
/// child. The concurrent branch checks always apply.
pub struct Comparator<'a> {
    mandatory: &'a HashSet<String>,
    diagnostics: &'a Diagnostics,
    variances: Vec<Variance>,
}

impl<'a> Comparator<'a> {
    pub fn new(mandatory: &'a HashSet<String>) -> Self {
        Self {
            mandatory,
            diagnostics: &LOG_ONLY,
            variances: Vec::new(),
        }
    }

    pub fn diagnostics(mut self, diagnostics: &'a Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Compare two trees. A missing side yields no variances.
    pub fn compare(
        mut self,
        standard: Option<&PathNode>,
        actual: Option<&PathNode>,
    ) -> Vec<Variance> {
        if let (Some(standard), Some(actual)) = (standard, actual) {
            self.visit(standard, actual);
        }
        self.variances
    }

    fn visit(&mut self, standard: &PathNode, actual: &PathNode) {
        if self.is_mandatory(&standard.task.id) {
            if standard.task.name != actual.task.name {
                self.record(
                    VarianceKind::NameMismatch,
                    standard,
                    actual,
                    format!(
                        "expected name {}, got {}",
                        standard.task.name, actual.task.name
                    ),
                );
            }
            if standard.task.id != actual.task.id {
                self.record(
                    VarianceKind::IdMismatch,
                    standard,
                    actual,
                    format!("expected id {}, got {}", standard.task.id, actual.task.id),
                );
            }
            self.check_timing(standard, actual);
        }

        self.check_next_steps(standard, actual);

        for (standard_next, actual_next) in standard.next.iter().zip(actual.next.iter()) {
            self.visit(standard_next, actual_next);
        }

        if standard.concurrent.len() != actual.concurrent.len() {
            self.record(
                VarianceKind::ConcurrentCountMismatch,
                standard,
                actual,
                format!(
                    "expected {} concurrent tasks, got {}",
                    standard.concurrent.len(),
                    actual.concurrent.len()
                ),
            );
            for extra in actual.concurrent.iter().skip(standard.concurrent.len()) {
                self.record(
                    VarianceKind::ExtraConcurrentTask,
                    standard,
                    actual,
                    format!("extra concurrent task {}", extra.task),
                );
            }
        } else {
            for (standard_branch, actual_branch) in
                standard.concurrent.iter().zip(actual.concurrent.iter())
            {
                self.visit(standard_branch, actual_branch);
            }
        }
    }

    fn check_timing(&mut self, standard: &PathNode, actual: &PathNode) {
        let Some(executed) = actual.actual_exec_time else {
            return;
        };
        // Without a standard time there is nothing to measure against
        let Some(reference) = standard.actual_exec_time else {
            return;
        };

        if standard.delay > 0 {
            let delay = Duration::days(standard.delay.into());
            let Some(expected) = reference.checked_add_signed(delay) else {
                log::warn!("Expected time of {} is out of range", standard.task);
                return;
            };
            if executed < expected {
                self.record(
                    VarianceKind::TooEarly,
                    standard,
                    actual,
                    format!("executed at {executed}, expected at {expected}"),
                );
            } else if executed > expected {
                self.record(
                    VarianceKind::TooLate,
                    standard,
                    actual,
                    format!("executed at {executed}, expected at {expected}"),
                );
            }
        } else if executed > reference {
            self.record(
                VarianceKind::LaterThanExpected,
                standard,
                actual,
                format!("executed at {executed}, expected at {reference}"),
            );
        }
    }

    // Child tasks are matched by name, not by id.
    fn check_next_steps(&mut self, standard: &PathNode, actual: &PathNode) {
        let standard_names: HashSet<&str> =
            standard.next.iter().map(|node| node.task.name.as_str()).collect();
        let actual_names: HashSet<&str> =
            actual.next.iter().map(|node| node.task.name.as_str()).collect();

        let mut seen = HashSet::new();
        for child in &actual.next {
            let name = child.task.name.as_str();
            if seen.insert(name)
                && !standard_names.contains(name)
                && self.is_mandatory(&child.task.id)
            {
                self.record(
                    VarianceKind::UnexpectedTask,
                    standard,
                    actual,
                    format!("unexpected task {}", child.task),
                );
            }
        }

        let mut seen = HashSet::new();
        for child in &standard.next {
            let name = child.task.name.as_str();
            if seen.insert(name)
                && !actual_names.contains(name)
                && self.is_mandatory(&child.task.id)
            {
                self.record(
                    VarianceKind::MissingTask,
                    standard,
                    actual,
                    format!("missing task {}", child.task),
                );
            }
        }
    }

    fn record(
        &mut self,
        kind: VarianceKind,
        standard: &PathNode,
        actual: &PathNode,
        detail: String,
    ) {
        let variance = Variance {
            kind,
            standard: standard.task.id.clone(),
            actual: actual.task.id.clone(),
            detail,
        };
        self.diagnostics.emit(Trace::Variance(variance.clone()));
        self.variances.push(variance);
    }

    fn is_mandatory(&self, task_id: &str) -> bool {
        self.mandatory.contains(task_id)
    }
}

/// Compare a standard path with an actual path. The number of variances is the length
/// of the returned list.
pub fn compare_paths(
    standard: Option<&PathNode>,
    actual: Option<&PathNode>,
    mandatory: &HashSet<String>,
) -> Vec<Variance> {
    Comparator::new(mandatory).compare(standard, actual)
}
