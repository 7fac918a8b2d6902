use std::{collections::HashMap, fmt::Display};

/// Variable bindings used when evaluating sequence flow conditions.
pub type Variables = HashMap<String, f64>;

/// Callback receiving every diagnostic trace.
pub type DiagnosticsCallback = Box<dyn Fn(&Trace) + Sync + Send>;

/// Which of the two compared processes something belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Standard,
    Actual,
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Standard => write!(f, "standard"),
            Side::Actual => write!(f, "actual"),
        }
    }
}

/// How a path node finds its delay in the timer table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DelayKey {
    /// Look up the node's task id among the `timerEventDefinition` ids.
    /// A delay is only found when a task shares its id with a timer definition.
    #[default]
    TimerDefinition,
    /// Look up the delay of the timer definition enclosed by the node's event.
    EnclosingEvent,
}

/// Kind of deviation between the standard and the actual path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarianceKind {
    NameMismatch,
    IdMismatch,
    /// Executed before standard time plus delay
    TooEarly,
    /// Executed after standard time plus delay
    TooLate,
    /// Executed after the standard time when no delay is defined
    LaterThanExpected,
    UnexpectedTask,
    MissingTask,
    ConcurrentCountMismatch,
    ExtraConcurrentTask,
}

impl Display for VarianceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self, f)
    }
}

/// One counted deviation. The variance count of a comparison is the number of records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variance {
    pub kind: VarianceKind,
    /// Task id on the standard side of the aligned node pair
    pub standard: String,
    /// Task id on the actual side of the aligned node pair
    pub actual: String,
    pub detail: String,
}

impl Display for Variance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at ({} / {}): {}",
            self.kind, self.standard, self.actual, self.detail
        )
    }
}

/// Diagnostic event emitted while building or comparing paths
#[derive(Debug, Clone, PartialEq)]
pub enum Trace {
    Visit { task_id: String },
    Revisit { task_id: String },
    UnknownTask { task_id: String },
    FlowTaken { flow_id: String },
    FlowRejected { flow_id: String, condition: String },
    Variance(Variance),
}

impl Display for Trace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trace::Visit { task_id } => write!(f, "visit {task_id}"),
            Trace::Revisit { task_id } => write!(f, "already visited {task_id}"),
            Trace::UnknownTask { task_id } => write!(f, "unknown task {task_id}"),
            Trace::FlowTaken { flow_id } => write!(f, "take flow {flow_id}"),
            Trace::FlowRejected { flow_id, condition } => {
                write!(f, "reject flow {flow_id}, condition not met: {condition}")
            }
            Trace::Variance(variance) => write!(f, "variance {variance}"),
        }
    }
}

pub(crate) static LOG_ONLY: Diagnostics = Diagnostics::log_only();

/// Diagnostics sink. Traces are always written to the `log` facade and handed to the
/// callback when one is installed.
#[derive(Default)]
pub struct Diagnostics {
    callback: Option<DiagnosticsCallback>,
}

impl Diagnostics {
    pub(crate) const fn log_only() -> Self {
        Self { callback: None }
    }

    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Trace) + 'static + Sync + Send,
    {
        Self {
            callback: Some(Box::new(func)),
        }
    }

    pub(crate) fn emit(&self, trace: Trace) {
        log::debug!("{trace}");
        if let Some(callback) = &self.callback {
            callback(&trace);
        }
    }
}

impl std::fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagnostics")
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn callback_receives_traces() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let diagnostics = Diagnostics::new(move |trace| {
            sink.lock().unwrap().push(trace.to_string());
        });
        diagnostics.emit(Trace::Visit {
            task_id: "Task_1".into(),
        });
        Diagnostics::log_only().emit(Trace::Revisit {
            task_id: "Task_1".into(),
        });
        assert_eq!(*seen.lock().unwrap(), vec!["visit Task_1".to_string()]);
    }

    #[test]
    fn variance_display() {
        let variance = Variance {
            kind: VarianceKind::MissingTask,
            standard: "A".into(),
            actual: "B".into(),
            detail: "Approve".into(),
        };
        assert_eq!(variance.to_string(), "MissingTask at (A / B): Approve");
    }
}
