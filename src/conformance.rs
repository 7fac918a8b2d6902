use crate::{
    api::{DelayKey, Diagnostics, Side, Trace, Variables, Variance},
    diagram::Diagram,
    error::Error,
    path::{ExecutionTimes, PathNode, builder::PathBuilder, compare::Comparator, render},
};
use std::{collections::HashSet, fmt::Display};

/// Compares an actual process with a standard process.
pub struct Conformance {
    standard: Diagram,
    actual: Diagram,
    variables: Variables,
    mandatory: HashSet<String>,
    standard_times: ExecutionTimes,
    actual_times: ExecutionTimes,
    delay_key: DelayKey,
    diagnostics: Diagnostics,
}

impl Conformance {
    /// Nothing is mandatory until [`Conformance::mandatory`] is called.
    pub fn new(standard: Diagram, actual: Diagram) -> Self {
        Self {
            standard,
            actual,
            variables: Default::default(),
            mandatory: Default::default(),
            standard_times: Default::default(),
            actual_times: Default::default(),
            delay_key: Default::default(),
            diagnostics: Default::default(),
        }
    }

    /// Variable bindings for the sequence flow conditions of both processes
    pub fn variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }

    /// Task ids enforced during comparison
    pub fn mandatory<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mandatory.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Reference execution times of the standard tasks
    pub fn standard_times(mut self, times: ExecutionTimes) -> Self {
        self.standard_times = times;
        self
    }

    /// Observed execution times of the actual tasks
    pub fn actual_times(mut self, times: ExecutionTimes) -> Self {
        self.actual_times = times;
        self
    }

    pub fn delay_key(mut self, delay_key: DelayKey) -> Self {
        self.delay_key = delay_key;
        self
    }

    /// Receive every trace emitted while building and comparing the paths.
    pub fn diagnostics<F>(mut self, func: F) -> Self
    where
        F: Fn(&Trace) + 'static + Sync + Send,
    {
        self.diagnostics = Diagnostics::new(func);
        self
    }

    /// Build the first path of each process from its first start event and compare them.
    /// Any other alternative is discarded.
    pub fn compare(&self) -> Result<Report, Error> {
        let standard = self
            .first_path(&self.standard, Side::Standard)?
            .ok_or(Error::NoStandardPath)?;
        let actual = self
            .first_path(&self.actual, Side::Actual)?
            .ok_or(Error::NoActualPath)?;

        let variances = Comparator::new(&self.mandatory)
            .diagnostics(&self.diagnostics)
            .compare(Some(&standard), Some(&actual));
        log::debug!("Found {} variance(s)", variances.len());

        Ok(Report {
            standard,
            actual,
            variances,
        })
    }

    fn first_path(&self, diagram: &Diagram, side: Side) -> Result<Option<PathNode>, Error> {
        let start = diagram
            .start_events()
            .first()
            .ok_or(Error::NoStartEvent(side))?;
        let mut path = PathBuilder::new(diagram, &self.variables)
            .mandatory(&self.mandatory)
            .delay_key(self.delay_key)
            .diagnostics(&self.diagnostics)
            .first_path(start);

        if let Some(path) = &mut path {
            path.apply_exec_times(match side {
                Side::Standard => &self.standard_times,
                Side::Actual => &self.actual_times,
            });
        }
        Ok(path)
    }
}

/// Outcome of a comparison
#[derive(Debug, Clone)]
pub struct Report {
    pub standard: PathNode,
    pub actual: PathNode,
    pub variances: Vec<Variance>,
}

impl Report {
    pub fn variance_count(&self) -> usize {
        self.variances.len()
    }

    pub fn is_match(&self) -> bool {
        self.variances.is_empty()
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Standard Path:")?;
        write!(f, "{}", render(&self.standard, 0))?;
        writeln!(f, "Actual Path:")?;
        write!(f, "{}", render(&self.actual, 0))?;
        if self.is_match() {
            write!(f, "Paths match exactly!")
        } else {
            write!(
                f,
                "Path has {} variance(s) compared to the standard path.",
                self.variance_count()
            )
        }
    }
}

/// Compare two BPMN documents and return the textual report.
///
/// No task is mandatory here, so only the concurrent branch checks can add variances.
/// Failures are returned as the report text.
pub fn compare_path(standard: &str, actual: &str) -> String {
    let standard = match standard.parse::<Diagram>() {
        Ok(diagram) => diagram,
        Err(err) => return format!("Error parsing standard BPMN: {err}"),
    };
    let actual = match actual.parse::<Diagram>() {
        Ok(diagram) => diagram,
        Err(err) => return format!("Error parsing actual BPMN: {err}"),
    };

    match Conformance::new(standard, actual).compare() {
        Ok(report) => report.to_string(),
        Err(err) => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::VarianceKind;
    use chrono::{TimeZone, Utc};

    static STANDARD: &str = include_str!("../demos/standard.bpmn");
    static ACTUAL: &str = include_str!("../demos/actual.bpmn");

    #[test]
    fn identical_documents_match() {
        let report = compare_path(STANDARD, STANDARD);
        assert!(report.starts_with("Standard Path:\n"));
        assert!(report.ends_with("Paths match exactly!"));
    }

    #[test]
    fn identical_documents_all_mandatory() -> Result<(), Box<dyn std::error::Error>> {
        let standard: Diagram = STANDARD.parse()?;
        let ids: Vec<String> = standard.tasks().keys().cloned().collect();
        let report = Conformance::new(standard.clone(), standard)
            .mandatory(ids)
            .compare()?;
        assert!(report.is_match());
        Ok(())
    }

    #[test]
    fn default_entry_point_only_counts_concurrency() {
        let report = compare_path(STANDARD, ACTUAL);
        assert!(report.ends_with("Path has 1 variance(s) compared to the standard path."));
    }

    #[test]
    fn mandatory_tasks_find_deviations() -> Result<(), Box<dyn std::error::Error>> {
        let report = Conformance::new(STANDARD.parse()?, ACTUAL.parse()?)
            .mandatory(["Task_Register", "Task_Check", "Task_Ship", "Task_Pack"])
            .compare()?;
        let kinds: Vec<_> = report.variances.iter().map(|v| v.kind).collect();
        assert_eq!(
            kinds,
            vec![
                VarianceKind::UnexpectedTask,
                VarianceKind::MissingTask,
                VarianceKind::NameMismatch,
                VarianceKind::IdMismatch,
                VarianceKind::ConcurrentCountMismatch,
            ]
        );
        Ok(())
    }

    #[test]
    fn execution_times() -> Result<(), Box<dyn std::error::Error>> {
        let start = Utc.with_ymd_and_hms(2024, 6, 3, 8, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 6, 4, 8, 0, 0).unwrap();
        let standard: Diagram = STANDARD.parse()?;
        let report = Conformance::new(standard.clone(), standard)
            .mandatory(["Task_Register"])
            .standard_times(ExecutionTimes::from([("Task_Register".into(), start)]))
            .actual_times(ExecutionTimes::from([("Task_Register".into(), late)]))
            .compare()?;
        assert_eq!(report.variance_count(), 1);
        assert_eq!(report.variances[0].kind, VarianceKind::LaterThanExpected);
        assert!(report.to_string().contains("Executed: 2024-06-04T08:00:00+00:00"));
        Ok(())
    }

    #[test]
    fn variables_select_branch() -> Result<(), Box<dyn std::error::Error>> {
        let standard: Diagram = STANDARD.parse()?;
        let report = Conformance::new(standard.clone(), standard)
            .variables(Variables::from([("amount".into(), 500.0)]))
            .compare()?;
        assert!(report.to_string().contains("Name: Manual review"));
        Ok(())
    }

    #[test]
    fn failures_are_report_text() {
        assert!(
            compare_path("<definitions>", STANDARD).starts_with("Error parsing standard BPMN:")
        );
        assert!(compare_path(STANDARD, "").starts_with("Error parsing actual BPMN:"));

        let no_start = r#"<definitions><process id="P"><task id="A"/></process></definitions>"#;
        assert_eq!(
            compare_path(no_start, STANDARD),
            "No start events found in standard BPMN."
        );
        assert_eq!(
            compare_path(STANDARD, no_start),
            "No start events found in actual BPMN."
        );

        let blocked = r#"<definitions><process id="P">
            <startEvent id="S"/><exclusiveGateway id="S"/><task id="A"/>
            <sequenceFlow id="f" sourceRef="S" targetRef="A" name="amount &gt; 1"/>
        </process></definitions>"#;
        assert_eq!(compare_path(blocked, STANDARD), "No standard paths found.");
        assert_eq!(compare_path(STANDARD, blocked), "No unknown paths found.");
    }
}
