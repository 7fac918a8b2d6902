use bpmn_variance::{Conformance, DelayKey, Diagram, ExecutionTimes, Variables};
use chrono::{TimeZone, Utc};

extern crate pretty_env_logger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let standard = Diagram::from_file("demos/standard.bpmn")?;
    let actual = Diagram::from_file("demos/actual.bpmn")?;

    let received = Utc.with_ymd_and_hms(2024, 6, 3, 8, 0, 0).unwrap();
    let registered = Utc.with_ymd_and_hms(2024, 6, 4, 10, 30, 0).unwrap();

    let report = Conformance::new(standard, actual)
        .variables(Variables::from([("amount".into(), 80.0)]))
        .mandatory(["Task_Register", "Task_Check", "Task_Ship", "Task_Pack"])
        .standard_times(ExecutionTimes::from([("Task_Register".into(), received)]))
        .actual_times(ExecutionTimes::from([("Task_Register".into(), registered)]))
        .delay_key(DelayKey::EnclosingEvent)
        .diagnostics(|trace| log::trace!("{trace}"))
        .compare()?;

    println!("{report}");
    for variance in &report.variances {
        println!("- {variance}");
    }
    Ok(())
}
