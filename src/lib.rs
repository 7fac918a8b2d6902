//! # BPMN variance
//!
//! Check whether a recorded process execution conforms to a standard process. Both are
//! Business Process Model and Notation (BPMN) 2.0 files, for example created by <https://demo.bpmn.io/new>.
//!
//! - Derive the execution paths of a process from a start event.
//! - Exclusive gateways take every outgoing flow whose condition holds, e.g. `${amount &gt; 100}`.
//!   The condition is read from the `name` of the sequence flow.
//! - Parallel gateways fan out into concurrent branches. There is no join.
//! - Compare a standard path with an actual path and count the variances.
//!
//! This is not a complete implementation of the BPMN 2.0 specification and nothing is executed.
//!
//! ## Example
//!
//! ### Cargo.toml
//! ```toml
//! [dependencies]
//! bpmn-variance = "0.1"
//! log = "0.4"
//! pretty_env_logger = "0.5"
//! ```
//! ### main.rs
//!
//! ```
//! use bpmn_variance::{Conformance, Diagram};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     pretty_env_logger::init();
//!
//!     let standard = Diagram::from_file("demos/standard.bpmn")?;
//!     let actual = Diagram::from_file("demos/actual.bpmn")?;
//!
//!     let report = Conformance::new(standard, actual)
//!         .mandatory(["Task_Register", "Task_Check", "Task_Ship"])
//!         .compare()?;
//!
//!     for variance in &report.variances {
//!         println!("{variance}");
//!     }
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

mod api;
mod bpmn;
mod condition;
mod conformance;
mod diagram;
mod error;
pub mod path;

pub use api::{DelayKey, Diagnostics, Side, Trace, Variables, Variance, VarianceKind};
pub use bpmn::{SequenceFlow, Task};
pub use condition::evaluate;
pub use conformance::{Conformance, Report, compare_path};
pub use diagram::{Diagram, parse_process};
pub use error::{Error, Result};
pub use path::{
    ExecutionTimes, PathNode,
    builder::{PathBuilder, Visited, build_paths},
    compare::{Comparator, compare_paths},
    render::render,
};
