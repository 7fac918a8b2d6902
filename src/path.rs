pub mod builder;
pub mod compare;
pub mod render;

use crate::bpmn::Task;
use chrono::{DateTime, Utc};
use std::{collections::HashMap, fmt::Display};

pub use render::render;

/// Observed execution times keyed by task id.
pub type ExecutionTimes = HashMap<String, DateTime<Utc>>;

/// Node of a derived execution tree.
///
/// `next` holds the sequential continuations, `concurrent` the branches started by a
/// parallel gateway. Each subtree is owned by its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct PathNode {
    pub task: Task,
    pub next: Vec<PathNode>,
    pub concurrent: Vec<PathNode>,
    pub is_mandatory: bool,
    /// Delay in days, fixed when the node is created
    pub delay: u32,
    pub actual_exec_time: Option<DateTime<Utc>>,
}

impl PathNode {
    pub fn new(task: Task, delay: u32) -> Self {
        Self {
            task,
            next: Vec::new(),
            concurrent: Vec::new(),
            is_mandatory: false,
            delay,
            actual_exec_time: None,
        }
    }

    pub fn mandatory(mut self, is_mandatory: bool) -> Self {
        self.is_mandatory = is_mandatory;
        self
    }

    pub fn with_next(mut self, next: impl IntoIterator<Item = PathNode>) -> Self {
        self.next.extend(next);
        self
    }

    pub fn with_concurrent(mut self, concurrent: impl IntoIterator<Item = PathNode>) -> Self {
        self.concurrent.extend(concurrent);
        self
    }

    pub fn with_exec_time(mut self, time: DateTime<Utc>) -> Self {
        self.actual_exec_time = Some(time);
        self
    }

    /// Set the execution time of every node in the tree whose task id has a recorded time.
    pub fn apply_exec_times(&mut self, times: &ExecutionTimes) {
        if let Some(time) = times.get(&self.task.id) {
            self.actual_exec_time = Some(*time);
        }
        self.concurrent
            .iter_mut()
            .chain(self.next.iter_mut())
            .for_each(|node| node.apply_exec_times(times));
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        1 + self
            .concurrent
            .iter()
            .chain(self.next.iter())
            .map(PathNode::node_count)
            .sum::<usize>()
    }

    pub fn is_leaf(&self) -> bool {
        self.next.is_empty() && self.concurrent.is_empty()
    }
}

impl Display for PathNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        render::write_node(f, self, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn stamp_execution_times() {
        let time = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let mut tree = PathNode::new(Task::new("A", "Register"), 0)
            .with_concurrent([PathNode::new(Task::new("X", "Check"), 0)])
            .with_next([PathNode::new(Task::new("B", "Approve"), 0)]);
        let times = ExecutionTimes::from([("X".to_string(), time), ("B".to_string(), time)]);
        tree.apply_exec_times(&times);
        assert_eq!(tree.actual_exec_time, None);
        assert_eq!(tree.concurrent[0].actual_exec_time, Some(time));
        assert_eq!(tree.next[0].actual_exec_time, Some(time));
        assert_eq!(tree.node_count(), 3);
        assert!(!tree.is_leaf());
        assert!(tree.next[0].is_leaf());
    }
}
