use crate::path::PathNode;
use std::fmt::Write;

const INDENT: &str = "  ";

/// Depth first text dump of a path tree, one line per node. Concurrent branches are
/// written before the sequential continuation.
pub fn render(node: &PathNode, indent: usize) -> String {
    let mut out = String::new();
    match write_node(&mut out, node, indent) {
        Ok(()) => out,
        Err(_) => String::new(),
    }
}

pub(super) fn write_node(out: &mut impl Write, node: &PathNode, indent: usize) -> std::fmt::Result {
    let pad = INDENT.repeat(indent);
    let executed = node
        .actual_exec_time
        .map(|time| time.to_rfc3339())
        .unwrap_or_else(|| "-".into());
    writeln!(
        out,
        "{pad}Task ID: {}, Name: {}, Delay: {} days, Executed: {executed}",
        node.task.id, node.task.name, node.delay
    )?;

    for branch in &node.concurrent {
        writeln!(out, "{pad}{INDENT}Concurrent Task:")?;
        write_node(out, branch, indent + 2)?;
    }
    for next in &node.next {
        write_node(out, next, indent + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bpmn::Task;
    use chrono::{TimeZone, Utc};

    #[test]
    fn nested_tree() {
        let time = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let tree = PathNode::new(Task::new("F", "Parallel Gateway"), 0)
            .with_next([PathNode::new(Task::new("E", "Event"), 1).with_exec_time(time)])
            .with_concurrent([PathNode::new(Task::new("X", "Pack"), 0)]);
        assert_eq!(
            render(&tree, 0),
            "Task ID: F, Name: Parallel Gateway, Delay: 0 days, Executed: -\n\
             \x20\x20Concurrent Task:\n\
             \x20\x20\x20\x20Task ID: X, Name: Pack, Delay: 0 days, Executed: -\n\
             \x20\x20Task ID: E, Name: Event, Delay: 1 days, Executed: 2024-01-02T03:04:05+00:00\n"
        );
        assert_eq!(tree.to_string(), render(&tree, 0));
    }

    #[test]
    fn indent_offset() {
        let leaf = PathNode::new(Task::new("A", "Register"), 0);
        assert!(render(&leaf, 2).starts_with("    Task ID: A"));
    }
}
