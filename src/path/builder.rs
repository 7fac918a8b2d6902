use crate::{
    api::{DelayKey, Diagnostics, LOG_ONLY, Trace, Variables},
    bpmn::SequenceFlow,
    condition::evaluate,
    diagram::Diagram,
    path::PathNode,
};
use std::collections::HashSet;

/// Task ids already on the walk. Only guards against cycles.
pub type Visited = HashSet<String>;

/// Derive the execution paths of a diagram from a start element.
///
/// Exclusive gateways multiply the alternatives: every outgoing flow whose condition
/// holds yields its own copy of the gateway node. Parallel gateways fan out into
/// `concurrent` and never rejoin. An element reached twice on the same walk is not
/// repeated, which also suppresses diamond shaped convergence.
pub struct PathBuilder<'a> {
    diagram: &'a Diagram,
    variables: &'a Variables,
    mandatory: Option<&'a HashSet<String>>,
    delay_key: DelayKey,
    diagnostics: &'a Diagnostics,
}

impl<'a> PathBuilder<'a> {
    pub fn new(diagram: &'a Diagram, variables: &'a Variables) -> Self {
        Self {
            diagram,
            variables,
            mandatory: None,
            delay_key: DelayKey::default(),
            diagnostics: &LOG_ONLY,
        }
    }

    /// Flag nodes whose task id is in the set as mandatory.
    pub fn mandatory(mut self, mandatory: &'a HashSet<String>) -> Self {
        self.mandatory = Some(mandatory);
        self
    }

    pub fn delay_key(mut self, delay_key: DelayKey) -> Self {
        self.delay_key = delay_key;
        self
    }

    pub fn diagnostics(mut self, diagnostics: &'a Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// All alternative path trees starting at `start_id`.
    pub fn build_paths(&self, start_id: &str) -> Vec<PathNode> {
        self.walk(start_id, &mut Visited::new())
    }

    /// Only the first alternative of [`PathBuilder::build_paths`]. Other alternatives are discarded.
    pub fn first_path(&self, start_id: &str) -> Option<PathNode> {
        self.build_paths(start_id).into_iter().next()
    }

    /// Walk from `task_id`. Branches of an exclusive gateway get their own copy of `visited`,
    /// everything else shares it.
    pub fn walk(&self, task_id: &str, visited: &mut Visited) -> Vec<PathNode> {
        if !visited.insert(task_id.to_string()) {
            self.diagnostics.emit(Trace::Revisit {
                task_id: task_id.into(),
            });
            return Vec::new();
        }

        let Some(task) = self.diagram.task(task_id) else {
            self.diagnostics.emit(Trace::UnknownTask {
                task_id: task_id.into(),
            });
            return Vec::new();
        };
        self.diagnostics.emit(Trace::Visit {
            task_id: task_id.into(),
        });

        let mut current = PathNode::new(task.clone(), self.diagram.delay(task_id, self.delay_key))
            .mandatory(self.is_mandatory(task_id));

        let flows = self.diagram.outgoing(task_id);
        if flows.is_empty() {
            return vec![current];
        }

        if self.diagram.is_exclusive(task_id) {
            let mut alternatives = Vec::new();
            for flow in flows.iter().filter(|flow| self.enabled(flow)) {
                let mut branch = visited.clone();
                for alternative in self.walk(&flow.target_ref, &mut branch) {
                    alternatives.push(current.clone().with_next([alternative]));
                }
            }
            return alternatives;
        }

        let parallel = self.diagram.is_parallel(task_id);
        for flow in flows {
            self.diagnostics.emit(Trace::FlowTaken {
                flow_id: flow.id.clone(),
            });
            let paths = self.walk(&flow.target_ref, visited);
            if parallel {
                current.concurrent.extend(paths);
            } else {
                current.next.extend(paths);
            }
        }
        vec![current]
    }

    fn enabled(&self, flow: &SequenceFlow) -> bool {
        let Some(condition) = &flow.condition_expression else {
            self.diagnostics.emit(Trace::FlowTaken {
                flow_id: flow.id.clone(),
            });
            return true;
        };

        if evaluate(condition, self.variables) {
            self.diagnostics.emit(Trace::FlowTaken {
                flow_id: flow.id.clone(),
            });
            true
        } else {
            self.diagnostics.emit(Trace::FlowRejected {
                flow_id: flow.id.clone(),
                condition: condition.clone(),
            });
            false
        }
    }

    fn is_mandatory(&self, task_id: &str) -> bool {
        self.mandatory.is_some_and(|set| set.contains(task_id))
    }
}

/// All alternative path trees of `diagram` starting at `start_id`.
pub fn build_paths(start_id: &str, diagram: &Diagram, variables: &Variables) -> Vec<PathNode> {
    PathBuilder::new(diagram, variables).build_paths(start_id)
}
