use crate::{
    bpmn::{
        EVENT_NAME, EXCLUSIVE_GATEWAY_NAME, ElementType, PARALLEL_GATEWAY_NAME, SequenceFlow, Task,
    },
    diagram::Diagram,
};
use regex::Regex;
use std::sync::LazyLock;

// Day durations only, e.g. P3D
static DAYS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^P(\d+)D$").unwrap());

#[derive(Debug, Default)]
pub(super) struct Attributes {
    pub(super) id: Option<String>,
    pub(super) name: Option<String>,
    pub(super) source_ref: Option<String>,
    pub(super) target_ref: Option<String>,
}

#[derive(Debug)]
struct Open {
    element: Option<ElementType>,
    id: Option<String>,
}

#[derive(Default)]
pub(super) struct DataBuilder {
    diagram: Diagram,
    stack: Vec<Open>,
}

impl DataBuilder {
    pub(super) fn start(&mut self, element: Option<ElementType>, attributes: Attributes) {
        let parent = self.stack.last().and_then(|open| open.element);
        if let Some(element) = element {
            if parent == Some(ElementType::Process) {
                self.add_to_process(element, &attributes);
            } else if element == ElementType::TimerEventDefinition && self.in_process() {
                // Nested in an event
                let event_id = self
                    .stack
                    .iter()
                    .rev()
                    .find(|open| open.element.is_some_and(|e| e.is_event()))
                    .and_then(|open| open.id.clone());
                self.add_timer(&attributes, event_id);
            }
        }
        self.stack.push(Open {
            element,
            id: attributes.id,
        });
    }

    pub(super) fn end(&mut self) {
        self.stack.pop();
    }

    fn in_process(&self) -> bool {
        self.stack
            .iter()
            .any(|open| open.element == Some(ElementType::Process))
    }

    fn add_to_process(&mut self, element: ElementType, attributes: &Attributes) {
        if element == ElementType::TimerEventDefinition {
            self.add_timer(attributes, None);
            return;
        }

        let Some(id) = attributes.id.clone() else {
            log::warn!("Skipped {element} without id");
            return;
        };
        if element != ElementType::SequenceFlow {
            log::trace!("{element}: {id}");
        }

        match element {
            ElementType::Task => {
                let name = attributes.name.clone().unwrap_or_default();
                self.diagram.add_task(Task::new(id, name));
            }
            ElementType::StartEvent
            | ElementType::EndEvent
            | ElementType::IntermediateCatchEvent
            | ElementType::IntermediateThrowEvent => {
                if element == ElementType::StartEvent {
                    self.diagram.add_start_event(id.clone());
                }
                let name = non_empty(&attributes.name).unwrap_or(EVENT_NAME);
                self.diagram.add_task(Task::new(id, name));
            }
            ElementType::ExclusiveGateway => {
                self.diagram.add_exclusive(id.clone());
                self.diagram.add_task(Task::new(id, EXCLUSIVE_GATEWAY_NAME));
            }
            ElementType::ParallelGateway => {
                self.diagram.add_parallel(id.clone());
                self.diagram.add_task(Task::new(id, PARALLEL_GATEWAY_NAME));
            }
            ElementType::SequenceFlow => {
                let flow = SequenceFlow {
                    id,
                    source_ref: attributes.source_ref.clone().unwrap_or_default(),
                    target_ref: attributes.target_ref.clone().unwrap_or_default(),
                    condition_expression: non_empty(&attributes.name).map(Into::into),
                };
                log::trace!("{flow}");
                self.diagram.add_flow(flow);
            }
            ElementType::Definitions
            | ElementType::Process
            | ElementType::TimerEventDefinition => {}
        }
    }

    fn add_timer(&mut self, attributes: &Attributes, event_id: Option<String>) {
        let Some(id) = attributes.id.clone() else {
            log::warn!("Skipped {} without id", ElementType::TimerEventDefinition);
            return;
        };
        let days = attributes.name.as_deref().map(parse_days).unwrap_or_default();
        self.diagram.add_timer(id, days, event_id);
    }
}

impl From<DataBuilder> for Diagram {
    fn from(builder: DataBuilder) -> Self {
        builder.diagram
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

// Zero for anything that is not a whole number of days
fn parse_days(value: &str) -> u32 {
    DAYS.captures(value)
        .and_then(|captures| captures[1].parse().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days() {
        assert_eq!(parse_days("P3D"), 3);
        assert_eq!(parse_days("P10D"), 10);
        assert_eq!(parse_days("PT3H"), 0);
        assert_eq!(parse_days("P1W"), 0);
        assert_eq!(parse_days("3D"), 0);
        assert_eq!(parse_days(""), 0);
    }

    #[test]
    fn element_without_id_is_skipped() {
        let mut builder = DataBuilder::default();
        builder.start(Some(ElementType::Process), Attributes::default());
        builder.start(Some(ElementType::Task), Attributes::default());
        builder.end();
        builder.end();
        let diagram: Diagram = builder.into();
        assert!(diagram.tasks().is_empty());
    }

    #[test]
    fn empty_event_name_defaults() {
        let mut builder = DataBuilder::default();
        builder.start(Some(ElementType::Process), Attributes::default());
        builder.start(
            Some(ElementType::EndEvent),
            Attributes {
                id: Some("End".into()),
                name: Some(String::new()),
                ..Default::default()
            },
        );
        let diagram: Diagram = builder.into();
        assert_eq!(diagram.task("End"), Some(&Task::new("End", "Event")));
    }
}
