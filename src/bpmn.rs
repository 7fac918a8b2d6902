use std::fmt::Display;

// Names given to gateways in the task registry.
pub(crate) const EXCLUSIVE_GATEWAY_NAME: &str = "Exclusive Gateway";
pub(crate) const PARALLEL_GATEWAY_NAME: &str = "Parallel Gateway";

// Name given to events without a name attribute.
pub(crate) const EVENT_NAME: &str = "Event";

/// A unit of work in a process. Gateways and events are registered as tasks too
/// so every element can be resolved by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Task {
    pub id: String,
    pub name: String,
}

impl Task {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Directed edge between two process elements.
///
/// The guard is read from the `name` attribute of the `sequenceFlow` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceFlow {
    pub id: String,
    pub source_ref: String,
    pub target_ref: String,
    pub condition_expression: Option<String>,
}

impl Display for SequenceFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} -> {}", self.id, self.source_ref, self.target_ref)?;
        if let Some(condition) = &self.condition_expression {
            write!(f, " [{condition}]")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ElementType {
    Definitions,
    Process,
    Task,
    StartEvent,
    EndEvent,
    IntermediateCatchEvent,
    IntermediateThrowEvent,
    SequenceFlow,
    ExclusiveGateway,
    ParallelGateway,
    TimerEventDefinition,
}

impl ElementType {
    pub(crate) fn is_event(&self) -> bool {
        matches!(
            self,
            ElementType::StartEvent
                | ElementType::EndEvent
                | ElementType::IntermediateCatchEvent
                | ElementType::IntermediateThrowEvent
        )
    }
}

impl TryFrom<&[u8]> for ElementType {
    type Error = String;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Ok(match value {
            b"definitions" => ElementType::Definitions,
            b"process" => ElementType::Process,
            b"task" | b"userTask" | b"serviceTask" | b"scriptTask" | b"manualTask"
            | b"sendTask" | b"receiveTask" | b"businessRuleTask" | b"callActivity" => {
                ElementType::Task
            }
            b"startEvent" => ElementType::StartEvent,
            b"endEvent" => ElementType::EndEvent,
            b"intermediateCatchEvent" => ElementType::IntermediateCatchEvent,
            b"intermediateThrowEvent" => ElementType::IntermediateThrowEvent,
            b"sequenceFlow" => ElementType::SequenceFlow,
            b"exclusiveGateway" => ElementType::ExclusiveGateway,
            b"parallelGateway" => ElementType::ParallelGateway,
            b"timerEventDefinition" => ElementType::TimerEventDefinition,
            _ => return Err(String::from_utf8_lossy(value).into()),
        })
    }
}

impl Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_task_variants() {
        for tag in [&b"task"[..], &b"userTask"[..], &b"serviceTask"[..], &b"callActivity"[..]] {
            assert_eq!(ElementType::try_from(tag), Ok(ElementType::Task));
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert_eq!(
            ElementType::try_from(&b"dataObject"[..]),
            Err("dataObject".to_string())
        );
    }

    #[test]
    fn flow_display() {
        let mut flow = SequenceFlow {
            id: "f1".into(),
            source_ref: "X".into(),
            target_ref: "A".into(),
            condition_expression: None,
        };
        assert_eq!(flow.to_string(), "f1: X -> A");
        flow.condition_expression = Some("${amount > 100}".into());
        assert_eq!(flow.to_string(), "f1: X -> A [${amount > 100}]");
    }

    #[test]
    fn events() {
        assert!(ElementType::IntermediateThrowEvent.is_event());
        assert!(!ElementType::ExclusiveGateway.is_event());
    }
}
