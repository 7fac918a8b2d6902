pub(crate) mod reader;

use crate::{
    api::DelayKey,
    bpmn::{SequenceFlow, Task},
    error::Error,
};
use reader::read_bpmn;
use std::{
    collections::{HashMap, HashSet},
    path::Path,
    str::FromStr,
};

/// Indexed content of the processes in a BPMN document.
#[derive(Debug, Default, Clone)]
pub struct Diagram {
    tasks: HashMap<String, Task>,
    // Outgoing flows in document order
    flows: HashMap<String, Vec<SequenceFlow>>,
    exclusive_gateways: HashSet<String>,
    parallel_gateways: HashSet<String>,
    // Keyed by the timerEventDefinition id, not by the event containing it
    timer_delays: HashMap<String, u32>,
    // Event id to the id of the timerEventDefinition it contains
    event_timers: HashMap<String, String>,
    start_events: Vec<String>,
}

impl Diagram {
    /// Read a diagram from a BPMN file path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        read_bpmn(quick_xml::Reader::from_file(path)?)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn tasks(&self) -> &HashMap<String, Task> {
        &self.tasks
    }

    /// Outgoing sequence flows of an element in document order.
    pub fn outgoing(&self, source_id: &str) -> &[SequenceFlow] {
        self.flows.get(source_id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn flows(&self) -> &HashMap<String, Vec<SequenceFlow>> {
        &self.flows
    }

    pub fn is_exclusive(&self, id: &str) -> bool {
        self.exclusive_gateways.contains(id)
    }

    pub fn is_parallel(&self, id: &str) -> bool {
        self.parallel_gateways.contains(id)
    }

    pub fn exclusive_gateways(&self) -> &HashSet<String> {
        &self.exclusive_gateways
    }

    pub fn parallel_gateways(&self) -> &HashSet<String> {
        &self.parallel_gateways
    }

    /// Delays in days keyed by `timerEventDefinition` id.
    pub fn timer_delays(&self) -> &HashMap<String, u32> {
        &self.timer_delays
    }

    /// Id of the timer definition contained in an event.
    pub fn event_timer(&self, event_id: &str) -> Option<&str> {
        self.event_timers.get(event_id).map(String::as_str)
    }

    /// Delay in days for a task id. Zero when nothing is found.
    pub fn delay(&self, task_id: &str, key: DelayKey) -> u32 {
        let timer_id = match key {
            DelayKey::TimerDefinition => Some(task_id),
            DelayKey::EnclosingEvent => self.event_timer(task_id),
        };
        timer_id
            .and_then(|id| self.timer_delays.get(id))
            .copied()
            .unwrap_or_default()
    }

    /// Start event ids in document order.
    pub fn start_events(&self) -> &[String] {
        &self.start_events
    }

    pub(crate) fn add_task(&mut self, task: Task) {
        self.tasks.insert(task.id.clone(), task);
    }

    pub(crate) fn add_flow(&mut self, flow: SequenceFlow) {
        self.flows
            .entry(flow.source_ref.clone())
            .or_default()
            .push(flow);
    }

    pub(crate) fn add_exclusive(&mut self, id: impl Into<String>) {
        self.exclusive_gateways.insert(id.into());
    }

    pub(crate) fn add_parallel(&mut self, id: impl Into<String>) {
        self.parallel_gateways.insert(id.into());
    }

    pub(crate) fn add_start_event(&mut self, id: impl Into<String>) {
        self.start_events.push(id.into());
    }

    pub(crate) fn add_timer(&mut self, timer_id: String, days: u32, event_id: Option<String>) {
        if let Some(event_id) = event_id {
            self.event_timers.insert(event_id, timer_id.clone());
        }
        self.timer_delays.insert(timer_id, days);
    }
}

impl FromStr for Diagram {
    type Err = Error;

    /// Read a diagram from BPMN text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        read_bpmn(quick_xml::Reader::from_str(s))
    }
}

/// Parse BPMN text into its task registry, flow map, gateway sets, timer delays and start events.
pub fn parse_process(bpmn: &str) -> Result<Diagram, Error> {
    bpmn.parse()
}
