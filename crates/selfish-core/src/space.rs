//! Observed composition.
//!
//! `ObjectSpace` runs the core operations (`extend`, construction, instance
//! merge) under a [`SpaceConfig`] and records a structured event for each
//! call. The core operations on `Prototype` and `Instance` stay usable on
//! their own; this is the layer a host uses when it wants an audit trail or
//! a lineage depth limit.

use serde::{Deserialize, Serialize};

use crate::attribute::AttributeSource;
use crate::config::SpaceConfig;
use crate::error::ObjectError;
use crate::instance::Instance;
use crate::prototype::Prototype;
use crate::value::{ObjectId, Value};

const COMPONENT: &str = "object_space";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionEventType {
    Extend,
    Construct,
    Merge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionOutcome {
    Created,
    Merged,
    Rejected,
    Failed,
}

/// Structured composition event with stable observability keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionEvent {
    pub trace_id: String,
    pub sequence: u64,
    pub component: String,
    pub event: CompositionEventType,
    pub outcome: CompositionOutcome,
    pub error_code: Option<String>,
    pub object_id: Option<ObjectId>,
    pub parent_id: Option<ObjectId>,
    pub source_count: usize,
    pub attribute_count: usize,
}

impl CompositionEvent {
    fn base(
        trace_id: &str,
        sequence: u64,
        event: CompositionEventType,
        outcome: CompositionOutcome,
    ) -> Self {
        Self {
            trace_id: trace_id.to_string(),
            sequence,
            component: COMPONENT.to_string(),
            event,
            outcome,
            error_code: None,
            object_id: None,
            parent_id: None,
            source_count: 0,
            attribute_count: 0,
        }
    }
}

#[derive(Debug, Default)]
pub struct ObjectSpace {
    config: SpaceConfig,
    events: Vec<CompositionEvent>,
    next_sequence: u64,
}

impl ObjectSpace {
    pub fn new(config: SpaceConfig) -> Result<Self, ObjectError> {
        config.validate()?;
        Ok(Self {
            config,
            events: Vec::new(),
            next_sequence: 0,
        })
    }

    pub fn config(&self) -> &SpaceConfig {
        &self.config
    }

    /// [`Prototype::extend`], refusing lineages deeper than the configured
    /// maximum.
    pub fn extend(
        &mut self,
        parent: &Prototype,
        sources: &[&dyn AttributeSource],
    ) -> Result<Prototype, ObjectError> {
        let depth = parent.depth() + 1;
        if depth > self.config.max_lineage_depth {
            let err = ObjectError::LineageTooDeep {
                depth,
                max: self.config.max_lineage_depth,
            };
            let mut event = self.event(CompositionEventType::Extend, CompositionOutcome::Rejected);
            event.parent_id = Some(parent.id());
            event.source_count = sources.len();
            event.error_code = Some(err.code().to_string());
            self.record(event);
            return Err(err);
        }

        let prototype = parent.extend(sources);
        let mut event = self.event(CompositionEventType::Extend, CompositionOutcome::Created);
        event.object_id = Some(prototype.id());
        event.parent_id = Some(parent.id());
        event.source_count = sources.len();
        event.attribute_count = prototype.own_attributes().len();
        self.record(event);
        Ok(prototype)
    }

    /// [`Prototype::construct`]; initializer failures are recorded and then
    /// returned unchanged.
    pub fn construct(
        &mut self,
        prototype: &Prototype,
        args: &[Value],
    ) -> Result<Instance, ObjectError> {
        match prototype.construct(args) {
            Ok(instance) => {
                let mut event =
                    self.event(CompositionEventType::Construct, CompositionOutcome::Created);
                event.object_id = Some(instance.id());
                event.parent_id = Some(prototype.id());
                event.attribute_count = instance.own_attributes().len();
                self.record(event);
                Ok(instance)
            }
            Err(err) => {
                let mut event =
                    self.event(CompositionEventType::Construct, CompositionOutcome::Failed);
                event.parent_id = Some(prototype.id());
                event.error_code = Some(err.code().to_string());
                self.record(event);
                Err(err)
            }
        }
    }

    /// [`Instance::merge`] with an event for the outcome.
    pub fn merge_into(
        &mut self,
        instance: &mut Instance,
        sources: &[&dyn AttributeSource],
    ) -> Result<(), ObjectError> {
        let result = instance.merge(sources).map(|_| ());
        let outcome = if result.is_ok() {
            CompositionOutcome::Merged
        } else {
            CompositionOutcome::Rejected
        };
        let mut event = self.event(CompositionEventType::Merge, outcome);
        event.object_id = Some(instance.id());
        event.parent_id = Some(instance.prototype().id());
        event.source_count = sources.len();
        event.attribute_count = instance.own_attributes().len();
        event.error_code = result.as_ref().err().map(|e| e.code().to_string());
        self.record(event);
        result
    }

    pub fn events(&self) -> &[CompositionEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<CompositionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Buffered events as JSON lines.
    pub fn events_as_json_lines(&self) -> Result<String, ObjectError> {
        let mut out = String::new();
        for event in &self.events {
            let line =
                serde_json::to_string(event).map_err(|e| ObjectError::Message(e.to_string()))?;
            out.push_str(&line);
            out.push('\n');
        }
        Ok(out)
    }

    fn event(
        &mut self,
        event: CompositionEventType,
        outcome: CompositionOutcome,
    ) -> CompositionEvent {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        CompositionEvent::base(&self.config.trace_id, sequence, event, outcome)
    }

    fn record(&mut self, event: CompositionEvent) {
        if self.config.record_events {
            self.events.push(event);
        }
    }
}
