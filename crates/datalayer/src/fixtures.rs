//! Test fixtures: a sample class and a lifecycle stub that records what it saw.

use crate::attributes::attr;
use crate::lifecycle::{AttributeChange, RecordLifecycle};
use crate::model::ModelClass;
use crate::store::ValueLayers;
use serde_json::Value;
use std::sync::Arc;

/// A notification as the lifecycle received it.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservedChange {
    pub change: AttributeChange,
    /// The local layer's value for the attribute at notification time.
    pub local_at_notify: Option<Value>,
}

/// Lifecycle stub that keeps every notification.
#[derive(Debug, Default)]
pub struct RecordingLifecycle {
    pub events: Vec<ObservedChange>,
}

impl RecordingLifecycle {
    pub fn names(&self) -> Vec<&str> {
        self.events
            .iter()
            .map(|event| event.change.name.as_str())
            .collect()
    }
}

impl RecordLifecycle for RecordingLifecycle {
    fn did_set_property(&mut self, change: &AttributeChange, layers: &ValueLayers) {
        self.events.push(ObservedChange {
            change: change.clone(),
            local_at_notify: layers.local(&change.name).cloned(),
        });
    }
}

/// `person`: two strings, a date and a boolean defaulting to `false`.
pub fn person_class() -> Arc<ModelClass> {
    ModelClass::builder("person")
        .attribute("first_name", attr().of_type("string"))
        .attribute("last_name", attr().of_type("string"))
        .attribute("born", attr().of_type("date"))
        .attribute("is_admin", attr().of_type("boolean").default_value(false))
        .build()
        .expect("person fixture is a valid declaration")
}
