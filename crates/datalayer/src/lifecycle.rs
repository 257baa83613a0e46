//! # Lifecycle Boundary
//!
//! Records do not track whether they are dirty, saving or saved. That belongs
//! to a lifecycle state machine living outside this crate, which the record
//! tells about every attribute write through [`RecordLifecycle`].
//!
//! ## Ordering
//!
//! [`RecordLifecycle::did_set_property`] runs synchronously inside
//! `Record::set`, **before** the new value reaches the local layer. The
//! layers passed alongside the change still show the pre-write state, so the
//! state machine can compare `old_value` and `original_value` against what it
//! sees and decide whether the record enters or leaves a dirty state.
//!
//! Every write notifies, including writes of a value equal to the current one.

use crate::store::ValueLayers;
use serde_json::Value;

/// Description of one attribute write, sent before the write lands.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeChange {
    pub name: String,

    /// What a read returned just before the write (layers, then default).
    pub old_value: Option<Value>,

    /// The persisted value only, ignoring local and in-flight overrides.
    pub original_value: Option<Value>,

    pub new_value: Value,
}

impl AttributeChange {
    /// The write leaves the effective value unchanged.
    pub fn is_noop(&self) -> bool {
        self.old_value.as_ref() == Some(&self.new_value)
    }

    /// The write brings the attribute back to its persisted value.
    pub fn restores_original(&self) -> bool {
        self.original_value.as_ref() == Some(&self.new_value)
    }
}

/// The state machine a record reports attribute writes to.
pub trait RecordLifecycle {
    /// Called once per write, before `change.new_value` is stored.
    fn did_set_property(&mut self, change: &AttributeChange, layers: &ValueLayers);
}

/// Lifecycle that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLifecycle;

impl RecordLifecycle for NoopLifecycle {
    fn did_set_property(&mut self, _change: &AttributeChange, _layers: &ValueLayers) {}
}

impl<F> RecordLifecycle for F
where
    F: FnMut(&AttributeChange, &ValueLayers),
{
    fn did_set_property(&mut self, change: &AttributeChange, layers: &ValueLayers) {
        self(change, layers)
    }
}
