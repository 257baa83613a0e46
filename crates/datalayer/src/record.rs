//! # Records: Layered Value Resolution
//!
//! A [`Record`] is one instance of a [`ModelClass`]. It owns its three value
//! layers outright and resolves every attribute read across them.
//!
//! ## Reads
//!
//! [`Record::get`] returns the first value found in `local`, `in_flight`,
//! `persisted`, in that order. When no layer holds the name, the attribute's
//! default is computed: producers are invoked on every such read, literals are
//! cloned, and an attribute with no default reads as `None`. Reads never fail.
//!
//! ## Writes
//!
//! [`Record::set`] runs a fixed sequence:
//!
//! 1. Reject `id` (record identity lives in [`Record::id`], not in attributes).
//! 2. Capture `old_value` through the read path.
//! 3. Capture `original_value` from the persisted layer alone.
//! 4. Notify the lifecycle with both, synchronously.
//! 5. Store the new value in the local layer, even if it equals `old_value`.
//!
//! ## Layer Moves
//!
//! The lifecycle state machine decides *when* a save starts, lands or fails;
//! the record provides *how* the layers move:
//!
//! | Method | Effect |
//! |--------|--------|
//! | [`Record::setup_data`] | Replace `persisted` wholesale |
//! | [`Record::begin_save`] | `local` → `in_flight` |
//! | [`Record::commit`] | `in_flight` → `persisted`, then apply server payload |
//! | [`Record::save_failed`] | `in_flight` → `local` (newer edits win) |
//! | [`Record::rollback`] | Drop all `local` edits |
//!
//! Each of them fires the `"data"` signal, which tears down the resolved-value
//! cache.

use crate::attributes::{AttributeMeta, RESERVED_ID};
use crate::config::RecordConfig;
use crate::error::{DataError, Result};
use crate::lifecycle::{AttributeChange, RecordLifecycle};
use crate::model::ModelClass;
use crate::store::cache::ResolvedCache;
use crate::store::{Layer, ValueLayers, DATA_SIGNAL};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, trace};

/// A local edit: the persisted value it overrides and the edited value.
pub type ChangedAttributes = IndexMap<String, (Option<Value>, Value)>;

pub struct Record<L: RecordLifecycle> {
    class: Arc<ModelClass>,
    id: Option<String>,
    layers: ValueLayers,
    cache: ResolvedCache,
    lifecycle: L,
    config: RecordConfig,
}

impl<L: RecordLifecycle> Record<L> {
    /// Create a record with empty layers.
    ///
    /// Builds the class registry if needed, so a class declaring `id` as an
    /// attribute fails here with [`DataError::ReservedName`].
    pub fn new(class: Arc<ModelClass>, lifecycle: L) -> Result<Self> {
        Self::with_config(class, lifecycle, RecordConfig::default())
    }

    pub fn with_config(class: Arc<ModelClass>, lifecycle: L, config: RecordConfig) -> Result<Self> {
        class.attributes()?;
        Ok(Self {
            class,
            id: None,
            layers: ValueLayers::new(),
            cache: ResolvedCache::new(config.cache_resolved),
            lifecycle,
            config,
        })
    }

    pub fn class(&self) -> &ModelClass {
        &self.class
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    pub fn layers(&self) -> &ValueLayers {
        &self.layers
    }

    pub fn lifecycle(&self) -> &L {
        &self.lifecycle
    }

    pub fn lifecycle_mut(&mut self) -> &mut L {
        &mut self.lifecycle
    }

    pub fn config(&self) -> &RecordConfig {
        &self.config
    }

    /// Metadata of a declared attribute.
    pub fn attribute(&self, name: &str) -> Option<&AttributeMeta> {
        // The registry was built in `with_config`, so this cannot fail here.
        self.class
            .attributes()
            .ok()
            .and_then(|attributes| attributes.get(name))
    }

    /// Visit the class's attributes in declaration order.
    pub fn each_attribute<F>(&self, f: F) -> Result<()>
    where
        F: FnMut(&str, &AttributeMeta),
    {
        self.class.each_attribute(f)
    }

    /// The effective value of `name`.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.cache.get(name) {
            return Some(value);
        }

        match self.layers.resolve(name) {
            Some((layer, value)) => {
                trace!(attribute = name, ?layer, "Resolved from layer");
                let value = value.clone();
                self.cache.store(name, value.clone());
                Some(value)
            }
            None => {
                trace!(attribute = name, "Resolved from default");
                self.attribute(name).and_then(AttributeMeta::compute_default)
            }
        }
    }

    /// Write `value` into the local layer and return it.
    ///
    /// The lifecycle is notified before the value is stored.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<Value> {
        let new_value = value.into();

        if name == RESERVED_ID {
            return Err(DataError::ReservedName {
                model: self.class.name().to_string(),
                name: name.to_string(),
            });
        }
        if self.config.strict_attributes && self.attribute(name).is_none() {
            return Err(DataError::UnknownAttribute {
                model: self.class.name().to_string(),
                name: name.to_string(),
            });
        }

        let change = AttributeChange {
            name: name.to_string(),
            old_value: self.get(name),
            original_value: self.layers.persisted(name).cloned(),
            new_value,
        };
        debug!(
            model = self.class.name(),
            attribute = name,
            "Notifying did_set_property"
        );
        self.lifecycle.did_set_property(&change, &self.layers);

        self.layers.insert(Layer::Local, name, change.new_value.clone());
        self.cache.store(name, change.new_value.clone());
        Ok(change.new_value)
    }

    /// Notify the record that `key` changed outside of [`Record::set`].
    ///
    /// `"data"` tears down every cached value; any other key only its own.
    pub fn property_did_change(&self, key: &str) {
        if key == DATA_SIGNAL {
            self.cache.invalidate_all();
        } else {
            self.cache.invalidate(key);
        }
    }

    /// Replace the persisted layer wholesale, e.g. after a fetch.
    pub fn setup_data(&mut self, data: Map<String, Value>) {
        debug!(
            model = self.class.name(),
            count = data.len(),
            "Replacing persisted data"
        );
        self.layers.replace_persisted(data);
        self.property_did_change(DATA_SIGNAL);
    }

    /// Move every local edit in flight, as a save begins.
    pub fn begin_save(&mut self) -> usize {
        let moved = self.layers.move_local_to_in_flight();
        debug!(model = self.class.name(), moved, "Local edits moved in flight");
        self.property_did_change(DATA_SIGNAL);
        moved
    }

    /// Settle a successful save.
    ///
    /// In-flight values become persisted, then `update` (the values the
    /// persistence boundary reported back) is applied over them. Local edits
    /// made during the save stay local.
    pub fn commit(&mut self, update: Option<Map<String, Value>>) -> usize {
        let merged = self.layers.merge_in_flight_into_persisted();
        if let Some(update) = update {
            for (name, value) in update {
                self.layers.insert(Layer::Persisted, &name, value);
            }
        }
        debug!(model = self.class.name(), merged, "Committed in-flight values");
        self.property_did_change(DATA_SIGNAL);
        merged
    }

    /// Return in-flight values to the local layer after a failed save.
    pub fn save_failed(&mut self) -> usize {
        let restored = self.layers.restore_in_flight_to_local();
        debug!(model = self.class.name(), restored, "Save failed, edits restored");
        self.property_did_change(DATA_SIGNAL);
        restored
    }

    /// Drop every local edit.
    pub fn rollback(&mut self) -> usize {
        let dropped = self.layers.clear(Layer::Local);
        debug!(model = self.class.name(), dropped, "Rolled back local edits");
        self.property_did_change(DATA_SIGNAL);
        dropped
    }

    /// Drop the local edit of one attribute, returning it.
    pub fn rollback_attribute(&mut self, name: &str) -> Option<Value> {
        let dropped = self.layers.remove(Layer::Local, name);
        self.property_did_change(name);
        dropped
    }

    /// Mutate the layers directly, then fire the `"data"` signal.
    ///
    /// For lifecycle collaborators whose transitions are not covered by the
    /// methods above.
    pub fn update_layers<F, T>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut ValueLayers) -> T,
    {
        let result = f(&mut self.layers);
        self.property_did_change(DATA_SIGNAL);
        result
    }

    /// Local edits, each paired with the persisted value it overrides.
    pub fn changed_attributes(&self) -> ChangedAttributes {
        self.layers
            .names(Layer::Local)
            .filter_map(|name| {
                let edited = self.layers.local(name)?.clone();
                let original = self.layers.persisted(name).cloned();
                Some((name.to_string(), (original, edited)))
            })
            .collect()
    }

    pub fn has_local_changes(&self) -> bool {
        !self.layers.is_empty(Layer::Local)
    }
}

impl<L: RecordLifecycle> std::fmt::Debug for Record<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Record")
            .field("class", &self.class.name())
            .field("id", &self.id)
            .field("layers", &self.layers)
            .finish()
    }
}
