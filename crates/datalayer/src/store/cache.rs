use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use tracing::trace;

/// Signal fired when the persisted layer is replaced wholesale.
pub const DATA_SIGNAL: &str = "data";

/// Resolved-value cache of one record.
///
/// Only values that came out of a layer are cached; defaults are computed on
/// every read. The `dirty` flag is raised by the `"data"` signal and the next
/// access drops every entry before doing anything else.
#[derive(Debug)]
pub(crate) struct ResolvedCache {
    enabled: bool,
    dirty: Cell<bool>,
    entries: RefCell<HashMap<String, Value>>,
}

impl ResolvedCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            dirty: Cell::new(false),
            entries: RefCell::new(HashMap::new()),
        }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        if !self.enabled {
            return None;
        }
        self.sweep();
        let hit = self.entries.borrow().get(name).cloned();
        if hit.is_some() {
            trace!(attribute = name, "Resolved value cache hit");
        }
        hit
    }

    pub fn store(&self, name: &str, value: Value) {
        if !self.enabled {
            return;
        }
        self.sweep();
        self.entries.borrow_mut().insert(name.to_string(), value);
    }

    /// Drop the entry of one attribute.
    pub fn invalidate(&self, name: &str) {
        self.entries.borrow_mut().remove(name);
    }

    /// Mark every entry stale.
    pub fn invalidate_all(&self) {
        self.dirty.set(true);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.sweep();
        self.entries.borrow().len()
    }

    fn sweep(&self) {
        if self.dirty.replace(false) {
            self.entries.borrow_mut().clear();
        }
    }
}
