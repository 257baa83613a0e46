use indexmap::IndexMap;
use serde_json::{Map, Value};

/// One of the three value layers, listed in read precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Uncommitted local edits.
    Local,
    /// Values being persisted by an in-progress save.
    InFlight,
    /// Last confirmed values.
    Persisted,
}

impl Layer {
    /// Layers in the order reads consult them.
    pub const PRECEDENCE: [Layer; 3] = [Layer::Local, Layer::InFlight, Layer::Persisted];
}

/// The three optional slots a field can hold.
///
/// Presence is `Some`, whatever the value. An explicit `Value::Null` in a slot
/// shadows the layers below it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slots {
    pub persisted: Option<Value>,
    pub in_flight: Option<Value>,
    pub local: Option<Value>,
}

impl Slots {
    pub fn get(&self, layer: Layer) -> Option<&Value> {
        self.slot(layer).as_ref()
    }

    /// The value of the highest-precedence present slot.
    pub fn resolve(&self) -> Option<(Layer, &Value)> {
        Layer::PRECEDENCE
            .into_iter()
            .find_map(|layer| self.get(layer).map(|value| (layer, value)))
    }

    pub fn is_empty(&self) -> bool {
        self.persisted.is_none() && self.in_flight.is_none() && self.local.is_none()
    }

    fn slot(&self, layer: Layer) -> &Option<Value> {
        match layer {
            Layer::Local => &self.local,
            Layer::InFlight => &self.in_flight,
            Layer::Persisted => &self.persisted,
        }
    }

    fn slot_mut(&mut self, layer: Layer) -> &mut Option<Value> {
        match layer {
            Layer::Local => &mut self.local,
            Layer::InFlight => &mut self.in_flight,
            Layer::Persisted => &mut self.persisted,
        }
    }
}

/// Per-record value storage, keyed by attribute name.
///
/// Every layer starts empty. Field entries are created on first insert and
/// dropped once all three slots are empty again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueLayers {
    fields: IndexMap<String, Slots>,
}

impl ValueLayers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self, name: &str) -> Option<&Slots> {
        self.fields.get(name)
    }

    pub fn get(&self, layer: Layer, name: &str) -> Option<&Value> {
        self.fields.get(name).and_then(|slots| slots.get(layer))
    }

    pub fn contains(&self, layer: Layer, name: &str) -> bool {
        self.get(layer, name).is_some()
    }

    pub fn local(&self, name: &str) -> Option<&Value> {
        self.get(Layer::Local, name)
    }

    pub fn in_flight(&self, name: &str) -> Option<&Value> {
        self.get(Layer::InFlight, name)
    }

    pub fn persisted(&self, name: &str) -> Option<&Value> {
        self.get(Layer::Persisted, name)
    }

    /// Resolve `name` across the layers. `None` when no layer holds it.
    pub fn resolve(&self, name: &str) -> Option<(Layer, &Value)> {
        self.fields.get(name).and_then(Slots::resolve)
    }

    /// Names present in `layer`, in first-insertion order.
    pub fn names(&self, layer: Layer) -> impl Iterator<Item = &str> + '_ {
        self.fields
            .iter()
            .filter(move |(_, slots)| slots.get(layer).is_some())
            .map(|(name, _)| name.as_str())
    }

    pub fn len(&self, layer: Layer) -> usize {
        self.names(layer).count()
    }

    pub fn is_empty(&self, layer: Layer) -> bool {
        self.names(layer).next().is_none()
    }

    /// Put a value into one layer, returning what it replaced.
    pub fn insert(&mut self, layer: Layer, name: &str, value: Value) -> Option<Value> {
        let slots = self.fields.entry(name.to_string()).or_default();
        slots.slot_mut(layer).replace(value)
    }

    /// Take a value out of one layer.
    pub fn remove(&mut self, layer: Layer, name: &str) -> Option<Value> {
        let slots = self.fields.get_mut(name)?;
        let removed = slots.slot_mut(layer).take();
        if slots.is_empty() {
            self.fields.shift_remove(name);
        }
        removed
    }

    /// Empty one layer, returning how many values it held.
    pub fn clear(&mut self, layer: Layer) -> usize {
        let mut cleared = 0;
        for slots in self.fields.values_mut() {
            if slots.slot_mut(layer).take().is_some() {
                cleared += 1;
            }
        }
        self.prune();
        cleared
    }

    /// Replace the persisted layer wholesale.
    pub fn replace_persisted(&mut self, data: Map<String, Value>) {
        for slots in self.fields.values_mut() {
            slots.persisted = None;
        }
        for (name, value) in data {
            self.fields.entry(name).or_default().persisted = Some(value);
        }
        self.prune();
    }

    /// Move every local value into the in-flight layer.
    ///
    /// Local edits of a field overwrite whatever was in flight for it.
    pub fn move_local_to_in_flight(&mut self) -> usize {
        let mut moved = 0;
        for slots in self.fields.values_mut() {
            if let Some(value) = slots.local.take() {
                slots.in_flight = Some(value);
                moved += 1;
            }
        }
        moved
    }

    /// Fold the in-flight layer into the persisted layer.
    pub fn merge_in_flight_into_persisted(&mut self) -> usize {
        let mut merged = 0;
        for slots in self.fields.values_mut() {
            if let Some(value) = slots.in_flight.take() {
                slots.persisted = Some(value);
                merged += 1;
            }
        }
        merged
    }

    /// Return in-flight values to the local layer after a failed save.
    ///
    /// Local edits made while the save was pending win over the in-flight value.
    pub fn restore_in_flight_to_local(&mut self) -> usize {
        let mut restored = 0;
        for slots in self.fields.values_mut() {
            if let Some(value) = slots.in_flight.take() {
                if slots.local.is_none() {
                    slots.local = Some(value);
                    restored += 1;
                }
            }
        }
        restored
    }

    fn prune(&mut self) {
        self.fields.retain(|_, slots| !slots.is_empty());
    }
}
