//! Attribute declarations.
//!
//! [`attr`] is the declaration function model classes use to mark a field as an
//! attribute. It produces an [`AttributeDecl`], the bindable field descriptor
//! that the registry later turns into [`AttributeMeta`](super::AttributeMeta).

use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Key of the only option the engine interprets.
pub const DEFAULT_VALUE_KEY: &str = "defaultValue";

/// Default used when no value layer holds an attribute.
#[derive(Clone)]
pub enum DefaultValue {
    /// A literal, cloned on every defaulted read.
    Literal(Value),

    /// A zero-argument producer, invoked on every defaulted read.
    ///
    /// Producers returning fresh containers therefore hand out a new value
    /// each time; nothing is memoized.
    Producer(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl DefaultValue {
    /// Compute the default for one read.
    pub fn compute(&self) -> Value {
        match self {
            DefaultValue::Literal(value) => value.clone(),
            DefaultValue::Producer(produce) => produce(),
        }
    }

    pub fn is_producer(&self) -> bool {
        matches!(self, DefaultValue::Producer(_))
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            DefaultValue::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

/// The options bag attached to an attribute.
///
/// `defaultValue` is lifted into [`DefaultValue`]; every other key is kept
/// verbatim for collaborators (serializers, transforms) that understand it.
#[derive(Debug, Clone, Default)]
pub struct AttributeOptions {
    pub default_value: Option<DefaultValue>,
    pub extra: Map<String, Value>,
}

impl AttributeOptions {
    /// Build options from a raw bag, lifting `defaultValue` out as a literal.
    pub fn from_map(mut bag: Map<String, Value>) -> Self {
        let default_value = bag.remove(DEFAULT_VALUE_KEY).map(DefaultValue::Literal);
        Self {
            default_value,
            extra: bag,
        }
    }

    /// Look up an opaque option by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// Declaration of an attribute field, before the registry names it.
#[derive(Debug, Clone, Default)]
pub struct AttributeDecl {
    pub transform: Option<String>,
    pub options: AttributeOptions,
}

impl AttributeDecl {
    /// Name the transform applied at serialization boundaries.
    pub fn of_type(mut self, transform: impl Into<String>) -> Self {
        self.transform = Some(transform.into());
        self
    }

    /// Default to a literal value.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.options.default_value = Some(DefaultValue::Literal(value.into()));
        self
    }

    /// Default to whatever `produce` returns at read time.
    pub fn default_with<F>(mut self, produce: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.options.default_value = Some(DefaultValue::Producer(Arc::new(produce)));
        self
    }

    /// Attach an opaque option.
    ///
    /// `defaultValue` is routed to [`AttributeDecl::default_value`] so the two
    /// spellings cannot disagree.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if key == DEFAULT_VALUE_KEY {
            return self.default_value(value);
        }
        self.options.extra.insert(key, value.into());
        self
    }
}

/// Declare an attribute with no transform and no options.
///
/// ```ignore
/// let class = ModelClass::builder("person")
///     .attribute("name", attr().of_type("string"))
///     .attribute("tags", attr().default_with(|| json!([])))
///     .build()?;
/// ```
pub fn attr() -> AttributeDecl {
    AttributeDecl::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn literal_default_is_cloned() {
        let default = DefaultValue::Literal(json!({"a": 1}));
        assert_eq!(default.compute(), json!({"a": 1}));
        assert_eq!(default.compute(), json!({"a": 1}));
        assert!(!default.is_producer());
    }

    #[test]
    fn producer_runs_on_every_compute() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let decl = attr().default_with(move || json!(counter.fetch_add(1, Ordering::SeqCst)));
        let default = decl.options.default_value.unwrap();

        assert_eq!(default.compute(), json!(0));
        assert_eq!(default.compute(), json!(1));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn default_value_option_key_is_lifted() {
        let decl = attr().option("defaultValue", "x").option("precision", 2);
        assert!(matches!(
            decl.options.default_value,
            Some(DefaultValue::Literal(Value::String(ref s))) if s == "x"
        ));
        assert_eq!(decl.options.get("precision"), Some(&json!(2)));
        assert!(decl.options.get("defaultValue").is_none());
    }

    #[test]
    fn from_map_keeps_unknown_keys() {
        let bag = json!({"defaultValue": false, "readOnly": true});
        let Value::Object(bag) = bag else {
            unreachable!()
        };
        let options = AttributeOptions::from_map(bag);
        assert_eq!(options.default_value.as_ref().unwrap().compute(), json!(false));
        assert_eq!(options.get("readOnly"), Some(&json!(true)));
    }

    #[test]
    fn debug_hides_producer_body() {
        let decl = attr().default_with(|| Value::Null);
        let rendered = format!("{:?}", decl);
        assert!(rendered.contains("Producer(..)"));
    }
}
