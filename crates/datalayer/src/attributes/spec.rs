//! Attribute metadata.
//!
//! An [`AttributeMeta`] is what the registry hands out for each attribute of a
//! model class: the declaration from [`attr`](super::attr) plus the name and the
//! declaring class, which only the registry attaches.

use super::decl::{AttributeDecl, AttributeOptions, DefaultValue};
use serde_json::Value;

/// Metadata for a single attribute of a model class.
#[derive(Debug, Clone)]
pub struct AttributeMeta {
    /// Field identifier, unique within the class's attribute set.
    pub name: String,

    /// Transform type tag. `None` or an empty tag means pass-through.
    pub transform: Option<String>,

    pub options: AttributeOptions,

    /// Name of the class that declared the attribute.
    ///
    /// Diagnostic only. Inherited attributes keep their ancestor's name here.
    pub parent_type: String,
}

impl AttributeMeta {
    pub(crate) fn from_decl(name: &str, decl: &AttributeDecl, parent_type: &str) -> Self {
        Self {
            name: name.to_string(),
            transform: decl.transform.clone(),
            options: decl.options.clone(),
            parent_type: parent_type.to_string(),
        }
    }

    /// The transform tag, if the attribute declares a non-empty one.
    pub fn transform(&self) -> Option<&str> {
        self.transform.as_deref().filter(|tag| !tag.is_empty())
    }

    pub fn is_transformed(&self) -> bool {
        self.transform().is_some()
    }

    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.options.default_value.as_ref()
    }

    /// Compute the default for one read. `None` when no default is declared.
    pub fn compute_default(&self) -> Option<Value> {
        self.default_value().map(DefaultValue::compute)
    }
}
