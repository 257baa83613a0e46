//! # Model Classes
//!
//! A [`ModelClass`] is an explicit declaration list: the fields a model type
//! declares, in order, each either an attribute (declared with
//! [`attr`](crate::attributes::attr)) or a plain field carrying opaque
//! metadata. There is no reflection; the declaration list is the class.
//!
//! ## Registries
//!
//! The attribute registry of a class is built on first use and cached for the
//! lifetime of the class:
//!
//! - [`ModelClass::attributes`]: ordered `name -> AttributeMeta`
//! - [`ModelClass::transformed_attributes`]: ordered `name -> transform tag`
//!
//! Classes are shared behind [`Arc`] and are `Send + Sync`, so a registry
//! built once is seen by every record of the class.
//!
//! ## Inheritance
//!
//! [`ModelClassBuilder::extends`] makes the parent's fields part of the scan.
//! Inherited attributes come first, in the parent's order.
//!
//! ## Declaring from JSON
//!
//! ```json
//! {
//!   "name": "person",
//!   "attributes": [
//!     { "name": "firstName", "type": "string" },
//!     { "name": "isAdmin", "type": "boolean", "options": { "defaultValue": false } }
//!   ]
//! }
//! ```

use crate::attributes::{
    scan_attributes, transforms_of, AttributeDecl, AttributeMap, AttributeMeta, AttributeOptions,
    TransformMap,
};
use crate::error::{DataError, Result};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// What a declared field is.
#[derive(Debug, Clone)]
pub enum FieldMeta {
    /// Backed by the record's value layers.
    Attribute(AttributeDecl),

    /// Any other field. The metadata is kept for introspection only.
    Opaque(Value),
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: String,
    pub meta: FieldMeta,
}

impl FieldDecl {
    pub fn is_attribute(&self) -> bool {
        matches!(self.meta, FieldMeta::Attribute(_))
    }
}

#[derive(Debug)]
pub struct ModelClass {
    name: String,
    parent: Option<Arc<ModelClass>>,
    fields: Vec<FieldDecl>,
    attributes: OnceCell<AttributeMap>,
    transformed: OnceCell<TransformMap>,
    scans: AtomicUsize,
}

impl ModelClass {
    pub fn builder(name: impl Into<String>) -> ModelClassBuilder {
        ModelClassBuilder {
            name: name.into(),
            parent: None,
            fields: Vec::new(),
        }
    }

    /// Build a class from its JSON declaration.
    pub fn from_json(json: &str) -> Result<Arc<Self>> {
        ModelDecl::from_json(json)?.into_class(None)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&ModelClass> {
        self.parent.as_deref()
    }

    /// Fields declared directly on this class, excluding inherited ones.
    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    /// The attribute registry, built on first call and cached afterwards.
    ///
    /// Fails with [`DataError::ReservedName`] if `id` is declared as an
    /// attribute anywhere in the lineage. Failures are not cached.
    pub fn attributes(&self) -> Result<&AttributeMap> {
        self.attributes.get_or_try_init(|| {
            self.scans.fetch_add(1, Ordering::Relaxed);
            scan_attributes(self)
        })
    }

    /// Transform tags of the attributes that declare one, in declaration order.
    pub fn transformed_attributes(&self) -> Result<&TransformMap> {
        let attributes = self.attributes()?;
        Ok(self.transformed.get_or_init(|| transforms_of(attributes)))
    }

    pub fn attribute(&self, name: &str) -> Result<Option<&AttributeMeta>> {
        Ok(self.attributes()?.get(name))
    }

    /// Visit every attribute in declaration order.
    pub fn each_attribute<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(&str, &AttributeMeta),
    {
        for (name, meta) in self.attributes()? {
            f(name, meta);
        }
        Ok(())
    }

    /// Visit every transformed attribute in declaration order, with its tag.
    pub fn each_transformed_attribute<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(&str, &str),
    {
        for (name, tag) in self.transformed_attributes()? {
            f(name, tag);
        }
        Ok(())
    }

    /// How many times the registry scan has run for this class.
    pub fn registry_scans(&self) -> usize {
        self.scans.load(Ordering::Relaxed)
    }
}

pub struct ModelClassBuilder {
    name: String,
    parent: Option<Arc<ModelClass>>,
    fields: Vec<FieldDecl>,
}

impl ModelClassBuilder {
    pub fn extends(mut self, parent: Arc<ModelClass>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, decl: AttributeDecl) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            meta: FieldMeta::Attribute(decl),
        });
        self
    }

    /// Declare a non-attribute field with opaque metadata.
    pub fn field(mut self, name: impl Into<String>, meta: impl Into<Value>) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            meta: FieldMeta::Opaque(meta.into()),
        });
        self
    }

    /// Finish the declaration.
    ///
    /// Empty names and fields declared twice on the same class are rejected
    /// here. The `id` rule is checked when the registry is built.
    pub fn build(self) -> Result<Arc<ModelClass>> {
        if self.name.trim().is_empty() {
            return Err(DataError::Configuration(
                "model class name cannot be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(DataError::Configuration(format!(
                    "{} declares a field with an empty name",
                    self.name
                )));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(DataError::Configuration(format!(
                    "{} declares `{}` more than once",
                    self.name, field.name
                )));
            }
        }

        Ok(Arc::new(ModelClass {
            name: self.name,
            parent: self.parent,
            fields: self.fields,
            attributes: OnceCell::new(),
            transformed: OnceCell::new(),
            scans: AtomicUsize::new(0),
        }))
    }
}

/// Serialized declaration of a model class.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelDecl {
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<AttributeDeclSpec>,
}

/// Serialized declaration of one attribute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttributeDeclSpec {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub options: Value,
}

impl ModelDecl {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Turn the declaration into a class, optionally under `parent`.
    pub fn into_class(self, parent: Option<Arc<ModelClass>>) -> Result<Arc<ModelClass>> {
        let mut builder = ModelClass::builder(self.name.clone());
        if let Some(parent) = parent {
            builder = builder.extends(parent);
        }

        for spec in self.attributes {
            let options = match spec.options {
                Value::Null => AttributeOptions::default(),
                Value::Object(bag) => AttributeOptions::from_map(bag),
                other => {
                    return Err(DataError::Configuration(format!(
                        "options of {}.{} must be an object, got {}",
                        self.name, spec.name, other
                    )))
                }
            };
            let decl = AttributeDecl {
                transform: spec.transform,
                options,
            };
            builder = builder.attribute(spec.name, decl);
        }

        builder.build()
    }
}
