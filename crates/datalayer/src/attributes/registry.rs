//! Attribute registry construction.
//!
//! The registry of a class is built by walking its declared fields, ancestors
//! first, and keeping only the fields declared with [`attr`](super::attr).
//! [`ModelClass`] memoizes the result; this module only does the scan.

use super::spec::AttributeMeta;
use crate::error::{DataError, Result};
use crate::model::{FieldMeta, ModelClass};
use indexmap::IndexMap;
use tracing::debug;

/// Name reserved for record identity.
pub const RESERVED_ID: &str = "id";

/// Ordered `name -> AttributeMeta`, in declaration order.
pub type AttributeMap = IndexMap<String, AttributeMeta>;

/// Ordered `name -> transform tag`, restricted to transformed attributes.
pub type TransformMap = IndexMap<String, String>;

/// Scan a class and its ancestors into an attribute map.
///
/// A subclass redeclaring an inherited attribute replaces its metadata but
/// keeps the inherited position. Redeclaring it as a plain field hides it.
pub(crate) fn scan_attributes(class: &ModelClass) -> Result<AttributeMap> {
    let mut lineage = vec![class];
    let mut ancestor = class.parent();
    while let Some(parent) = ancestor {
        lineage.push(parent);
        ancestor = parent.parent();
    }

    let mut attributes = AttributeMap::new();
    for declaring in lineage.into_iter().rev() {
        for field in declaring.fields() {
            match &field.meta {
                FieldMeta::Attribute(decl) => {
                    if field.name == RESERVED_ID {
                        return Err(DataError::ReservedName {
                            model: declaring.name().to_string(),
                            name: field.name.clone(),
                        });
                    }
                    let meta = AttributeMeta::from_decl(&field.name, decl, declaring.name());
                    attributes.insert(field.name.clone(), meta);
                }
                FieldMeta::Opaque(_) => {
                    attributes.shift_remove(&field.name);
                }
            }
        }
    }

    debug!(
        model = class.name(),
        count = attributes.len(),
        "Built attribute registry"
    );
    Ok(attributes)
}

/// Derive the transform view from an attribute map.
pub(crate) fn transforms_of(attributes: &AttributeMap) -> TransformMap {
    attributes
        .values()
        .filter_map(|meta| {
            meta.transform()
                .map(|tag| (meta.name.clone(), tag.to_string()))
        })
        .collect()
}
