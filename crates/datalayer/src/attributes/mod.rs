//! # Attribute System
//!
//! Attributes are the named, optionally typed fields of a model class that are
//! backed by a record's three value layers. This module covers everything
//! about them that is known per class rather than per record:
//!
//! - **Declarations**: [`attr`] builds an [`AttributeDecl`] (transform tag + options)
//! - **Metadata**: [`AttributeMeta`], the named form handed out by the registry
//! - **Registry**: ordered [`AttributeMap`] / [`TransformMap`], memoized per class
//!
//! ## Declaring
//!
//! | Declaration | Transform | Default |
//! |-------------|-----------|---------|
//! | `attr()` | pass-through | none (`None` on read) |
//! | `attr().of_type("date")` | `date` | none |
//! | `attr().default_value(false)` | pass-through | literal, cloned per read |
//! | `attr().default_with(\|\| json!([]))` | pass-through | producer, invoked per read |
//!
//! ## Reserved names
//!
//! `id` is record identity. Declaring it as an attribute fails when the
//! registry is built, and writing it through a record fails at write time.

mod decl;
mod registry;
mod spec;

pub use decl::{attr, AttributeDecl, AttributeOptions, DefaultValue, DEFAULT_VALUE_KEY};
pub use registry::{AttributeMap, TransformMap, RESERVED_ID};
pub use spec::AttributeMeta;

pub(crate) use registry::{scan_attributes, transforms_of};
