//! # Datalayer Architecture
//!
//! Datalayer is the attribute-resolution engine of a client-side object data
//! layer. It answers two questions: *which fields of a model are attributes*,
//! and *what is the value of an attribute right now*.
//!
//! ## The Two Components
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Attribute Registry (attributes/, model.rs)                 │
//! │  - Explicit per-class declaration list                      │
//! │  - Ordered name -> AttributeMeta, built once per class      │
//! │  - Derived name -> transform tag view                       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │  type / default lookups
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Value Resolution Engine (record.rs, store/)                │
//! │  - Three layers per record: local, in-flight, persisted     │
//! │  - Reads resolve top-down, then fall back to the default    │
//! │  - Writes notify the lifecycle, then land in local          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │  did_set_property
//!                              ▼
//!                 Lifecycle state machine (external)
//! ```
//!
//! ## What Lives Elsewhere
//!
//! - **Lifecycle**: dirty/saving/saved tracking. Records only report writes
//!   through [`lifecycle::RecordLifecycle`].
//! - **Transforms**: records expose each attribute's transform tag
//!   ([`model::ModelClass::transformed_attributes`]) and never run one.
//! - **I/O**: nothing here touches the network or produces wire formats.
//!
//! ## Execution Model
//!
//! Single-threaded and synchronous. A [`Record`] caches resolved values in a
//! `RefCell` and is not `Sync`; a [`ModelClass`] is `Send + Sync` and is
//! shared between records behind an `Arc`.
//!
//! ## Module Overview
//!
//! - [`attributes`]: declarations, metadata, registry types
//! - [`model`]: model classes and their memoized registries
//! - [`record`]: per-record reads, writes and layer moves
//! - [`store`]: the three value layers
//! - [`lifecycle`]: the notification boundary
//! - [`config`]: record configuration
//! - [`error`]: error types

pub mod attributes;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod record;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures;

pub use attributes::{attr, AttributeDecl, AttributeMeta, DefaultValue};
pub use config::RecordConfig;
pub use error::{DataError, Result};
pub use lifecycle::{AttributeChange, NoopLifecycle, RecordLifecycle};
pub use model::{ModelClass, ModelDecl};
pub use record::Record;
pub use serde_json::Value;
pub use store::{Layer, ValueLayers};
