//! # Value Layers
//!
//! Every record owns three value layers, keyed by attribute name:
//!
//! | Layer | Holds | Written by |
//! |-------|-------|------------|
//! | `Local` | Uncommitted edits | `Record::set` |
//! | `InFlight` | Snapshot being saved | `Record::begin_save` |
//! | `Persisted` | Last confirmed values | `Record::setup_data`, `Record::commit` |
//!
//! ## Resolution
//!
//! A read returns the `Local` value if present, else `InFlight`, else
//! `Persisted`, else the attribute's default. Presence is tested per layer
//! with `Option`, so an explicit `null` in a higher layer shadows lower ones.
//!
//! ## Save Cycle
//!
//! ```text
//! set()          Local ──┐
//! begin_save()           └─▶ InFlight ──┐
//! commit()                              └─▶ Persisted
//! save_failed()  Local ◀── InFlight   (newer local edits win)
//! rollback()     Local ✕
//! ```
//!
//! ## Cache
//!
//! Resolved values are cached per record. The cache is torn down by the
//! [`DATA_SIGNAL`] whenever any layer changes outside of a single write.

pub(crate) mod cache;
pub mod layers;

pub use cache::DATA_SIGNAL;
pub use layers::{Layer, Slots, ValueLayers};
