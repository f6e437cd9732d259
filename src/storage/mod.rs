//! Storage Module
//!
//! In-memory byte storage built from fixed-size buffers.
//!
//! ## Responsibilities
//! - Own each device's chain of quantum sets
//! - Locate (and grow) storage at an arbitrary byte offset
//! - Release all storage of a device in one pass (trim)
//! - Move bytes in and out, one quantum per call
//!
//! ## Layout
//! ```text
//! DeviceStore
//! ┌──────────────┬──────────────┬──────────────┐
//! │ QuantumSet 0 │ QuantumSet 1 │ QuantumSet 2 │ ...   (sets: Vec, index = set_index)
//! └──────┬───────┴──────────────┴──────────────┘
//!        │
//!        ▼
//! ┌─────────┬─────────┬─────────┬─────────┐
//! │ slot 0  │ slot 1  │  empty  │ slot 3  │ ...     (quanta_per_set slots)
//! └────┬────┴─────────┴─────────┴─────────┘
//!      ▼
//! [u8; quantum_size]                                (allocated on first write)
//! ```
//!
//! A byte position decomposes into `(set_index, slot_index, slot_offset)`;
//! see [`Location`].

mod device;
mod offset;
mod qset;
mod transfer;

pub use device::DeviceStore;
pub use offset::Location;
pub use qset::QuantumSet;
pub use transfer::{read, write};
