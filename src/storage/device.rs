//! Device store
//!
//! Owns one device's quantum-set chain, geometry and logical size.

use crate::config::Geometry;
use crate::error::{Result, StoreError};
use crate::introspect::{SlotDescriptor, StorageSummary};

use super::{Location, QuantumSet};

/// Storage state of a single device
///
/// ## Invariants
/// - `logical_size` is the high-water mark of committed writes; only `trim`
///   lowers it (to 0)
/// - Storage past `logical_size`, or holes below it, may be absent; readers
///   treat absence as end of data
/// - Every set in `sets` has `geometry.quanta_per_set()` slots
///
/// Sets are addressed by index instead of a linked `next` pointer; the
/// chain order is the vector order.
#[derive(Debug)]
pub struct DeviceStore {
    /// Geometry restored on every trim
    defaults: Geometry,

    /// Geometry used to lay out the current chain
    geometry: Geometry,

    /// High-water mark of bytes written
    logical_size: u64,

    /// The chain, head first
    sets: Vec<QuantumSet>,
}

impl DeviceStore {
    /// Create an empty device using `defaults`
    pub fn new(defaults: Geometry) -> Self {
        Self {
            defaults,
            geometry: defaults,
            logical_size: 0,
            sets: Vec::new(),
        }
    }

    /// Current geometry
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Current logical size in bytes
    pub fn logical_size(&self) -> u64 {
        self.logical_size
    }

    /// Number of quantum sets in the chain
    pub fn node_count(&self) -> usize {
        self.sets.len()
    }

    /// True when no storage has been allocated
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Walk the chain to `set_index`, allocating every missing set on the way
    ///
    /// On allocation failure the sets created so far are kept.
    pub fn follow(&mut self, set_index: usize) -> Result<&mut QuantumSet> {
        if set_index == usize::MAX {
            return Err(StoreError::OutOfMemory);
        }
        while self.sets.len() <= set_index {
            self.sets.try_reserve(1)?;
            self.sets.push(QuantumSet::new(self.geometry.quanta_per_set()));
        }
        Ok(&mut self.sets[set_index])
    }

    /// Look up an existing set without growing the chain
    pub fn set(&self, set_index: u64) -> Option<&QuantumSet> {
        let index = usize::try_from(set_index).ok()?;
        self.sets.get(index)
    }

    /// The allocated quantum holding `loc`, if any
    pub fn quantum(&self, loc: Location) -> Option<&[u8]> {
        self.set(loc.set_index)?.slot(loc.slot_index)
    }

    /// Raise the logical size to `end` if it is larger
    pub fn extend_to(&mut self, end: u64) {
        if end > self.logical_size {
            self.logical_size = end;
        }
    }

    /// Release every set and quantum, restore default geometry, zero the size
    ///
    /// Returns the number of sets released.
    pub fn trim(&mut self) -> usize {
        let released = self.sets.len();
        self.sets = Vec::new();
        self.geometry = self.defaults;
        self.logical_size = 0;
        released
    }

    /// Point-in-time summary of the chain
    pub fn summary(&self) -> StorageSummary {
        match self.sets.last() {
            None => StorageSummary::Empty,
            Some(tail) => StorageSummary::Nodes {
                count: self.sets.len(),
                last_slot: tail.last_leading_slot().map(|(index, quantum)| SlotDescriptor {
                    index,
                    address: quantum.as_ptr() as usize,
                }),
            },
        }
    }
}
