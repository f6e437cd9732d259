//! Offset decomposition
//!
//! Maps a byte position onto the quantum-set layout.

use crate::config::Geometry;

/// Where a byte position lives inside a device's storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Index of the quantum set in the chain
    pub set_index: u64,

    /// Index of the quantum inside that set
    pub slot_index: usize,

    /// Byte offset inside that quantum
    pub slot_offset: usize,
}

impl Location {
    /// Decompose `pos` for the given geometry
    pub fn resolve(pos: u64, geometry: Geometry) -> Self {
        let quantum = geometry.quantum_size() as u64;
        let node_capacity = geometry.node_capacity();

        let set_index = pos / node_capacity;
        let rest = pos % node_capacity;

        // Both values are bounded by quanta_per_set / quantum_size, so they fit
        Self {
            set_index,
            slot_index: (rest / quantum) as usize,
            slot_offset: (rest % quantum) as usize,
        }
    }

    /// Rebuild the byte position this location was resolved from
    pub fn position(&self, geometry: Geometry) -> u64 {
        self.set_index * geometry.node_capacity()
            + self.slot_index as u64 * geometry.quantum_size() as u64
            + self.slot_offset as u64
    }

    /// Bytes left in the addressed quantum from `slot_offset` onward
    pub fn room_in_quantum(&self, geometry: Geometry) -> usize {
        geometry.quantum_size() - self.slot_offset
    }
}

