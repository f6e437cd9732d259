//! Quantum set
//!
//! One node of a device's storage chain.

use crate::error::Result;

/// A fixed number of lazily allocated quanta
///
/// The slot count is fixed when the set is created. The slot table itself is
/// allocated on the first write into the set, and each slot stays empty
/// until a write first touches it.
#[derive(Debug)]
pub struct QuantumSet {
    quanta_per_set: usize,
    slots: Option<Vec<Option<Box<[u8]>>>>,
}

impl QuantumSet {
    /// Create a set of `quanta_per_set` slots with no slot table yet
    pub fn new(quanta_per_set: usize) -> Self {
        Self {
            quanta_per_set,
            slots: None,
        }
    }

    /// Number of slots in this set
    pub fn len(&self) -> usize {
        self.quanta_per_set
    }

    pub fn is_empty(&self) -> bool {
        self.quanta_per_set == 0
    }

    /// Whether a write has reached this set and allocated its slot table
    pub fn has_slot_table(&self) -> bool {
        self.slots.is_some()
    }

    /// The quantum at `index`, if allocated
    pub fn slot(&self, index: usize) -> Option<&[u8]> {
        self.slots.as_ref()?.get(index)?.as_deref()
    }

    /// The quantum at `index`, allocating a zeroed buffer of `quantum_size` if empty
    ///
    /// Allocates the slot table first if this is the set's first write.
    pub fn slot_or_allocate(&mut self, index: usize, quantum_size: usize) -> Result<&mut [u8]> {
        let quanta_per_set = self.quanta_per_set;
        let table = &mut self.slots;
        let slots = match table {
            Some(slots) => slots,
            None => {
                let mut fresh = Vec::new();
                fresh.try_reserve_exact(quanta_per_set)?;
                fresh.resize_with(quanta_per_set, || None);
                table.insert(fresh)
            }
        };

        let slot = &mut slots[index];
        match slot {
            Some(quantum) => Ok(&mut quantum[..]),
            None => {
                let mut buf = Vec::new();
                buf.try_reserve_exact(quantum_size)?;
                buf.resize(quantum_size, 0u8);
                Ok(&mut slot.insert(buf.into_boxed_slice())[..])
            }
        }
    }

    /// Count of allocated slots
    pub fn allocated(&self) -> usize {
        self.slots
            .iter()
            .flatten()
            .filter(|slot| slot.is_some())
            .count()
    }

    /// Last slot of the leading run of allocated slots
    ///
    /// Scanning stops at the first empty slot, so a set with holes reports
    /// the slot before the first hole rather than the highest allocated one.
    pub fn last_leading_slot(&self) -> Option<(usize, &[u8])> {
        self.slots
            .as_ref()?
            .iter()
            .map_while(|slot| slot.as_deref())
            .enumerate()
            .last()
    }
}
