//! Read/write transfers
//!
//! Moves bytes between caller buffers and a device's quanta. A single call
//! never crosses a quantum boundary; callers loop to move more.
//!
//! Both functions expect the device's access guard to be held.

use crate::error::{Result, StoreError};

use super::{DeviceStore, Location};

/// Write up to one quantum of `data` at `pos`
///
/// Grows the chain and allocates the target quantum on demand, then raises
/// the logical size to the end of the copied run. Returns the number of bytes
/// accepted, which may be less than `data.len()`.
pub fn write(store: &mut DeviceStore, pos: u64, data: &[u8]) -> Result<usize> {
    let geometry = store.geometry();
    let loc = Location::resolve(pos, geometry);
    let len = data.len().min(loc.room_in_quantum(geometry));

    let end = pos.checked_add(len as u64).ok_or_else(|| {
        StoreError::InvalidArgument(format!("write of {} bytes at {} overflows", len, pos))
    })?;
    let set_index = usize::try_from(loc.set_index).map_err(|_| StoreError::OutOfMemory)?;

    let quantum = store
        .follow(set_index)?
        .slot_or_allocate(loc.slot_index, geometry.quantum_size())?;
    quantum[loc.slot_offset..loc.slot_offset + len].copy_from_slice(&data[..len]);

    store.extend_to(end);
    Ok(len)
}

/// Read up to one quantum into `buf` from `pos`
///
/// Returns 0 at or past the logical size, and also when the addressed
/// quantum was never allocated. Never allocates and never changes the
/// logical size.
pub fn read(store: &DeviceStore, pos: u64, buf: &mut [u8]) -> usize {
    let size = store.logical_size();
    if pos >= size {
        return 0;
    }
    // Bounded by buf.len(), so it fits in usize
    let capped = (buf.len() as u64).min(size - pos) as usize;

    let geometry = store.geometry();
    let loc = Location::resolve(pos, geometry);
    let Some(quantum) = store.quantum(loc) else {
        return 0;
    };

    let len = capped.min(loc.room_in_quantum(geometry));
    buf[..len].copy_from_slice(&quantum[loc.slot_offset..loc.slot_offset + len]);
    len
}
