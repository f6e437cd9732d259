//! Introspection
//!
//! Read-only, per-device snapshots of storage state.
//!
//! ## Consistency
//! Each device is visited under its own access guard, so a report never sees
//! a chain that is half grown or half trimmed. Only one device lock is held
//! at a time; writers on other devices are never blocked by a visit.
//!
//! ## Known limitation
//! The "last slot" of a report is the last slot of the *leading run* of
//! allocated slots in the tail set. A tail set with holes (e.g. only slot 3
//! written) under-reports or reports nothing.

use std::fmt;
use std::sync::Arc;

use crate::engine::Device;
use crate::error::Result;
use crate::guard::CancelToken;
use crate::storage::DeviceStore;

/// Identifies an allocated quantum inside the tail set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotDescriptor {
    /// Slot index inside the set
    pub index: usize,

    /// Address of the quantum buffer (identity only, never dereferenced)
    pub address: usize,
}

/// Shape of a device's chain at snapshot time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageSummary {
    /// No quantum set allocated
    Empty,

    /// At least one quantum set allocated
    Nodes {
        count: usize,
        last_slot: Option<SlotDescriptor>,
    },
}

/// Snapshot of one device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceReport {
    pub index: usize,
    pub logical_size: u64,
    pub storage: StorageSummary,
}

impl DeviceReport {
    /// Capture a report from a store whose guard is held
    pub fn capture(index: usize, store: &DeviceStore) -> Self {
        Self {
            index,
            logical_size: store.logical_size(),
            storage: store.summary(),
        }
    }
}

impl fmt::Display for DeviceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Device no {}:", self.index)?;
        writeln!(f, "\tTotal sz {}", self.logical_size)?;
        match self.storage {
            StorageSummary::Empty => writeln!(f, "\tNo nodes found"),
            StorageSummary::Nodes { count, last_slot } => {
                writeln!(f, "\tNumber of nodes : {}", count)?;
                if let Some(slot) = last_slot {
                    writeln!(f, "\tContent of quantum no {}:{:#x}", slot.index, slot.address)?;
                }
                Ok(())
            }
        }
    }
}

/// Iterator visiting every device in index order
///
/// Yields one report per device. An `Interrupted` acquisition is yielded
/// once and ends the iteration.
pub struct IntrospectionView<'a> {
    devices: &'a [Arc<Device>],
    cancel: CancelToken,
    next: usize,
    stopped: bool,
}

impl<'a> IntrospectionView<'a> {
    pub(crate) fn new(devices: &'a [Arc<Device>], cancel: CancelToken) -> Self {
        Self {
            devices,
            cancel,
            next: 0,
            stopped: false,
        }
    }
}

impl Iterator for IntrospectionView<'_> {
    type Item = Result<DeviceReport>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.stopped {
            return None;
        }
        let device = self.devices.get(self.next)?;
        self.next += 1;

        match device.lock(&self.cancel) {
            Ok(store) => Some(Ok(DeviceReport::capture(device.index(), &store))),
            Err(e) => {
                self.stopped = true;
                Some(Err(e))
            }
        }
    }
}
