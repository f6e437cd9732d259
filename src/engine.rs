//! Engine Module
//!
//! The device table that ties configuration, storage, guards and handles
//! together.
//!
//! ## Responsibilities
//! - Create every device at startup from the validated config
//! - Resolve device indices and bind handles to devices
//! - Truncate a device when it is opened for writing with truncation
//! - Produce introspection snapshots of all devices
//! - Release all storage on shutdown

use std::fmt::Write as _;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::guard::{AccessGuard, CancelToken, GuardStats, Guarded};
use crate::handle::{DeviceHandle, OpenOptions};
use crate::introspect::IntrospectionView;
use crate::storage::DeviceStore;

/// One device: its index and its guarded store
#[derive(Debug)]
pub struct Device {
    index: usize,
    store: AccessGuard<DeviceStore>,
}

impl Device {
    /// Device index within the engine
    pub fn index(&self) -> usize {
        self.index
    }

    /// Acquire this device's access guard
    pub fn lock(&self, cancel: &CancelToken) -> Result<Guarded<'_, DeviceStore>> {
        self.store.lock(cancel)
    }

    /// Release all storage of this device under its guard
    pub fn trim(&self, cancel: &CancelToken) -> Result<()> {
        let mut store = self.lock(cancel)?;
        let released = store.trim();
        tracing::debug!("Device {} trimmed, {} quantum sets released", self.index, released);
        Ok(())
    }

    /// Counters of this device's access guard
    pub fn guard_stats(&self) -> GuardStats {
        self.store.stats()
    }
}

/// The device table
///
/// ## Concurrency Model: one lock per device
///
/// - Every structural operation on a device holds that device's guard for
///   its whole duration; reads and writes on the same device never interleave
/// - Devices share nothing; operations on different devices run in parallel
/// - No operation ever holds two device guards at once
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Devices, indexed by device number
    devices: Vec<Arc<Device>>,
}

impl Engine {
    /// Build the device table
    ///
    /// A config error here is fatal: no device is created.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let geometry = config.geometry()?;

        let devices = (0..config.device_count)
            .map(|index| {
                Arc::new(Device {
                    index,
                    store: AccessGuard::new(DeviceStore::new(geometry), config.cancel_poll_interval),
                })
            })
            .collect();

        tracing::info!(
            "Engine initialized: {} devices, quantum {} bytes, {} quanta per set",
            config.device_count,
            geometry.quantum_size(),
            geometry.quanta_per_set()
        );

        Ok(Self { config, devices })
    }

    /// Resolve a device index
    pub fn device(&self, index: usize) -> Result<&Arc<Device>> {
        self.devices.get(index).ok_or(StoreError::DeviceNotFound {
            index,
            count: self.devices.len(),
        })
    }

    /// Bind a handle to device `index`
    ///
    /// Opening for writing with `truncate` trims the device first, under the
    /// device guard, observing the options' cancel token.
    pub fn open(&self, index: usize, options: OpenOptions) -> Result<DeviceHandle> {
        let device = Arc::clone(self.device(index)?);

        if options.truncates() {
            tracing::debug!("Open of device {} for writing truncates it", index);
            device.trim(options.cancel_token())?;
        }

        Ok(DeviceHandle::new(device, options))
    }

    /// Visit every device, one guard at a time
    pub fn introspect(&self, cancel: CancelToken) -> IntrospectionView<'_> {
        IntrospectionView::new(&self.devices, cancel)
    }

    /// Render the introspection reports of all devices as text
    pub fn report(&self, cancel: CancelToken) -> Result<String> {
        let mut out = String::new();
        for report in self.introspect(cancel) {
            // Writing into a String cannot fail
            let _ = write!(out, "{}", report?);
        }
        Ok(out)
    }

    /// Release all storage of every device
    ///
    /// Waits for in-flight operations on each device; not cancellable.
    pub fn shutdown(self) {
        let mut released = 0;
        for device in &self.devices {
            released += device.store.lock_blocking().trim();
        }
        tracing::info!(
            "Engine shut down: {} devices trimmed, {} quantum sets released",
            self.devices.len(),
            released
        );
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Number of devices
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
