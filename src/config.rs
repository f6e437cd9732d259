//! Configuration for QuantaStore
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use crate::error::{Result, StoreError};

/// Default number of devices
pub const DEFAULT_DEVICE_COUNT: usize = 4;

/// Default quantum size (bytes per quantum)
pub const DEFAULT_QUANTUM_SIZE: usize = 4000;

/// Default number of quanta per quantum set
pub const DEFAULT_QUANTA_PER_SET: usize = 1000;

/// Shape of a device's storage: quantum size and quanta per set.
///
/// Both values are positive once constructed through [`Geometry::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    quantum_size: usize,
    quanta_per_set: usize,
}

impl Geometry {
    /// Validate and build a geometry
    pub fn new(quantum_size: usize, quanta_per_set: usize) -> Result<Self> {
        if quantum_size == 0 {
            return Err(StoreError::Config("quantum size must be positive".into()));
        }
        if quanta_per_set == 0 {
            return Err(StoreError::Config("quanta per set must be positive".into()));
        }
        let geometry = Self {
            quantum_size,
            quanta_per_set,
        };
        if geometry.checked_node_capacity().is_none() {
            return Err(StoreError::Config(format!(
                "node capacity {} x {} overflows the position space",
                quantum_size, quanta_per_set
            )));
        }
        Ok(geometry)
    }

    /// Bytes per quantum
    pub fn quantum_size(&self) -> usize {
        self.quantum_size
    }

    /// Quanta held by one quantum set
    pub fn quanta_per_set(&self) -> usize {
        self.quanta_per_set
    }

    /// Bytes addressable through one quantum set
    pub fn node_capacity(&self) -> u64 {
        // Checked in `new`
        self.quantum_size as u64 * self.quanta_per_set as u64
    }

    fn checked_node_capacity(&self) -> Option<u64> {
        let quantum = u64::try_from(self.quantum_size).ok()?;
        let per_set = u64::try_from(self.quanta_per_set).ok()?;
        quantum.checked_mul(per_set)
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            quantum_size: DEFAULT_QUANTUM_SIZE,
            quanta_per_set: DEFAULT_QUANTA_PER_SET,
        }
    }
}

/// Main configuration for a QuantaStore instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Device Configuration
    // -------------------------------------------------------------------------
    /// Number of devices created at startup
    pub device_count: usize,

    /// Default quantum size applied to new and trimmed devices
    pub quantum_size: usize,

    /// Default quanta per set applied to new and trimmed devices
    pub quanta_per_set: usize,

    // -------------------------------------------------------------------------
    // Access Configuration
    // -------------------------------------------------------------------------
    /// How long a blocked lock attempt waits before re-checking cancellation
    pub cancel_poll_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device_count: DEFAULT_DEVICE_COUNT,
            quantum_size: DEFAULT_QUANTUM_SIZE,
            quanta_per_set: DEFAULT_QUANTA_PER_SET,
            cancel_poll_interval: Duration::from_millis(10),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check every value; a failure here is fatal at startup
    pub fn validate(&self) -> Result<()> {
        if self.device_count == 0 {
            return Err(StoreError::Config("device count must be positive".into()));
        }
        if self.cancel_poll_interval.is_zero() {
            return Err(StoreError::Config(
                "cancel poll interval must be positive".into(),
            ));
        }
        self.geometry().map(|_| ())
    }

    /// The default geometry described by this config
    pub fn geometry(&self) -> Result<Geometry> {
        Geometry::new(self.quantum_size, self.quanta_per_set)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the number of devices
    pub fn device_count(mut self, count: usize) -> Self {
        self.config.device_count = count;
        self
    }

    /// Set the default quantum size (in bytes)
    pub fn quantum_size(mut self, size: usize) -> Self {
        self.config.quantum_size = size;
        self
    }

    /// Set the default number of quanta per set
    pub fn quanta_per_set(mut self, count: usize) -> Self {
        self.config.quanta_per_set = count;
        self
    }

    /// Set the cancellation poll interval
    pub fn cancel_poll_interval(mut self, interval: Duration) -> Self {
        self.config.cancel_poll_interval = interval;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
