//! Device handles
//!
//! A handle is an open device plus a position, the way a file descriptor is
//! an open file plus an offset.

use std::sync::Arc;

use crate::engine::Device;
use crate::error::{Result, StoreError};
use crate::guard::CancelToken;
use crate::seek::{self, Whence};
use crate::storage;

/// How a device is opened
#[derive(Debug, Clone, Default)]
pub struct OpenOptions {
    read: bool,
    write: bool,
    truncate: bool,
    append: bool,
    cancel: CancelToken,
}

impl OpenOptions {
    /// No access; enable what you need with the setters
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access only
    pub fn read_only() -> Self {
        Self::new().read(true)
    }

    /// Write access only; truncates the device on open
    pub fn write_only() -> Self {
        Self::new().write(true).truncate(true)
    }

    /// Read and write access, keeping existing content
    pub fn read_write() -> Self {
        Self::new().read(true).write(true)
    }

    pub fn read(mut self, read: bool) -> Self {
        self.read = read;
        self
    }

    pub fn write(mut self, write: bool) -> Self {
        self.write = write;
        self
    }

    /// Trim the device on open (only with write access)
    pub fn truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }

    /// Position every write at the current logical size
    pub fn append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    /// Token observed by every lock acquisition made through the handle
    pub fn cancel(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    pub(crate) fn truncates(&self) -> bool {
        self.write && self.truncate
    }

    pub(crate) fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }
}

/// An open device with its own position
pub struct DeviceHandle {
    device: Arc<Device>,
    options: OpenOptions,
    position: u64,
}

impl DeviceHandle {
    pub(crate) fn new(device: Arc<Device>, options: OpenOptions) -> Self {
        Self {
            device,
            options,
            position: 0,
        }
    }

    /// Read up to one quantum into `buf`, advancing the position
    ///
    /// Returns 0 at end of data and over never-written regions.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if !self.options.read {
            return Err(StoreError::AccessDenied("handle not open for reading"));
        }
        let store = self.device.lock(&self.options.cancel)?;
        let n = storage::read(&store, self.position, buf);
        self.position += n as u64;
        Ok(n)
    }

    /// Write up to one quantum of `data`, advancing the position
    ///
    /// Returns how many bytes were accepted; loop (or use
    /// [`write_all`](Self::write_all)) to commit the rest.
    pub fn write(&mut self, data: &[u8]) -> Result<usize> {
        if !self.options.write {
            return Err(StoreError::AccessDenied("handle not open for writing"));
        }
        let mut store = self.device.lock(&self.options.cancel)?;
        if self.options.append {
            self.position = store.logical_size();
        }
        let n = storage::write(&mut store, self.position, data)?;
        self.position += n as u64;
        Ok(n)
    }

    /// Write every byte of `data`, one quantum per call
    ///
    /// Stops at the first error; bytes committed before it stay committed.
    pub fn write_all(&mut self, mut data: &[u8]) -> Result<()> {
        while !data.is_empty() {
            let n = self.write(data)?;
            data = &data[n..];
        }
        Ok(())
    }

    /// Read until a zero-length result
    ///
    /// Stops early at the first never-written quantum.
    pub fn read_to_end(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut chunk = vec![0u8; self.device.lock(&self.options.cancel)?.geometry().quantum_size()];
        loop {
            let n = self.read(&mut chunk)?;
            if n == 0 {
                return Ok(out);
            }
            out.extend_from_slice(&chunk[..n]);
        }
    }

    /// Move the position; see [`Whence`] for the end-relative convention
    pub fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        let logical_size = match whence {
            Whence::FromEnd => self.device.lock(&self.options.cancel)?.logical_size(),
            Whence::FromStart | Whence::FromCurrent => 0,
        };
        self.position = seek::seek(self.position, logical_size, offset, whence)?;
        Ok(self.position)
    }

    /// Current position
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Index of the device this handle is bound to
    pub fn device_index(&self) -> usize {
        self.device.index()
    }

    /// Replace the token observed by this handle's lock acquisitions
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.options.cancel = token;
        self
    }
}
