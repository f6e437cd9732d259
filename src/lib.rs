//! # QuantaStore
//!
//! An in-memory, dynamically growing byte store exposed as a set of
//! seekable devices:
//! - Storage built from fixed-size quanta grouped into quantum sets
//! - Lazy allocation on write, wholesale release on trim
//! - One cancellable access guard per device
//! - Consistent read-only introspection across all devices
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Console / DeviceHandle                       │
//! │              (position, open mode, cancel)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Engine                                 │
//! │                (device table, open/trim)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  one AccessGuard per device
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌───────────────┐
//!   │ read/write  │          │ Introspection │
//!   │   + seek    │          │    (view)     │
//!   └──────┬──────┘          └───────┬───────┘
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────────────────────────────────┐
//!   │   DeviceStore → QuantumSet → quanta     │
//!   └─────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod storage;
pub mod seek;
pub mod guard;
pub mod handle;
pub mod introspect;
pub mod engine;
pub mod console;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StoreError, Result};
pub use config::{Config, Geometry};
pub use engine::{Device, Engine};
pub use guard::CancelToken;
pub use handle::{DeviceHandle, OpenOptions};
pub use seek::Whence;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of QuantaStore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
