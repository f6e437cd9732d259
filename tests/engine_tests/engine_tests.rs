//! Tests for Engine
//!
//! These tests verify:
//! - Config validation at startup
//! - Device resolution
//! - Truncate-on-open semantics
//! - Shutdown releases storage
//! - Devices are independent

use std::thread;

use quantastore::config::Config;
use quantastore::engine::Engine;
use quantastore::{CancelToken, OpenOptions, StoreError};

// =============================================================================
// Helper Functions
// =============================================================================

fn small_engine() -> Engine {
    let config = Config::builder()
        .device_count(3)
        .quantum_size(4)
        .quanta_per_set(2)
        .build();
    Engine::new(config).unwrap()
}

// =============================================================================
// Startup Tests
// =============================================================================

#[test]
fn test_default_engine() {
    let engine = Engine::new(Config::default()).unwrap();
    assert_eq!(engine.device_count(), 4);
    assert_eq!(engine.config().quantum_size, 4000);
    assert_eq!(engine.config().quanta_per_set, 1000);
}

#[test]
fn test_zero_quantum_is_fatal() {
    let config = Config::builder().quantum_size(0).build();
    assert!(matches!(Engine::new(config), Err(StoreError::Config(_))));
}

#[test]
fn test_zero_qset_is_fatal() {
    let config = Config::builder().quanta_per_set(0).build();
    assert!(matches!(Engine::new(config), Err(StoreError::Config(_))));
}

#[test]
fn test_zero_devices_is_fatal() {
    let config = Config::builder().device_count(0).build();
    assert!(matches!(Engine::new(config), Err(StoreError::Config(_))));
}

#[test]
fn test_overflowing_node_capacity_is_fatal() {
    let config = Config::builder()
        .quantum_size(usize::MAX)
        .quanta_per_set(2)
        .build();
    assert!(matches!(Engine::new(config), Err(StoreError::Config(_))));
}

// =============================================================================
// Device Resolution Tests
// =============================================================================

#[test]
fn test_device_lookup() {
    let engine = small_engine();
    assert_eq!(engine.device(2).unwrap().index(), 2);
    assert_eq!(
        engine.device(3).unwrap_err(),
        StoreError::DeviceNotFound { index: 3, count: 3 }
    );
}

#[test]
fn test_open_unknown_device() {
    let engine = small_engine();
    assert!(matches!(
        engine.open(9, OpenOptions::read_only()),
        Err(StoreError::DeviceNotFound { .. })
    ));
}

// =============================================================================
// Truncate-on-open Tests
// =============================================================================

#[test]
fn test_write_only_open_truncates() {
    let engine = small_engine();

    let mut handle = engine.open(0, OpenOptions::write_only()).unwrap();
    handle.write_all(b"hello world").unwrap();
    drop(handle);

    let _handle = engine.open(0, OpenOptions::write_only()).unwrap();

    let store = engine.device(0).unwrap().lock(&CancelToken::new()).unwrap();
    assert_eq!(store.logical_size(), 0);
    assert!(store.is_empty());
}

#[test]
fn test_read_write_open_keeps_content() {
    let engine = small_engine();

    let mut writer = engine.open(1, OpenOptions::write_only()).unwrap();
    writer.write_all(b"keep me").unwrap();

    let mut handle = engine.open(1, OpenOptions::read_write()).unwrap();
    assert_eq!(handle.read_to_end().unwrap(), b"keep me".to_vec());
}

#[test]
fn test_read_only_open_keeps_content() {
    let engine = small_engine();

    let mut writer = engine.open(1, OpenOptions::write_only()).unwrap();
    writer.write_all(b"data").unwrap();

    let _reader = engine.open(1, OpenOptions::read_only().truncate(true)).unwrap();
    let store = engine.device(1).unwrap().lock(&CancelToken::new()).unwrap();
    assert_eq!(store.logical_size(), 4);
}

#[test]
fn test_truncate_is_interruptible() {
    let engine = small_engine();
    let device = engine.device(0).unwrap();

    let cancel = CancelToken::new();
    cancel.cancel();

    let _held = device.lock(&CancelToken::new()).unwrap();
    let result = engine.open(0, OpenOptions::write_only().cancel(cancel));
    assert!(matches!(result, Err(StoreError::Interrupted)));
}

// =============================================================================
// Shutdown Tests
// =============================================================================

#[test]
fn test_shutdown_trims_devices() {
    let engine = small_engine();
    let device = std::sync::Arc::clone(engine.device(0).unwrap());

    let mut handle = engine.open(0, OpenOptions::write_only()).unwrap();
    handle.write_all(b"some bytes across quanta").unwrap();
    drop(handle);

    engine.shutdown();

    let store = device.lock(&CancelToken::new()).unwrap();
    assert!(store.is_empty());
    assert_eq!(store.logical_size(), 0);
}

#[test]
fn test_shutdown_waits_for_holder() {
    use std::sync::Arc;
    use std::time::Duration;

    let engine = small_engine();
    let device = Arc::clone(engine.device(1).unwrap());

    let mut handle = engine.open(1, OpenOptions::write_only()).unwrap();
    handle.write_all(b"pending").unwrap();
    drop(handle);

    let held = device.lock(&CancelToken::new()).unwrap();
    crossbeam::scope(|s| {
        s.spawn(|_| engine.shutdown());
        thread::sleep(Duration::from_millis(20));
        assert_eq!(held.logical_size(), 7);
        drop(held);
    })
    .unwrap();

    let store = device.lock(&CancelToken::new()).unwrap();
    assert!(store.is_empty());
    assert_eq!(store.logical_size(), 0);
}

// =============================================================================
// Independence Tests
// =============================================================================

#[test]
fn test_devices_are_independent() {
    let engine = small_engine();

    let mut a = engine.open(0, OpenOptions::write_only()).unwrap();
    let mut b = engine.open(1, OpenOptions::write_only()).unwrap();
    a.write_all(b"device zero").unwrap();
    b.write_all(b"one").unwrap();

    let mut a = engine.open(0, OpenOptions::read_only()).unwrap();
    let mut b = engine.open(1, OpenOptions::read_only()).unwrap();
    assert_eq!(a.read_to_end().unwrap(), b"device zero".to_vec());
    assert_eq!(b.read_to_end().unwrap(), b"one".to_vec());
}

#[test]
fn test_parallel_writers_on_different_devices() {
    use std::sync::Arc;

    let engine = Arc::new(small_engine());

    let mut handles = vec![];
    for device in 0..3usize {
        let engine = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            let mut handle = engine.open(device, OpenOptions::write_only()).unwrap();
            let payload = vec![device as u8 + b'a'; 64];
            handle.write_all(&payload).unwrap();
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    for device in 0..3usize {
        let mut handle = engine.open(device, OpenOptions::read_only()).unwrap();
        assert_eq!(handle.read_to_end().unwrap(), vec![device as u8 + b'a'; 64]);
    }
}
