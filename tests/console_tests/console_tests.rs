//! Console Tests
//!
//! Tests verify:
//! - Command parsing (valid and invalid lines)
//! - Execution against an engine, end to end

use std::sync::Arc;

use quantastore::config::Config;
use quantastore::console::{Console, ConsoleCommand, OpenMode};
use quantastore::engine::Engine;
use quantastore::{StoreError, Whence};

fn console() -> Console {
    let config = Config::builder()
        .device_count(2)
        .quantum_size(4)
        .quanta_per_set(2)
        .build();
    Console::new(Arc::new(Engine::new(config).unwrap()))
}

// =============================================================================
// Parse Tests
// =============================================================================

#[test]
fn test_parse_open() {
    assert_eq!(
        ConsoleCommand::parse("open 1 w").unwrap(),
        ConsoleCommand::Open { device: 1, mode: OpenMode::Write }
    );
    assert_eq!(
        ConsoleCommand::parse("open 0").unwrap(),
        ConsoleCommand::Open { device: 0, mode: OpenMode::ReadWrite }
    );
    assert_eq!(
        ConsoleCommand::parse("  open 0 a ").unwrap(),
        ConsoleCommand::Open { device: 0, mode: OpenMode::Append }
    );
}

#[test]
fn test_parse_write_keeps_inner_spaces() {
    assert_eq!(
        ConsoleCommand::parse("write hello  big world").unwrap(),
        ConsoleCommand::Write { data: b"hello  big world".to_vec() }
    );
}

#[test]
fn test_parse_seek() {
    assert_eq!(
        ConsoleCommand::parse("seek -3 end").unwrap(),
        ConsoleCommand::Seek { offset: -3, whence: Whence::FromEnd }
    );
    assert_eq!(
        ConsoleCommand::parse("seek 5").unwrap(),
        ConsoleCommand::Seek { offset: 5, whence: Whence::FromStart }
    );
    assert_eq!(
        ConsoleCommand::parse("seek 2 cur").unwrap(),
        ConsoleCommand::Seek { offset: 2, whence: Whence::FromCurrent }
    );
}

#[test]
fn test_parse_simple_commands() {
    assert_eq!(ConsoleCommand::parse("read 10").unwrap(), ConsoleCommand::Read { count: 10 });
    assert_eq!(ConsoleCommand::parse("close").unwrap(), ConsoleCommand::Close);
    assert_eq!(ConsoleCommand::parse("stat").unwrap(), ConsoleCommand::Stat);
    assert_eq!(ConsoleCommand::parse("help").unwrap(), ConsoleCommand::Help);
}

#[test]
fn test_parse_errors() {
    for line in ["", "frobnicate", "open", "open x", "open 0 z", "read", "read -1", "seek 1 sideways"] {
        assert!(
            matches!(ConsoleCommand::parse(line), Err(StoreError::Command(_))),
            "line {:?} should not parse",
            line
        );
    }
}

// =============================================================================
// Execute Tests
// =============================================================================

#[test]
fn test_blank_and_comment_lines() {
    let mut console = console();
    assert_eq!(console.run_line("   ").unwrap(), None);
    assert_eq!(console.run_line("# a comment").unwrap(), None);
}

#[test]
fn test_io_requires_open_device() {
    let mut console = console();
    assert!(matches!(console.run_line("read 4"), Err(StoreError::Command(_))));
    assert_eq!(console.run_line("close").unwrap().unwrap(), "no device open");
}

#[test]
fn test_session_write_seek_read() {
    let mut console = console();

    console.run_line("open 0 rw").unwrap();
    assert_eq!(
        console.run_line("write hello").unwrap().unwrap(),
        "wrote 5 bytes, position 5"
    );
    assert_eq!(console.run_line("seek 0").unwrap().unwrap(), "position 0");
    assert_eq!(console.run_line("read 10").unwrap().unwrap(), "4 bytes: \"hell\"");
    assert_eq!(console.run_line("read 10").unwrap().unwrap(), "1 bytes: \"o\"");
    assert_eq!(console.run_line("read 10").unwrap().unwrap(), "0 bytes: \"\"");
    assert_eq!(console.run_line("seek 2 end").unwrap().unwrap(), "position 3");
    assert_eq!(console.run_line("close").unwrap().unwrap(), "device 0 closed");
}

#[test]
fn test_session_truncating_open_and_stat() {
    let mut console = console();

    console.run_line("open 1 w").unwrap();
    console.run_line("write abcdefghi").unwrap();
    let stat = console.run_line("stat").unwrap().unwrap();
    assert!(stat.starts_with("Device no 0:\n\tTotal sz 0\n\tNo nodes found\n"));
    assert!(stat.contains("Device no 1:\n\tTotal sz 9\n\tNumber of nodes : 2\n"));

    console.run_line("open 1 w").unwrap();
    let stat = console.run_line("stat").unwrap().unwrap();
    assert!(stat.ends_with("Device no 1:\n\tTotal sz 0\n\tNo nodes found\n"));
}

#[test]
fn test_session_append_open_keeps_content() {
    let mut console = console();

    console.run_line("open 1 w").unwrap();
    console.run_line("write abc").unwrap();

    console.run_line("open 1 a").unwrap();
    assert_eq!(
        console.run_line("write de").unwrap().unwrap(),
        "wrote 2 bytes, position 5"
    );
    let stat = console.run_line("stat").unwrap().unwrap();
    assert!(stat.contains("Device no 1:\n\tTotal sz 5\n"));

    console.run_line("open 1 rw").unwrap();
    assert_eq!(console.run_line("read 4").unwrap().unwrap(), "4 bytes: \"abcd\"");
    assert_eq!(console.run_line("read 4").unwrap().unwrap(), "1 bytes: \"e\"");
}

#[test]
fn test_session_errors_are_reported() {
    let mut console = console();
    assert!(matches!(
        console.run_line("open 7"),
        Err(StoreError::DeviceNotFound { index: 7, count: 2 })
    ));

    console.run_line("open 0 r").unwrap();
    assert!(matches!(console.run_line("write x"), Err(StoreError::AccessDenied(_))));
    assert!(matches!(console.run_line("seek -1"), Err(StoreError::InvalidArgument(_))));
}
