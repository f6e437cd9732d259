//! QuantumSet tests

use quantastore::storage::QuantumSet;

#[test]
fn test_new_set_has_empty_slots() {
    let set = QuantumSet::new(5);
    assert_eq!(set.len(), 5);
    assert_eq!(set.allocated(), 0);
    assert!(set.slot(0).is_none());
    assert!(set.slot(4).is_none());
}

#[test]
fn test_slot_out_of_range_is_none() {
    let set = QuantumSet::new(2);
    assert!(set.slot(2).is_none());
}

#[test]
fn test_slot_or_allocate_zero_fills_once() {
    let mut set = QuantumSet::new(3);

    let quantum = set.slot_or_allocate(1, 8).unwrap();
    assert_eq!(quantum, &[0u8; 8]);
    quantum[0] = 42;

    // Second call returns the same buffer
    let again = set.slot_or_allocate(1, 8).unwrap();
    assert_eq!(again[0], 42);
    assert_eq!(set.allocated(), 1);
}

#[test]
fn test_last_leading_slot_stops_at_first_hole() {
    let mut set = QuantumSet::new(4);
    assert!(set.last_leading_slot().is_none());

    set.slot_or_allocate(0, 2).unwrap();
    set.slot_or_allocate(1, 2).unwrap();
    set.slot_or_allocate(3, 2).unwrap();

    let (index, _) = set.last_leading_slot().unwrap();
    assert_eq!(index, 1);
}

#[test]
fn test_last_leading_slot_none_when_first_slot_empty() {
    let mut set = QuantumSet::new(4);
    set.slot_or_allocate(2, 2).unwrap();
    assert!(set.last_leading_slot().is_none());
}

#[test]
fn test_slot_table_allocated_on_first_write() {
    let mut set = QuantumSet::new(4);
    assert!(!set.has_slot_table());
    assert_eq!(set.allocated(), 0);

    set.slot_or_allocate(2, 2).unwrap();
    assert!(set.has_slot_table());
    assert_eq!(set.len(), 4);
    assert_eq!(set.allocated(), 1);
}
