//! Seek arithmetic
//!
//! Computes a new handle position. Does not touch storage.

use crate::error::{Result, StoreError};

/// Base a seek offset is applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Whence {
    /// `new = offset`
    FromStart = 0,

    /// `new = current + offset`
    FromCurrent = 1,

    /// `new = logical_size - offset`
    ///
    /// Note the subtraction: a positive offset moves *backwards* from the end,
    /// unlike `std::io::SeekFrom::End`.
    FromEnd = 2,
}

impl TryFrom<i32> for Whence {
    type Error = StoreError;

    fn try_from(code: i32) -> Result<Self> {
        match code {
            0 => Ok(Whence::FromStart),
            1 => Ok(Whence::FromCurrent),
            2 => Ok(Whence::FromEnd),
            other => Err(StoreError::InvalidArgument(format!("unknown whence {}", other))),
        }
    }
}

/// Compute the position a seek lands on
///
/// Fails with `InvalidArgument` when the result is negative or does not fit
/// the position space.
pub fn seek(current: u64, logical_size: u64, offset: i64, whence: Whence) -> Result<u64> {
    let offset = i128::from(offset);
    let new_pos = match whence {
        Whence::FromStart => offset,
        Whence::FromCurrent => i128::from(current) + offset,
        Whence::FromEnd => i128::from(logical_size) - offset,
    };

    if new_pos < 0 {
        return Err(StoreError::InvalidArgument(format!(
            "seek to negative position {}",
            new_pos
        )));
    }
    u64::try_from(new_pos).map_err(|_| {
        StoreError::InvalidArgument(format!("seek position {} out of range", new_pos))
    })
}
