//! Composite index key layout.
//!
//! ```text
//! [v0][v1]...[vk-1][primary key][len(v0)][len(v1)]...[len(vk-1)][k]
//! ```
//!
//! Values come first so index rows sort by covered-column content. Lengths
//! and the slot count form a fixed-stride trailer of big-endian `u32`s, which
//! keeps the key self-describing without a separator byte that could collide
//! with value content.
//!
//! Decoding trusts keys produced by [`compose`]; the only checks are the ones
//! needed to avoid out-of-bounds reads.

use bytes::Bytes;

use crate::error::{Error, Result};

/// Width of each length and of the trailing count.
pub const TRAILER_INT_SIZE: usize = std::mem::size_of::<u32>();

/// Builds a composite key from the primary key and the ordered slot values.
///
/// # Errors
///
/// Returns [`Error::Overflow`] if a value length or the slot count does not
/// fit in a `u32`.
pub fn compose<V: AsRef<[u8]>>(primary_key: &[u8], values: &[V]) -> Result<Vec<u8>> {
    let value_bytes: usize = values.iter().map(|v| v.as_ref().len()).sum();
    let trailer = (values.len() + 1) * TRAILER_INT_SIZE;
    let mut out = Vec::with_capacity(value_bytes + primary_key.len() + trailer);

    for value in values {
        out.extend_from_slice(value.as_ref());
    }
    out.extend_from_slice(primary_key);
    for value in values {
        out.extend_from_slice(&encode_u32(value.as_ref().len(), "value length")?);
    }
    out.extend_from_slice(&encode_u32(values.len(), "slot count")?);
    Ok(out)
}

/// Recovers the slot values, in order.
///
/// # Errors
///
/// Returns [`Error::Format`] if the trailer cannot be read.
pub fn decode(key: &[u8]) -> Result<Vec<Bytes>> {
    Ok(decode_with_primary_key(key)?.0)
}

/// Recovers the slot values and the primary key sitting between the last
/// value and the length trailer.
///
/// # Errors
///
/// Returns [`Error::Format`] if the trailer cannot be read or the lengths do
/// not fit in the key.
pub fn decode_with_primary_key(key: &[u8]) -> Result<(Vec<Bytes>, Bytes)> {
    let lengths = read_lengths(key)?;
    let trailer_start = key.len() - (lengths.len() + 1) * TRAILER_INT_SIZE;
    let values_len = lengths
        .iter()
        .try_fold(0usize, |acc, len| acc.checked_add(*len))
        .filter(|total| *total <= trailer_start)
        .ok_or_else(|| {
            Error::Format(format!(
                "value lengths exceed the {trailer_start} bytes before the trailer"
            ))
        })?;

    let mut values = Vec::with_capacity(lengths.len());
    let mut offset = 0;
    for len in lengths {
        values.push(Bytes::copy_from_slice(&key[offset..offset + len]));
        offset += len;
    }
    let primary_key = Bytes::copy_from_slice(&key[values_len..trailer_start]);
    Ok((values, primary_key))
}

/// Returns true if every slot of the key is zero-length.
///
/// Stops reading the trailer at the first non-empty slot.
///
/// # Errors
///
/// Returns [`Error::Format`] if the trailer cannot be read.
pub fn all_values_null(key: &[u8]) -> Result<bool> {
    let count = slot_count(key)?;
    let mut end = key.len() - TRAILER_INT_SIZE;
    for _ in 0..count {
        if read_u32_before(key, end)? != 0 {
            return Ok(false);
        }
        end -= TRAILER_INT_SIZE;
    }
    Ok(true)
}

/// Number of slots recorded in the key trailer.
///
/// # Errors
///
/// Returns [`Error::Format`] if the key is shorter than the count or the
/// count does not fit the key.
pub fn slot_count(key: &[u8]) -> Result<usize> {
    let count = read_u32_before(key, key.len())? as usize;
    let needed = count
        .checked_add(1)
        .and_then(|n| n.checked_mul(TRAILER_INT_SIZE));
    match needed {
        Some(needed) if needed <= key.len() => Ok(count),
        _ => Err(Error::Format(format!(
            "slot count {count} does not fit a {} byte key",
            key.len()
        ))),
    }
}

/// Walks the trailer backwards and returns the lengths in slot order.
fn read_lengths(key: &[u8]) -> Result<Vec<usize>> {
    let count = slot_count(key)?;
    let mut lengths = vec![0usize; count];
    let mut end = key.len() - TRAILER_INT_SIZE;
    for slot in (0..count).rev() {
        lengths[slot] = read_u32_before(key, end)? as usize;
        end -= TRAILER_INT_SIZE;
    }
    Ok(lengths)
}

/// Reads the big-endian `u32` occupying `key[end - 4..end]`.
fn read_u32_before(key: &[u8], end: usize) -> Result<u32> {
    end.checked_sub(TRAILER_INT_SIZE)
        .and_then(|start| key.get(start..end))
        .and_then(|raw| <[u8; TRAILER_INT_SIZE]>::try_from(raw).ok())
        .map(u32::from_be_bytes)
        .ok_or_else(|| {
            Error::Format(format!(
                "cannot read a {TRAILER_INT_SIZE} byte integer ending at offset {end} of a {} byte key",
                key.len()
            ))
        })
}

fn encode_u32(value: usize, what: &str) -> Result<[u8; TRAILER_INT_SIZE]> {
    u32::try_from(value)
        .map(u32::to_be_bytes)
        .map_err(|_| Error::Overflow(format!("{what} {value} exceeds u32::MAX")))
}
