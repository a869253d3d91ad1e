//! CRC32 fingerprint of a snapshot
//!
//! The fingerprint covers the snapshot's canonical JSON encoding. Every map in
//! the snapshot is ordered, so two snapshots built from the same ledger
//! prefix encode to the same bytes and share a fingerprint.
//!
//! Uses CRC32 (IEEE polynomial) via crc32fast.

use crc32fast::Hasher;
use serde::Serialize;

use super::errors::{SnapshotError, SnapshotResult};

/// Computes a CRC32 checksum over the provided data.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Formats a checksum as `crc32:xxxxxxxx` (lowercase hex, zero-padded).
pub fn format_checksum(checksum: u32) -> String {
    format!("crc32:{:08x}", checksum)
}

/// Formatted checksum of a value's JSON encoding.
pub fn fingerprint<T: Serialize>(value: &T) -> SnapshotResult<String> {
    let bytes = serde_json::to_vec(value).map_err(SnapshotError::encoding)?;
    Ok(format_checksum(compute_checksum(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_format_checksum() {
        assert_eq!(format_checksum(0xDEADBEEF), "crc32:deadbeef");
        assert_eq!(format_checksum(0x00000001), "crc32:00000001");
    }

    #[test]
    fn test_fingerprint_insertion_order_independent() {
        let mut a = BTreeMap::new();
        a.insert("b", 2);
        a.insert("a", 1);
        let mut b = BTreeMap::new();
        b.insert("a", 1);
        b.insert("b", 2);
        assert_eq!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());

        b.insert("c", 3);
        assert_ne!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());
    }
}
