//! Table-driven CRC-32 over byte streams.
//!
//! The table is built once per process and handed to every caller by reference;
//! checksums computed with different tables are not comparable.

/// Reversed generator polynomial of the standard (zlib / IEEE 802.3) CRC-32.
pub const POLYNOMIAL: u32 = 0xEDB8_8320;

/// Precomputed 256-entry CRC-32 lookup table. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct Crc32Table([u32; 256]);

impl Crc32Table {
    pub fn entry(&self, index: u8) -> u32 {
        self.0[index as usize]
    }
}

impl std::fmt::Debug for Crc32Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Crc32Table({:#010x}, ..)", self.0[1])
    }
}

/// Build the byte-reflected CRC-32 table (8 shift iterations per entry).
pub fn generate_table() -> Crc32Table {
    let mut table = [0u32; 256];
    for (n, slot) in table.iter_mut().enumerate() {
        let mut c = n as u32;
        for _ in 0..8 {
            c = if c & 1 != 0 { POLYNOMIAL ^ (c >> 1) } else { c >> 1 };
        }
        *slot = c;
    }
    Crc32Table(table)
}

/// Fold `buf` into a running checksum. Start a new stream with `sum = 0`.
///
/// The value returned after each chunk is the finished CRC-32 of every byte seen
/// so far, so feeding a file in fixed-size chunks gives the same result as
/// feeding it whole.
pub fn update(table: &Crc32Table, sum: u32, buf: &[u8]) -> u32 {
    let mut c = !sum;
    for &byte in buf {
        c = table.0[((c ^ byte as u32) & 0xff) as usize] ^ (c >> 8);
    }
    !c
}

/// CRC-32 of a complete buffer.
pub fn checksum(table: &Crc32Table, buf: &[u8]) -> u32 {
    update(table, 0, buf)
}
