// Copyright 2024 Adobe. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.

// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

use std::fmt::{Debug, Formatter};

use crate::debug::DebugByteSlice;

/// A read-only cursor over a descriptor payload.
///
/// See the [module documentation](crate::cursor) for the error policy.
pub struct ReadCursor<'a> {
    data: &'a [u8],

    // Byte offset of the next bit to read.
    pos: usize,

    // Bit offset (0..8) within `data[pos]`, counted from the MSB.
    bit: usize,

    error: bool,
}

impl<'a> ReadCursor<'a> {
    /// Create a cursor over the whole of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            bit: 0,
            error: false,
        }
    }

    /// Current byte offset from the start of the region.
    ///
    /// If the cursor is in the middle of a byte, this is the offset of
    /// that partially-read byte.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Current offset in bits from the start of the region.
    pub fn bit_position(&self) -> usize {
        self.pos * 8 + self.bit
    }

    /// Number of whole bytes left to read.
    pub fn remaining(&self) -> usize {
        self.remaining_bits() / 8
    }

    /// Number of bits left to read.
    pub fn remaining_bits(&self) -> usize {
        (self.data.len() - self.pos) * 8 - self.bit
    }

    /// Returns `true` if every bit of the region has been consumed.
    pub fn at_end(&self) -> bool {
        self.remaining_bits() == 0
    }

    /// Returns `true` if the cursor is on a byte boundary.
    pub fn is_byte_aligned(&self) -> bool {
        self.bit == 0
    }

    /// Returns `true` if any operation has failed on this cursor.
    pub fn has_error(&self) -> bool {
        self.error
    }

    /// Force the error state, e.g. when a payload routine detects an
    /// inconsistent field value.
    pub fn set_error(&mut self) {
        self.error = true;
    }

    /// Read `bits` bits (at most 64) as an unsigned value.
    ///
    /// Returns `T::default()` and sets the error flag if fewer than `bits`
    /// bits remain or if the value does not fit in `T`.
    pub fn read_bits<T: TryFrom<u64> + Default>(&mut self, bits: usize) -> T {
        let value = self.read_bits_u64(bits);
        if self.error {
            return T::default();
        }

        match T::try_from(value) {
            Ok(v) => v,
            Err(_) => {
                self.error = true;
                T::default()
            }
        }
    }

    /// Read a single bit as a boolean.
    pub fn read_bit(&mut self) -> bool {
        self.read_bits_u64(1) != 0
    }

    /// Skip `bits` bits.
    pub fn skip_bits(&mut self, bits: usize) {
        if self.error {
            return;
        }

        if bits > self.remaining_bits() {
            self.error = true;
            return;
        }

        let total = self.bit + bits;
        self.pos += total / 8;
        self.bit = total % 8;
    }

    /// Skip `bits` reserved bits.
    ///
    /// The values of reserved bits are not checked when reading, so that
    /// non-compliant streams remain decodable.
    pub fn skip_reserved_bits(&mut self, bits: usize) {
        self.skip_bits(bits);
    }

    /// Read an 8-bit unsigned integer.
    pub fn read_u8(&mut self) -> u8 {
        u8::from_be_bytes(self.read_array())
    }

    /// Read a 16-bit big-endian unsigned integer.
    pub fn read_u16(&mut self) -> u16 {
        u16::from_be_bytes(self.read_array())
    }

    /// Read a 24-bit big-endian unsigned integer.
    pub fn read_u24(&mut self) -> u32 {
        let [a, b, c] = self.read_array();
        u32::from_be_bytes([0, a, b, c])
    }

    /// Read a 32-bit big-endian unsigned integer.
    pub fn read_u32(&mut self) -> u32 {
        u32::from_be_bytes(self.read_array())
    }

    /// Read a 64-bit big-endian unsigned integer.
    pub fn read_u64(&mut self) -> u64 {
        u64::from_be_bytes(self.read_array())
    }

    /// Read `len` bytes.
    ///
    /// On failure, returns an empty slice and sets the error flag.
    pub fn read_bytes(&mut self, len: usize) -> &'a [u8] {
        if self.error || self.bit != 0 || len > self.data.len() - self.pos {
            self.error = true;
            return &[];
        }

        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        bytes
    }

    /// Read all remaining bytes.
    pub fn read_remaining_bytes(&mut self) -> &'a [u8] {
        let len = self.data.len() - self.pos;
        self.read_bytes(len)
    }

    /// Read a block of bytes preceded by its 8-bit length.
    pub fn read_u8_len_bytes(&mut self) -> &'a [u8] {
        let len = self.read_u8() as usize;
        self.read_bytes(len)
    }

    /// Read a 3-character ISO 639 language code.
    ///
    /// Each byte is interpreted as one ISO 8859-1 character. Returns an
    /// empty string on failure.
    pub fn read_language_code(&mut self) -> String {
        let bytes = self.read_bytes(3);
        bytes.iter().map(|&b| b as char).collect()
    }

    fn read_array<const N: usize>(&mut self) -> [u8; N] {
        let mut result = [0u8; N];
        let bytes = self.read_bytes(N);
        if bytes.len() == N {
            result.copy_from_slice(bytes);
        }
        result
    }

    fn read_bits_u64(&mut self, bits: usize) -> u64 {
        if self.error {
            return 0;
        }

        if bits > 64 || bits > self.remaining_bits() {
            self.error = true;
            return 0;
        }

        let mut value = 0u64;
        let mut left = bits;

        while left > 0 {
            // Take as many bits as possible from the current byte.
            let avail = 8 - self.bit;
            let take = avail.min(left);
            let shift = avail - take;
            let chunk = (self.data[self.pos] >> shift) & ((1u16 << take) - 1) as u8;

            value = (value << take) | chunk as u64;
            left -= take;
            self.bit += take;

            if self.bit == 8 {
                self.bit = 0;
                self.pos += 1;
            }
        }

        value
    }
}

impl<'a> Debug for ReadCursor<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.debug_struct("ReadCursor")
            .field("data", &DebugByteSlice(self.data))
            .field("pos", &self.pos)
            .field("bit", &self.bit)
            .field("error", &self.error)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]
    #![allow(clippy::unwrap_used)]

    use hex_literal::hex;
    use pretty_assertions_sorted::assert_eq;

    use crate::cursor::ReadCursor;

    #[test]
    fn integers() {
        let data = hex!(
            "01" // u8
            "0203" // u16
            "040506" // u24
            "0708090a" // u32
            "0b0c0d0e0f101112" // u64
        );

        let mut r = ReadCursor::new(&data);
        assert_eq!(r.read_u8(), 0x01);
        assert_eq!(r.read_u16(), 0x0203);
        assert_eq!(r.read_u24(), 0x040506);
        assert_eq!(r.read_u32(), 0x0708090a);
        assert_eq!(r.read_u64(), 0x0b0c0d0e0f101112);
        assert!(r.at_end());
        assert!(!r.has_error());
        assert_eq!(r.position(), 18);
    }

    #[test]
    fn overflow_returns_zero_and_sticks() {
        let data = hex!("0102 03");

        let mut r = ReadCursor::new(&data);
        assert_eq!(r.read_u16(), 0x0102);
        assert_eq!(r.read_u16(), 0);
        assert!(r.has_error());

        // Position unchanged and subsequent reads are no-ops, even though
        // one byte would still be available.
        assert_eq!(r.position(), 2);
        assert_eq!(r.read_u8(), 0);
        assert_eq!(r.position(), 2);
        assert!(r.has_error());
    }

    #[test]
    fn bit_fields() {
        // 1 | 01101 | 1 | 0 || 1111_0000
        let data = hex!("b6 f0");

        let mut r = ReadCursor::new(&data);
        assert!(r.read_bit());
        assert_eq!(r.read_bits::<u8>(5), 0b01101);
        assert!(!r.is_byte_aligned());
        r.skip_reserved_bits(1);
        assert!(!r.read_bit());
        assert!(r.is_byte_aligned());
        assert_eq!(r.read_bits::<u8>(4), 0x0f);
        assert_eq!(r.remaining_bits(), 4);
        assert_eq!(r.remaining(), 0);
        assert!(!r.at_end());
        r.skip_bits(4);
        assert!(r.at_end());
        assert!(!r.has_error());
    }

    #[test]
    fn bit_fields_straddle_bytes() {
        // 6 bits reserved, then a 10-bit value.
        let data = hex!("fe 7f");

        let mut r = ReadCursor::new(&data);
        r.skip_reserved_bits(6);
        assert_eq!(r.read_bits::<u16>(10), 0x27f);
        assert!(r.at_end());
    }

    #[test]
    fn bits_too_wide_for_type() {
        let data = hex!("ffff");

        let mut r = ReadCursor::new(&data);
        assert_eq!(r.read_bits::<u8>(9), 0);
        assert!(r.has_error());
    }

    #[test]
    fn unaligned_byte_read_is_an_error() {
        let data = hex!("ffff");

        let mut r = ReadCursor::new(&data);
        r.skip_bits(3);
        assert_eq!(r.read_u8(), 0);
        assert!(r.has_error());
    }

    #[test]
    fn bytes() {
        let data = hex!("03 616263 ff");

        let mut r = ReadCursor::new(&data);
        assert_eq!(r.read_u8_len_bytes(), b"abc");
        assert_eq!(r.read_remaining_bytes(), &[0xff]);
        assert!(r.at_end());

        assert_eq!(r.read_bytes(1), &[] as &[u8]);
        assert!(r.has_error());
    }

    #[test]
    fn truncated_length_prefixed_bytes() {
        let data = hex!("05 6162");

        let mut r = ReadCursor::new(&data);
        assert!(r.read_u8_len_bytes().is_empty());
        assert!(r.has_error());
    }

    #[test]
    fn language_code() {
        let data = hex!("667261 6575");

        let mut r = ReadCursor::new(&data);
        assert_eq!(r.read_language_code(), "fra");
        assert_eq!(r.read_language_code(), "");
        assert!(r.has_error());
    }

    #[test]
    fn empty_region() {
        let mut r = ReadCursor::new(&[]);
        assert!(r.at_end());
        assert_eq!(r.remaining(), 0);
        assert!(!r.read_bit());
        assert!(r.has_error());
    }
}
