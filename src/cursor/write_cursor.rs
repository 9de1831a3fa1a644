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

use crate::{cursor::low_mask, debug::DebugByteSlice};

/// A write cursor over a pre-sized buffer.
///
/// The cursor never grows its buffer. Payload routines must fit within
/// the region they were given or the error flag is set.
///
/// See the [module documentation](crate::cursor) for the error policy.
pub struct WriteCursor<'a> {
    buf: &'a mut [u8],
    pos: usize,
    bit: usize,
    error: bool,
}

impl<'a> WriteCursor<'a> {
    /// Create a cursor over the whole of `buf`.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            bit: 0,
            error: false,
        }
    }

    /// Number of bytes written so far (including a partially-written byte).
    pub fn position(&self) -> usize {
        if self.bit == 0 {
            self.pos
        } else {
            self.pos + 1
        }
    }

    /// Number of whole bytes still available.
    pub fn remaining(&self) -> usize {
        self.remaining_bits() / 8
    }

    /// Number of bits still available.
    pub fn remaining_bits(&self) -> usize {
        (self.buf.len() - self.pos) * 8 - self.bit
    }

    /// Returns `true` if the cursor is on a byte boundary.
    pub fn is_byte_aligned(&self) -> bool {
        self.bit == 0
    }

    /// Returns `true` if any operation has failed on this cursor.
    pub fn has_error(&self) -> bool {
        self.error
    }

    /// Force the error state, e.g. when a payload routine detects that a
    /// field value cannot be represented.
    pub fn set_error(&mut self) {
        self.error = true;
    }

    /// Write the `bits` low-order bits (at most 64) of `value`.
    ///
    /// Higher-order bits of `value` are ignored.
    pub fn write_bits<T: Into<u64>>(&mut self, bits: usize, value: T) {
        if self.error {
            return;
        }

        if bits > 64 || bits > self.remaining_bits() {
            self.error = true;
            return;
        }

        let value = value.into() & low_mask(bits);
        let mut left = bits;

        while left > 0 {
            let avail = 8 - self.bit;
            let take = avail.min(left);
            let shift = avail - take;
            let chunk = ((value >> (left - take)) & low_mask(take)) as u8;
            let mask = (low_mask(take) as u8) << shift;

            self.buf[self.pos] = (self.buf[self.pos] & !mask) | (chunk << shift);
            left -= take;
            self.bit += take;

            if self.bit == 8 {
                self.bit = 0;
                self.pos += 1;
            }
        }
    }

    /// Write a single bit.
    pub fn write_bit(&mut self, value: bool) {
        self.write_bits(1, value);
    }

    /// Write `bits` reserved bits, all set to 1.
    pub fn write_reserved_bits(&mut self, bits: usize) {
        let mut left = bits;
        while left > 0 {
            let n = left.min(64);
            self.write_bits(n, u64::MAX);
            left -= n;
        }
    }

    /// Write an 8-bit unsigned integer.
    pub fn write_u8(&mut self, value: u8) {
        self.write_bytes(&value.to_be_bytes());
    }

    /// Write a 16-bit big-endian unsigned integer.
    pub fn write_u16(&mut self, value: u16) {
        self.write_bytes(&value.to_be_bytes());
    }

    /// Write the 24 low-order bits of `value`, big-endian.
    pub fn write_u24(&mut self, value: u32) {
        self.write_bytes(&value.to_be_bytes()[1..]);
    }

    /// Write a 32-bit big-endian unsigned integer.
    pub fn write_u32(&mut self, value: u32) {
        self.write_bytes(&value.to_be_bytes());
    }

    /// Write a 64-bit big-endian unsigned integer.
    pub fn write_u64(&mut self, value: u64) {
        self.write_bytes(&value.to_be_bytes());
    }

    /// Write a block of bytes.
    ///
    /// Nothing is written if the whole block does not fit.
    pub fn write_bytes(&mut self, data: &[u8]) {
        if self.error || self.bit != 0 || data.len() > self.buf.len() - self.pos {
            self.error = true;
            return;
        }

        self.buf[self.pos..self.pos + data.len()].copy_from_slice(data);
        self.pos += data.len();
    }

    /// Write a block of bytes preceded by its 8-bit length.
    ///
    /// Sets the error flag if the block is longer than 255 bytes.
    pub fn write_u8_len_bytes(&mut self, data: &[u8]) {
        match u8::try_from(data.len()) {
            Ok(len) if 1 + data.len() <= self.remaining() => {
                self.write_u8(len);
                self.write_bytes(data);
            }
            _ => self.error = true,
        }
    }

    /// Write a 3-character ISO 639 language code.
    ///
    /// Sets the error flag unless `code` is exactly three ISO 8859-1
    /// characters.
    pub fn write_language_code(&mut self, code: &str) {
        let bytes: Vec<u8> = code
            .chars()
            .map_while(|c| u8::try_from(c as u32).ok())
            .collect();

        if bytes.len() != 3 || code.chars().count() != 3 {
            self.error = true;
            return;
        }

        self.write_bytes(&bytes);
    }
}

impl<'a> Debug for WriteCursor<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.debug_struct("WriteCursor")
            .field("written", &DebugByteSlice(&self.buf[..self.position()]))
            .field("capacity", &self.buf.len())
            .field("bit", &self.bit)
            .field("error", &self.error)
            .finish()
    }
}
