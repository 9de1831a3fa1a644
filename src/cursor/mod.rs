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

//! Bounded, forward-only cursors over a fixed byte region.
//!
//! Both cursors follow the same "sticky error, keep going" policy:
//!
//! * A read beyond the end of the region returns zero (or an empty value)
//!   and sets the error flag.
//! * A write beyond the end of the region is discarded and sets the error
//!   flag.
//! * Once the error flag is set, it is never cleared and every subsequent
//!   operation is a no-op.
//!
//! This lets a payload routine perform a long sequence of field operations
//! and check [`has_error()`] once at the end.
//!
//! Fields are big-endian. Bit fields are read and written MSB first and
//! may straddle byte boundaries; byte-level operations require the cursor
//! to be byte-aligned and set the error flag otherwise.
//!
//! ```
//! use tsdesc::cursor::{ReadCursor, WriteCursor};
//!
//! let mut buf = [0u8; 4];
//! let mut w = WriteCursor::new(&mut buf);
//! w.write_u16(0x1234);
//! w.write_bits(3, 0b101u8);
//! w.write_reserved_bits(5);
//! w.write_u16(0xABCD); // one byte too many
//! assert!(w.has_error());
//! assert_eq!(w.position(), 3);
//!
//! let mut r = ReadCursor::new(&buf[..3]);
//! assert_eq!(r.read_u16(), 0x1234);
//! assert_eq!(r.read_bits::<u8>(3), 0b101);
//! r.skip_reserved_bits(5);
//! assert!(r.at_end());
//! assert_eq!(r.read_u8(), 0);
//! assert!(r.has_error());
//! ```
//!
//! [`has_error()`]: ReadCursor::has_error

mod read_cursor;
mod write_cursor;

pub use read_cursor::ReadCursor;
pub use write_cursor::WriteCursor;

// Mask of the `bits` low-order bits of a u64.
pub(crate) fn low_mask(bits: usize) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}
