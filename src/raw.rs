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

use bytes::Bytes;

use crate::{
    debug::DebugByteSlice,
    tag::{Did, Edid, Pds, MAX_PAYLOAD_SIZE},
};

/// A descriptor in its binary form.
///
/// A descriptor is defined as a one-byte tag, a one-byte payload length,
/// and a payload of 0 to 255 bytes. This struct does not ascribe any
/// meaning to the payload; see [`Descriptor`] for typed access.
///
/// The encoded bytes are held in a reference-counted, immutable [`Bytes`]
/// buffer, so cloning a `RawDescriptor` (for example, to place the same
/// descriptor in several lists) never copies the data. The only mutation
/// allowed after construction is [`invalidate()`].
///
/// A `RawDescriptor` built from malformed bytes is still constructed, but
/// is marked invalid. This lets callers collect partially-malformed lists
/// and report diagnostics instead of aborting.
///
/// [`Descriptor`]: crate::Descriptor
/// [`invalidate()`]: Self::invalidate
#[derive(Clone)]
pub struct RawDescriptor {
    data: Bytes,
    valid: bool,
}

impl RawDescriptor {
    /// Wrap a complete encoded descriptor (tag, length, payload).
    ///
    /// The result is valid if `data` holds at least the two header bytes
    /// and the length byte matches the number of payload bytes present.
    ///
    /// ```
    /// use tsdesc::RawDescriptor;
    ///
    /// assert!(RawDescriptor::from_bytes(vec![0x0a, 0x02, 0x01, 0x02]).is_valid());
    /// assert!(!RawDescriptor::from_bytes(vec![0x0a, 0x03, 0x01, 0x02]).is_valid());
    /// ```
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        let data: Bytes = data.into();
        let valid = data.len() >= 2 && data[1] as usize == data.len() - 2;
        Self { data, valid }
    }

    /// Build a descriptor from a tag and a payload.
    ///
    /// The result is invalid if the payload is longer than 255 bytes.
    pub fn new(tag: Did, payload: &[u8]) -> Self {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Self::invalid();
        }

        let mut data = Vec::with_capacity(2 + payload.len());
        data.push(tag.0);
        data.push(payload.len() as u8);
        data.extend_from_slice(payload);

        Self {
            data: Bytes::from(data),
            valid: true,
        }
    }

    /// An empty, invalid descriptor.
    pub fn invalid() -> Self {
        Self {
            data: Bytes::new(),
            valid: false,
        }
    }

    /// Take one descriptor from the front of a descriptor loop, and return
    /// a tuple of the descriptor and the remainder of the input.
    ///
    /// If the input is truncated (fewer payload bytes than the length byte
    /// declares), the returned descriptor holds everything that remained
    /// and is invalid; the remainder is then empty.
    pub fn from_slice(i: &[u8]) -> (Self, &[u8]) {
        if i.len() < 2 {
            return (Self::from_bytes(Bytes::copy_from_slice(i)), &[]);
        }

        let end = 2 + i[1] as usize;
        if end > i.len() {
            let mut raw = Self::from_bytes(Bytes::copy_from_slice(i));
            raw.valid = false;
            return (raw, &[]);
        }

        let (desc, rem) = i.split_at(end);
        (Self::from_bytes(Bytes::copy_from_slice(desc)), rem)
    }

    /// Returns `true` if this descriptor is structurally valid.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Mark this descriptor as invalid.
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Descriptor tag.
    ///
    /// Returns tag 0 if there are no bytes at all.
    pub fn tag(&self) -> Did {
        Did(self.data.first().copied().unwrap_or(0))
    }

    /// Descriptor payload, excluding the two header bytes.
    ///
    /// Returns an empty slice for an invalid descriptor.
    pub fn payload(&self) -> &[u8] {
        if self.valid {
            &self.data[2..]
        } else {
            &[]
        }
    }

    /// Size of the payload in bytes.
    pub fn payload_size(&self) -> usize {
        self.payload().len()
    }

    /// Total size in bytes, including the two header bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// The complete encoded descriptor.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// A shared handle on the complete encoded descriptor.
    pub fn bytes(&self) -> Bytes {
        self.data.clone()
    }

    /// If this is an extension descriptor, the extended tag found in the
    /// first payload byte.
    pub fn extended_tag(&self) -> Option<Edid> {
        if self.tag().is_extension() {
            self.payload().first().map(|&b| Edid(b))
        } else {
            None
        }
    }

    /// Returns `true` if this is a valid `private_data_specifier_descriptor`.
    pub fn is_private_data_specifier(&self) -> bool {
        self.private_data_specifier().is_some()
    }

    /// If this is a valid `private_data_specifier_descriptor`, the
    /// specifier it declares.
    pub fn private_data_specifier(&self) -> Option<Pds> {
        if self.tag() != Did::PRIVATE_DATA_SPECIFIER {
            return None;
        }

        let payload: [u8; 4] = self.payload().try_into().ok()?;
        Some(Pds(u32::from_be_bytes(payload)))
    }
}

impl Default for RawDescriptor {
    fn default() -> Self {
        Self::invalid()
    }
}

impl PartialEq for RawDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.valid == other.valid && self.data == other.data
    }
}

impl Eq for RawDescriptor {}

impl Debug for RawDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.debug_struct("RawDescriptor")
            .field("tag", &self.tag())
            .field("valid", &self.valid)
            .field("data", &DebugByteSlice(&self.data))
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

    use crate::{
        tag::{Did, Edid, Pds},
        RawDescriptor,
    };

    #[test]
    fn simple_descriptor() {
        let raw = RawDescriptor::from_bytes(hex!("0a02 0102").to_vec());
        assert!(raw.is_valid());
        assert_eq!(raw.tag(), Did(0x0a));
        assert_eq!(raw.payload(), &[1, 2]);
        assert_eq!(raw.payload_size(), 2);
        assert_eq!(raw.size(), 4);
    }

    #[test]
    fn length_mismatch() {
        let raw = RawDescriptor::from_bytes(hex!("0a03 0102").to_vec());
        assert!(!raw.is_valid());
        assert_eq!(raw.tag(), Did(0x0a));
        assert!(raw.payload().is_empty());
    }

    #[test]
    fn too_short() {
        assert!(!RawDescriptor::from_bytes(hex!("0a").to_vec()).is_valid());
        assert!(!RawDescriptor::from_bytes(Vec::new()).is_valid());
        assert_eq!(RawDescriptor::from_bytes(Vec::new()).tag(), Did(0));
    }

    #[test]
    fn empty_payload() {
        let raw = RawDescriptor::from_bytes(hex!("4800").to_vec());
        assert!(raw.is_valid());
        assert!(raw.payload().is_empty());
    }

    #[test]
    fn new_from_payload() {
        let raw = RawDescriptor::new(Did(0x0a), &[1, 2]);
        assert_eq!(raw, RawDescriptor::from_bytes(hex!("0a02 0102").to_vec()));

        let raw = RawDescriptor::new(Did(0x0a), &[0u8; 256]);
        assert!(!raw.is_valid());

        let raw = RawDescriptor::new(Did(0x0a), &[0u8; 255]);
        assert!(raw.is_valid());
        assert_eq!(raw.size(), 257);
    }

    #[test]
    fn invalidate() {
        let mut raw = RawDescriptor::from_bytes(hex!("0a02 0102").to_vec());
        let shared = raw.clone();
        raw.invalidate();
        assert!(!raw.is_valid());
        assert!(shared.is_valid());
        assert_ne!(raw, shared);
    }

    #[test]
    fn from_slice() {
        let data = hex!(
            "0a02 0102" // first
            "4800" // second
            "0a05 01" // truncated
        );

        let (first, rem) = RawDescriptor::from_slice(&data);
        assert!(first.is_valid());
        assert_eq!(first.as_bytes(), &hex!("0a02 0102"));

        let (second, rem) = RawDescriptor::from_slice(rem);
        assert!(second.is_valid());
        assert_eq!(second.tag(), Did(0x48));

        let (third, rem) = RawDescriptor::from_slice(rem);
        assert!(!third.is_valid());
        assert_eq!(third.size(), 3);
        assert!(rem.is_empty());
    }

    #[test]
    fn from_slice_single_byte() {
        let (raw, rem) = RawDescriptor::from_slice(&[0x0a]);
        assert!(!raw.is_valid());
        assert!(rem.is_empty());
    }

    #[test]
    fn shared_storage() {
        let raw = RawDescriptor::from_bytes(hex!("0a02 0102").to_vec());
        let a = raw.bytes();
        let b = raw.clone().bytes();
        assert_eq!(a.as_ptr(), b.as_ptr());
    }

    #[test]
    fn send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RawDescriptor>();
    }

    #[test]
    fn extended_tag() {
        let raw = RawDescriptor::from_bytes(hex!("7f02 0680").to_vec());
        assert_eq!(raw.extended_tag(), Some(Edid(0x06)));

        let raw = RawDescriptor::from_bytes(hex!("7f00").to_vec());
        assert_eq!(raw.extended_tag(), None);

        let raw = RawDescriptor::from_bytes(hex!("0a02 0680").to_vec());
        assert_eq!(raw.extended_tag(), None);
    }

    #[test]
    fn private_data_specifier() {
        let raw = RawDescriptor::from_bytes(hex!("5f04 00000028").to_vec());
        assert!(raw.is_private_data_specifier());
        assert_eq!(raw.private_data_specifier(), Some(Pds::EACEM));

        let raw = RawDescriptor::from_bytes(hex!("5f03 000028").to_vec());
        assert!(!raw.is_private_data_specifier());
    }

    #[test]
    fn debug() {
        let raw = RawDescriptor::from_bytes(hex!("0a02 0102").to_vec());
        assert_eq!(
            format!("{raw:?}"),
            "RawDescriptor { tag: 0x0A, valid: true, data: [0a, 02, 01, 02] }"
        );
    }
}
