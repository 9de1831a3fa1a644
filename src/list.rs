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

//! Ordered descriptor loops as found in signaling tables.

use std::ops::Index;

use bytes::{BufMut, Bytes, BytesMut};
use log::{debug, warn};

use crate::{
    descriptors::PrivateDataSpecifierDescriptor,
    error::{DeserializeError, ListError},
    tag::{Did, Edid, Pds},
    AbstractDescriptor, Descriptor, DescriptorPayload, RawDescriptor, Registry,
};

/// Largest value of the 12-bit length prefix of a descriptor loop.
pub const MAX_LOOP_LENGTH: usize = 0x0FFF;

/// An ordered list of binary descriptors.
///
/// Order is wire order and is meaningful: a
/// `private_data_specifier_descriptor` sets the private data specifier for
/// all the descriptors which follow it. Duplicate tags are allowed.
///
/// Entries are stored in their binary form. Typed views are decoded on
/// demand, see [`find()`](Self::find) and
/// [`deserialize_typed()`](Self::deserialize_typed).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DescriptorList {
    list: Vec<RawDescriptor>,
}

impl DescriptorList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a descriptor loop.
    ///
    /// A truncated last record is kept as an invalid entry so that callers
    /// can report it.
    pub fn from_slice(mut i: &[u8]) -> Self {
        let mut list = Vec::new();

        while !i.is_empty() {
            let (raw, rem) = RawDescriptor::from_slice(i);
            if !raw.is_valid() {
                warn!(
                    "descriptor loop truncated: {} byte(s) left at entry {}",
                    i.len(),
                    list.len()
                );
            }
            list.push(raw);
            i = rem;
        }

        Self { list }
    }

    /// Number of descriptors.
    pub fn count(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if the list holds no descriptor.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Descriptor at `index`.
    pub fn at(&self, index: usize) -> Option<&RawDescriptor> {
        self.list.get(index)
    }

    /// Iterate over the descriptors in list order.
    pub fn iter(&self) -> std::slice::Iter<'_, RawDescriptor> {
        self.list.iter()
    }

    /// Append a binary descriptor.
    pub fn append(&mut self, raw: RawDescriptor) {
        self.list.push(raw);
    }

    /// Serialize a typed descriptor and append it.
    ///
    /// If the descriptor is private and its private data specifier is not
    /// active at the end of the list, a `private_data_specifier_descriptor`
    /// is appended first.
    ///
    /// Returns `false` (and leaves the list unchanged) if the descriptor
    /// cannot be serialized.
    pub fn append_typed(&mut self, desc: &(impl AbstractDescriptor + ?Sized)) -> bool {
        let raw = desc.serialize();
        if !raw.is_valid() {
            debug!("{}: not added to descriptor list", desc.xml_name());
            return false;
        }

        if let Some(pds) = desc.required_pds() {
            self.add_private_data_specifier(pds);
        }

        self.list.push(raw);
        true
    }

    /// Append a `private_data_specifier_descriptor`, unless `pds` is
    /// already the active specifier at the end of the list.
    pub fn add_private_data_specifier(&mut self, pds: Pds) {
        if self.active_pds(self.list.len()) == Some(pds) {
            return;
        }

        let marker = Descriptor::from(PrivateDataSpecifierDescriptor::new(pds));
        self.list.push(marker.serialize());
    }

    /// Remove and return the descriptor at `index`.
    pub fn remove(&mut self, index: usize) -> Option<RawDescriptor> {
        (index < self.list.len()).then(|| self.list.remove(index))
    }

    /// Remove all descriptors.
    pub fn clear(&mut self) {
        self.list.clear();
    }

    /// The private data specifier active for the descriptor at `index`.
    ///
    /// For a `private_data_specifier_descriptor`, this is the value it
    /// declares.
    pub fn private_data_specifier(&self, index: usize) -> Option<Pds> {
        if index >= self.list.len() {
            return None;
        }
        self.active_pds(index + 1)
    }

    // Specifier declared by the last marker before `end`.
    fn active_pds(&self, end: usize) -> Option<Pds> {
        self.list[..end]
            .iter()
            .rev()
            .find_map(RawDescriptor::private_data_specifier)
    }

    /// Index of the first descriptor with tag `tag`, at or after `start`.
    pub fn search(&self, tag: Did, start: usize) -> Option<usize> {
        self.list
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, raw)| raw.tag() == tag)
            .map(|(index, _)| index)
    }

    /// Index of the first descriptor with tag `tag` for which `pds` is the
    /// active private data specifier, at or after `start`.
    ///
    /// A descriptor with the right tag which is not preceded by a
    /// `private_data_specifier_descriptor` declaring `pds` is ignored.
    pub fn search_pds(&self, tag: Did, pds: Pds, start: usize) -> Option<usize> {
        let mut active = None;

        for (index, raw) in self.list.iter().enumerate() {
            if let Some(declared) = raw.private_data_specifier() {
                active = Some(declared);
            }

            if index >= start && raw.tag() == tag && active == Some(pds) {
                return Some(index);
            }
        }

        None
    }

    /// Index of the first extension descriptor with tag `tag` and extended
    /// tag `edid`, at or after `start`.
    ///
    /// MPEG (0x3F) and DVB (0x7F) extension descriptors have separate
    /// extended tag spaces.
    pub fn search_extension(&self, tag: Did, edid: Edid, start: usize) -> Option<usize> {
        self.list
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, raw)| raw.tag() == tag && raw.extended_tag() == Some(edid))
            .map(|(index, _)| index)
    }

    /// Find and decode the first descriptor of type `P`, at or after
    /// `start`.
    ///
    /// Entries with the right tag which fail to decode are skipped. The
    /// private data specifier and extended tag of `P`, if any, are honored.
    pub fn find<P: DescriptorPayload>(&self, start: usize) -> Option<(usize, Descriptor<P>)> {
        let mut index = start;

        loop {
            index = match P::REQUIRED_PDS {
                Some(pds) => self.search_pds(P::TAG, pds, index)?,
                None => self.search(P::TAG, index)?,
            };

            if let Ok(desc) = Descriptor::<P>::try_from(&self.list[index]) {
                return Some((index, desc));
            }

            index += 1;
        }
    }

    /// Decode the descriptor at `index` into `desc`.
    ///
    /// If `index` is out of range, `desc` is invalidated.
    pub fn deserialize_typed(
        &self,
        index: usize,
        desc: &mut (impl AbstractDescriptor + ?Sized),
    ) -> Result<(), DeserializeError> {
        match self.list.get(index) {
            Some(raw) => desc.deserialize(raw),
            None => {
                desc.clear();
                desc.invalidate();
                Err(DeserializeError::InvalidBinary)
            }
        }
    }

    /// Decode every descriptor using the types known to `registry`.
    ///
    /// The result has one entry per descriptor, `None` when no type is
    /// registered for it. Decoded descriptors may be invalid.
    pub fn decode_all(&self, registry: &Registry) -> Vec<Option<Box<dyn AbstractDescriptor>>> {
        let mut active = None;

        self.list
            .iter()
            .map(|raw| {
                if let Some(declared) = raw.private_data_specifier() {
                    active = Some(declared);
                }
                registry.decode(raw, active)
            })
            .collect()
    }

    /// Total size in bytes of the serialized list.
    pub fn binary_size(&self) -> usize {
        self.list.iter().map(RawDescriptor::size).sum()
    }

    /// Serialize all descriptors, in list order.
    ///
    /// The whole list is serialized or nothing: if it does not fit in
    /// `max_size` bytes, this fails and the caller must split the list.
    pub fn serialize_all(&self, max_size: usize) -> Result<Bytes, ListError> {
        let required = self.check(max_size)?;

        let mut buf = BytesMut::with_capacity(required);
        for raw in &self.list {
            buf.put_slice(raw.as_bytes());
        }

        Ok(buf.freeze())
    }

    /// Serialize all descriptors after a 2-byte descriptor loop length:
    /// 4 reserved bits (set to 1) followed by a 12-bit length.
    ///
    /// `max_size` includes the 2 bytes of the length field.
    pub fn serialize_with_loop_length(&self, max_size: usize) -> Result<Bytes, ListError> {
        let max = max_size.saturating_sub(2).min(MAX_LOOP_LENGTH);
        let required = self.check(max).map_err(|err| match err {
            ListError::Overflow { required, max } => ListError::Overflow {
                required: required + 2,
                max: max + 2,
            },
            err => err,
        })?;

        let mut buf = BytesMut::with_capacity(2 + required);
        buf.put_u16(0xF000 | required as u16);
        for raw in &self.list {
            buf.put_slice(raw.as_bytes());
        }

        Ok(buf.freeze())
    }

    // All entries valid and total size within `max`.
    fn check(&self, max: usize) -> Result<usize, ListError> {
        if let Some(index) = self.list.iter().position(|raw| !raw.is_valid()) {
            return Err(ListError::InvalidDescriptor(index));
        }

        let required = self.binary_size();
        if required > max {
            debug!("descriptor list overflow: {required} bytes, max {max}");
            return Err(ListError::Overflow { required, max });
        }

        Ok(required)
    }
}

impl Index<usize> for DescriptorList {
    type Output = RawDescriptor;

    fn index(&self, index: usize) -> &RawDescriptor {
        &self.list[index]
    }
}

impl<'a> IntoIterator for &'a DescriptorList {
    type Item = &'a RawDescriptor;
    type IntoIter = std::slice::Iter<'a, RawDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}

impl FromIterator<RawDescriptor> for DescriptorList {
    fn from_iter<I: IntoIterator<Item = RawDescriptor>>(iter: I) -> Self {
        Self {
            list: iter.into_iter().collect(),
        }
    }
}
