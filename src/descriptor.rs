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

//! Typed descriptors and the binary/tree conversion rules they share.
//!
//! A concrete descriptor type only describes its payload layout by
//! implementing [`DescriptorPayload`]. The [`Descriptor`] wrapper adds the
//! validity state and performs all buffer management, header handling,
//! extended tag handling and error checking, so that payload routines never
//! deal with them.

use std::{
    any::Any,
    fmt::Debug,
    ops::{Deref, DerefMut},
};

use log::{debug, trace};

use crate::{
    cursor::{ReadCursor, WriteCursor},
    error::{DeserializeError, TreeError},
    tag::{Did, Edid, Pds, Standards, MAX_DESCRIPTOR_SIZE},
    tree::Element,
    RawDescriptor,
};

/// Payload layout of a concrete descriptor type.
///
/// `Default` must produce the "cleared" state of the descriptor.
///
/// Payload routines operate on a bounded cursor and do not need to check
/// for errors after each field: the caller checks the cursor once the
/// routine returns. A routine that detects an inconsistent value may call
/// `set_error()` on the cursor.
pub trait DescriptorPayload: Clone + Debug + Default + PartialEq {
    /// Descriptor tag.
    const TAG: Did;

    /// Name of the element representing this descriptor in a textual tree.
    const XML_NAME: &'static str;

    /// Former element name, still accepted when analyzing a tree.
    const XML_LEGACY_NAME: Option<&'static str> = None;

    /// Standards defining this descriptor.
    const STANDARDS: Standards;

    /// Private data specifier which must be active for this descriptor's
    /// tag to have this meaning. `None` for descriptors defined by a
    /// standard.
    const REQUIRED_PDS: Option<Pds> = None;

    /// Extended tag, for extension descriptors only.
    const EXTENDED_TAG: Option<Edid> = None;

    /// Write the payload. The extended tag, if any, is already written.
    fn serialize_payload(&self, buf: &mut WriteCursor<'_>);

    /// Read the payload. The extended tag, if any, is already consumed.
    fn deserialize_payload(&mut self, buf: &mut ReadCursor<'_>);

    /// Add attributes and children representing the payload to `element`.
    fn build_tree(&self, element: &mut Element);

    /// Populate the payload from `element`.
    fn analyze_tree(&mut self, element: &Element) -> Result<(), TreeError>;

    /// Returns `false` if the current field values cannot be serialized
    /// (e.g. a required field is unset).
    fn is_content_valid(&self) -> bool {
        true
    }
}

/// A typed descriptor: a payload plus its validity state.
///
/// The payload fields are accessible through `Deref`.
///
/// A `Descriptor` is either fully populated or in its cleared state. Every
/// failed conversion leaves it cleared and invalid.
#[derive(Clone, Debug, PartialEq)]
pub struct Descriptor<P> {
    payload: P,
    valid: bool,
}

impl<P: DescriptorPayload> Descriptor<P> {
    /// Create a cleared, valid descriptor.
    pub fn new() -> Self {
        Self {
            payload: P::default(),
            valid: true,
        }
    }

    /// Create a valid descriptor from its payload fields.
    pub fn from_payload(payload: P) -> Self {
        Self {
            payload,
            valid: true,
        }
    }

    /// Decode a binary descriptor.
    ///
    /// Check [`is_valid()`](Self::is_valid) on the result, or use
    /// `TryFrom<&RawDescriptor>` to get the reason of a failure.
    pub fn from_raw(raw: &RawDescriptor) -> Self {
        let mut desc = Self::new();
        // Validity carries the outcome.
        let _ = desc.deserialize(raw);
        desc
    }

    /// Analyze a tree element named [`XML_NAME`] (or
    /// [`XML_LEGACY_NAME`]).
    ///
    /// [`XML_NAME`]: DescriptorPayload::XML_NAME
    /// [`XML_LEGACY_NAME`]: DescriptorPayload::XML_LEGACY_NAME
    pub fn from_tree(element: &Element) -> Result<Self, TreeError> {
        let mut desc = Self::new();
        desc.analyze(element)?;
        Ok(desc)
    }

    /// Payload fields.
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Mutable payload fields.
    pub fn payload_mut(&mut self) -> &mut P {
        &mut self.payload
    }

    /// Consume the descriptor and return its payload fields.
    pub fn into_payload(self) -> P {
        self.payload
    }

    /// Returns `true` if this descriptor is valid and its content can be
    /// serialized.
    pub fn is_valid(&self) -> bool {
        self.valid && self.payload.is_content_valid()
    }

    /// Mark this descriptor as invalid.
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Reset all payload fields to their cleared state. The descriptor
    /// becomes valid.
    pub fn clear(&mut self) {
        self.payload = P::default();
        self.valid = true;
    }

    /// Serialize into a binary descriptor of at most
    /// [`MAX_DESCRIPTOR_SIZE`] bytes.
    pub fn serialize(&self) -> RawDescriptor {
        self.serialize_with_max(MAX_DESCRIPTOR_SIZE)
    }

    /// Serialize into a binary descriptor of at most `max_size` bytes
    /// (header included, capped to [`MAX_DESCRIPTOR_SIZE`]).
    ///
    /// This never fails loudly. If this descriptor is invalid or its
    /// payload does not fit, the returned descriptor is invalid; it is
    /// never truncated.
    pub fn serialize_with_max(&self, max_size: usize) -> RawDescriptor {
        if !self.is_valid() {
            debug!("{}: not serialized, descriptor is invalid", P::XML_NAME);
            return RawDescriptor::invalid();
        }

        let max_size = max_size.min(MAX_DESCRIPTOR_SIZE);
        if max_size < 2 {
            return RawDescriptor::invalid();
        }

        let mut data = vec![0u8; max_size];

        let (error, size) = {
            let mut buf = WriteCursor::new(&mut data[2..]);

            if let Some(etag) = P::EXTENDED_TAG {
                buf.write_u8(etag.0);
            }

            self.payload.serialize_payload(&mut buf);
            (buf.has_error() || !buf.is_byte_aligned(), buf.position())
        };

        if error {
            debug!(
                "{}: payload does not fit in {max_size} bytes",
                P::XML_NAME
            );
            return RawDescriptor::invalid();
        }

        data[0] = P::TAG.0;
        data[1] = size as u8;
        data.truncate(2 + size);

        RawDescriptor::from_bytes(data)
    }

    /// Decode a binary descriptor into this object.
    ///
    /// All fields are cleared first. On failure, the fields are left
    /// cleared and this descriptor is invalid. A descriptor with another tag
    /// (or extended tag) is reported as a type mismatch; see
    /// [`DeserializeError::is_type_mismatch()`].
    pub fn deserialize(&mut self, raw: &RawDescriptor) -> Result<(), DeserializeError> {
        self.clear();

        let result = self.deserialize_checked(raw);

        if let Err(err) = &result {
            self.payload = P::default();
            self.valid = false;

            if err.is_type_mismatch() {
                trace!("{}: {err}", P::XML_NAME);
            } else {
                debug!("{}: {err}", P::XML_NAME);
            }
        }

        result
    }

    fn deserialize_checked(&mut self, raw: &RawDescriptor) -> Result<(), DeserializeError> {
        if !raw.is_valid() {
            return Err(DeserializeError::InvalidBinary);
        }

        if raw.tag() != P::TAG {
            return Err(DeserializeError::TagMismatch {
                expected: P::TAG,
                found: raw.tag(),
            });
        }

        let mut buf = ReadCursor::new(raw.payload());

        if let Some(etag) = P::EXTENDED_TAG {
            let found = buf.read_u8();
            if buf.has_error() {
                return Err(DeserializeError::ExtendedTagMismatch {
                    expected: etag,
                    found: None,
                });
            }
            if found != etag.0 {
                return Err(DeserializeError::ExtendedTagMismatch {
                    expected: etag,
                    found: Some(Edid(found)),
                });
            }
        }

        self.payload.deserialize_payload(&mut buf);

        if buf.has_error() {
            Err(DeserializeError::Overflow)
        } else if !buf.at_end() {
            Err(DeserializeError::TrailingBytes(buf.remaining_bits().div_ceil(8)))
        } else {
            Ok(())
        }
    }

    /// Append an element named [`XML_NAME`] representing this descriptor
    /// to `parent`, and return it.
    ///
    /// Returns `None` (and adds nothing) if this descriptor is invalid.
    ///
    /// [`XML_NAME`]: DescriptorPayload::XML_NAME
    pub fn to_tree<'e>(&self, parent: &'e mut Element) -> Option<&'e mut Element> {
        if !self.is_valid() {
            return None;
        }

        let element = parent.add_child(P::XML_NAME);
        self.payload.build_tree(element);
        Some(element)
    }

    /// Build a standalone element named [`XML_NAME`] representing this
    /// descriptor.
    ///
    /// [`XML_NAME`]: DescriptorPayload::XML_NAME
    pub fn to_element(&self) -> Option<Element> {
        if !self.is_valid() {
            return None;
        }

        let mut element = Element::new(P::XML_NAME);
        self.payload.build_tree(&mut element);
        Some(element)
    }

    /// Populate this descriptor from a tree element named [`XML_NAME`] (or
    /// [`XML_LEGACY_NAME`]).
    ///
    /// All fields are cleared first. On failure, the fields are left
    /// cleared and this descriptor is invalid.
    ///
    /// [`XML_NAME`]: DescriptorPayload::XML_NAME
    /// [`XML_LEGACY_NAME`]: DescriptorPayload::XML_LEGACY_NAME
    pub fn analyze(&mut self, element: &Element) -> Result<(), TreeError> {
        self.clear();

        let result = Self::expect_name(element).and_then(|_| self.payload.analyze_tree(element));

        if let Err(err) = &result {
            debug!("{}: {err}", P::XML_NAME);
            self.payload = P::default();
            self.valid = false;
        }

        result
    }

    fn expect_name(element: &Element) -> Result<(), TreeError> {
        match P::XML_LEGACY_NAME {
            Some(legacy) if element.has_name(legacy) => Ok(()),
            _ => element.expect_name(P::XML_NAME),
        }
    }
}

impl<P: DescriptorPayload> Default for Descriptor<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: DescriptorPayload> From<P> for Descriptor<P> {
    fn from(payload: P) -> Self {
        Self::from_payload(payload)
    }
}

impl<P: DescriptorPayload> TryFrom<&RawDescriptor> for Descriptor<P> {
    type Error = DeserializeError;

    fn try_from(raw: &RawDescriptor) -> Result<Self, Self::Error> {
        let mut desc = Self::new();
        desc.deserialize(raw)?;
        Ok(desc)
    }
}

impl<P> Deref for Descriptor<P> {
    type Target = P;

    fn deref(&self) -> &P {
        &self.payload
    }
}

impl<P> DerefMut for Descriptor<P> {
    fn deref_mut(&mut self) -> &mut P {
        &mut self.payload
    }
}

/// Object-safe view of any typed descriptor.
///
/// This is what table-level code manipulates when the concrete type is
/// only known at run time, e.g. after a [`Registry`] lookup.
///
/// [`Registry`]: crate::Registry
pub trait AbstractDescriptor: Debug {
    /// Descriptor tag.
    fn tag(&self) -> Did;

    /// Extended tag, for extension descriptors only.
    fn extended_tag(&self) -> Option<Edid>;

    /// Private data specifier required by this descriptor, if any.
    fn required_pds(&self) -> Option<Pds>;

    /// Standards defining this descriptor.
    fn standards(&self) -> Standards;

    /// Element name in a textual tree.
    fn xml_name(&self) -> &'static str;

    /// Former element name, if any.
    fn xml_legacy_name(&self) -> Option<&'static str>;

    /// See [`Descriptor::is_valid()`].
    fn is_valid(&self) -> bool;

    /// See [`Descriptor::invalidate()`].
    fn invalidate(&mut self);

    /// See [`Descriptor::clear()`].
    fn clear(&mut self);

    /// See [`Descriptor::serialize_with_max()`].
    fn serialize_with_max(&self, max_size: usize) -> RawDescriptor;

    /// See [`Descriptor::deserialize()`].
    fn deserialize(&mut self, raw: &RawDescriptor) -> Result<(), DeserializeError>;

    /// See [`Descriptor::to_tree()`].
    fn to_tree<'e>(&self, parent: &'e mut Element) -> Option<&'e mut Element>;

    /// See [`Descriptor::analyze()`].
    fn analyze(&mut self, element: &Element) -> Result<(), TreeError>;

    /// Upcast for downcasting to a concrete [`Descriptor`].
    fn as_any(&self) -> &dyn Any;

    /// Upcast for downcasting to a concrete [`Descriptor`].
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// See [`Descriptor::serialize()`].
    fn serialize(&self) -> RawDescriptor {
        self.serialize_with_max(MAX_DESCRIPTOR_SIZE)
    }
}

impl<P: DescriptorPayload + 'static> AbstractDescriptor for Descriptor<P> {
    fn tag(&self) -> Did {
        P::TAG
    }

    fn extended_tag(&self) -> Option<Edid> {
        P::EXTENDED_TAG
    }

    fn required_pds(&self) -> Option<Pds> {
        P::REQUIRED_PDS
    }

    fn standards(&self) -> Standards {
        P::STANDARDS
    }

    fn xml_name(&self) -> &'static str {
        P::XML_NAME
    }

    fn xml_legacy_name(&self) -> Option<&'static str> {
        P::XML_LEGACY_NAME
    }

    fn is_valid(&self) -> bool {
        Descriptor::is_valid(self)
    }

    fn invalidate(&mut self) {
        Descriptor::invalidate(self)
    }

    fn clear(&mut self) {
        Descriptor::clear(self)
    }

    fn serialize_with_max(&self, max_size: usize) -> RawDescriptor {
        Descriptor::serialize_with_max(self, max_size)
    }

    fn deserialize(&mut self, raw: &RawDescriptor) -> Result<(), DeserializeError> {
        Descriptor::deserialize(self, raw)
    }

    fn to_tree<'e>(&self, parent: &'e mut Element) -> Option<&'e mut Element> {
        Descriptor::to_tree(self, parent)
    }

    fn analyze(&mut self, element: &Element) -> Result<(), TreeError> {
        Descriptor::analyze(self, element)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl dyn AbstractDescriptor {
    /// Downcast to a concrete typed descriptor.
    pub fn downcast_ref<P: DescriptorPayload + 'static>(&self) -> Option<&Descriptor<P>> {
        self.as_any().downcast_ref()
    }

    /// Downcast to a concrete typed descriptor.
    pub fn downcast_mut<P: DescriptorPayload + 'static>(&mut self) -> Option<&mut Descriptor<P>> {
        self.as_any_mut().downcast_mut()
    }
}
