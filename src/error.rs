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

use thiserror::Error;

use crate::tag::{Did, Edid};

/// Reasons why a binary descriptor could not be decoded into a typed
/// descriptor.
///
/// Whatever the reason, the typed descriptor is left cleared and invalid.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum DeserializeError {
    /// The binary descriptor is structurally invalid.
    #[error("binary descriptor is invalid")]
    InvalidBinary,

    /// The binary descriptor has a different tag.
    ///
    /// This is the expected outcome of a tag-dispatch search and is not a
    /// malformation.
    #[error("descriptor tag {found:?} does not match expected tag {expected:?}")]
    TagMismatch { expected: Did, found: Did },

    /// The binary descriptor is an extension descriptor with a different
    /// (or missing) extended tag.
    #[error("extended tag {found:?} does not match expected extended tag {expected:?}")]
    ExtendedTagMismatch {
        expected: Edid,
        found: Option<Edid>,
    },

    /// The payload is shorter than its declared fields.
    #[error("payload too short for its declared content")]
    Overflow,

    /// The payload has bytes left over after all fields were read.
    #[error("{0} extraneous byte(s) after payload content")]
    TrailingBytes(usize),
}

impl DeserializeError {
    /// Returns `true` if the binary descriptor simply belongs to another
    /// descriptor type, as opposed to being malformed.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(
            self,
            Self::TagMismatch { .. } | Self::ExtendedTagMismatch { .. }
        )
    }
}

/// Errors reported by [`DescriptorList`] serialization.
///
/// [`DescriptorList`]: crate::DescriptorList
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ListError {
    /// The serialized list does not fit in the space allowed by the caller.
    #[error("descriptor list requires {required} bytes (max: {max})")]
    Overflow { required: usize, max: usize },

    /// The list contains an invalid descriptor at the given index.
    #[error("invalid descriptor at index {0}")]
    InvalidDescriptor(usize),
}

/// Errors reported while analyzing a textual tree.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TreeError {
    /// A required attribute is absent.
    #[error("<{element}>: missing attribute '{attribute}'")]
    MissingAttribute { element: String, attribute: String },

    /// An attribute value cannot be parsed.
    #[error("<{element}>: invalid value '{value}' for attribute '{attribute}'")]
    InvalidValue {
        element: String,
        attribute: String,
        value: String,
    },

    /// A numeric attribute value is outside its allowed range.
    #[error("<{element}>: value {value} for attribute '{attribute}' is out of range {min}..={max}")]
    OutOfRange {
        element: String,
        attribute: String,
        value: String,
        min: String,
        max: String,
    },

    /// A string or binary value has a length outside its allowed range.
    #[error("<{element}>: {what} has {len} bytes, must be {min}..={max}")]
    InvalidLength {
        element: String,
        what: String,
        len: usize,
        min: usize,
        max: usize,
    },

    /// The element does not have the expected name.
    #[error("expected element <{expected}>, found <{found}>")]
    UnexpectedElement { expected: String, found: String },

    /// A required child element is absent, or appears too many times.
    #[error("<{element}>: expected {min}..={max} <{child}> element(s), found {found}")]
    ChildCount {
        element: String,
        child: String,
        found: usize,
        min: usize,
        max: usize,
    },
}
