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

//! In-memory textual tree used to inspect and edit descriptors.
//!
//! An [`Element`] has a name, an ordered set of string attributes, an
//! ordered list of child elements and an optional text content. Reading
//! and writing the tree syntax itself is the job of an external
//! parser/serializer; descriptors only ever interact with an already
//! built [`Element`].
//!
//! Attribute and element names are matched case-insensitively.
//!
//! ```
//! use tsdesc::tree::Element;
//!
//! let mut root = Element::new("root");
//! let child = root.add_child("item");
//! child.set_int_attribute("id", 0x1234u16, true);
//! child.set_bool_attribute("visible", true);
//!
//! let item = root.child("ITEM").unwrap();
//! assert_eq!(item.attribute("id"), Some("0x1234"));
//! assert_eq!(item.int_attribute::<u16>("Id", true, 0, 0, 0xFFFF), Ok(0x1234));
//! assert_eq!(item.bool_attribute("visible", true, false), Ok(true));
//! ```

use std::fmt::{Display, UpperHex};

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while_m_n},
    character::complete::{char, digit1, hex_digit1, multispace0},
    combinator::{all_consuming, map_res, opt, recognize},
    multi::{many0, many1},
    sequence::{delimited, preceded},
    IResult,
};

use crate::{debug::hex_string, error::TreeError};

/// Integer types usable as tree attribute values.
pub trait IntAttribute: Copy + Display + UpperHex + Into<i128> + TryFrom<i128> {}

impl<T> IntAttribute for T where T: Copy + Display + UpperHex + Into<i128> + TryFrom<i128> {}

/// A node of a textual tree.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: Option<String>,
}

impl Element {
    /// Create an element with no attributes, children or text.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if this element is named `name` (ignoring case).
    pub fn has_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            Some((_, v)) => *v = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    /// Value of an attribute, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if the attribute is present.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// All attributes, in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Append a new, empty child element and return it.
    pub fn add_child(&mut self, name: impl Into<String>) -> &mut Element {
        self.children.push(Element::new(name));
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Append an existing element as a child.
    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Child elements named `name`, in order.
    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.has_name(name))
    }

    /// All child elements, in order.
    pub fn all_children(&self) -> &[Element] {
        &self.children
    }

    /// First child element named `name`.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.has_name(name))
    }

    /// Text content.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Set the text content.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Set an integer attribute, in decimal or in zero-padded
    /// hexadecimal.
    pub fn set_int_attribute<T: IntAttribute>(&mut self, name: &str, value: T, hexa: bool) {
        let value = if hexa {
            let width = 2 * std::mem::size_of::<T>();
            format!("0x{value:0width$X}")
        } else {
            value.to_string()
        };
        self.set_attribute(name, value);
    }

    /// Set an integer attribute if `value` is `Some`.
    pub fn set_optional_int_attribute<T: IntAttribute>(
        &mut self,
        name: &str,
        value: Option<T>,
        hexa: bool,
    ) {
        if let Some(value) = value {
            self.set_int_attribute(name, value, hexa);
        }
    }

    /// Set a boolean attribute.
    pub fn set_bool_attribute(&mut self, name: &str, value: bool) {
        self.set_attribute(name, if value { "true" } else { "false" });
    }

    /// Read an integer attribute.
    ///
    /// Values may be decimal or `0x`-prefixed hexadecimal, and may use `,`
    /// or `_` as digit separators. If the attribute is absent, returns
    /// `default` unless `required` is set.
    pub fn int_attribute<T: IntAttribute>(
        &self,
        name: &str,
        required: bool,
        default: T,
        min: T,
        max: T,
    ) -> Result<T, TreeError> {
        match self.optional_int_attribute(name, min, max)? {
            Some(value) => Ok(value),
            None if required => Err(self.missing(name)),
            None => Ok(default),
        }
    }

    /// Read an optional integer attribute.
    pub fn optional_int_attribute<T: IntAttribute>(
        &self,
        name: &str,
        min: T,
        max: T,
    ) -> Result<Option<T>, TreeError> {
        let Some(text) = self.attribute(name) else {
            return Ok(None);
        };

        let value = parse_integer(text).ok_or_else(|| self.invalid(name, text))?;

        if value < min.into() || value > max.into() {
            return Err(TreeError::OutOfRange {
                element: self.name.clone(),
                attribute: name.to_string(),
                value: text.to_string(),
                min: min.to_string(),
                max: max.to_string(),
            });
        }

        T::try_from(value)
            .map(Some)
            .map_err(|_| self.invalid(name, text))
    }

    /// Read a boolean attribute.
    ///
    /// Accepts `true`, `false`, `yes`, `no`, `on`, `off`, `1` and `0`.
    pub fn bool_attribute(
        &self,
        name: &str,
        required: bool,
        default: bool,
    ) -> Result<bool, TreeError> {
        let Some(text) = self.attribute(name) else {
            return if required {
                Err(self.missing(name))
            } else {
                Ok(default)
            };
        };

        match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(self.invalid(name, text)),
        }
    }

    /// Read an optional string attribute whose length in characters must
    /// be within `min_len..=max_len`.
    pub fn optional_string_attribute(
        &self,
        name: &str,
        min_len: usize,
        max_len: usize,
    ) -> Result<Option<String>, TreeError> {
        let Some(text) = self.attribute(name) else {
            return Ok(None);
        };

        let len = text.chars().count();
        if len < min_len || len > max_len {
            return Err(TreeError::InvalidLength {
                element: self.name.clone(),
                what: format!("attribute '{name}'"),
                len,
                min: min_len,
                max: max_len,
            });
        }

        Ok(Some(text.to_string()))
    }

    /// Read a required string attribute whose length in characters must
    /// be within `min_len..=max_len`.
    pub fn string_attribute(
        &self,
        name: &str,
        min_len: usize,
        max_len: usize,
    ) -> Result<String, TreeError> {
        self.optional_string_attribute(name, min_len, max_len)?
            .ok_or_else(|| self.missing(name))
    }

    /// Set the text content to the hexadecimal representation of `data`.
    pub fn set_hexa_text(&mut self, data: &[u8]) {
        self.set_text(hex_string(data));
    }

    /// Decode the text content as hexadecimal bytes, whose count must be
    /// within `min_len..=max_len`. Whitespace between bytes is ignored.
    ///
    /// A missing text content is an empty byte block.
    pub fn hexa_text(&self, min_len: usize, max_len: usize) -> Result<Vec<u8>, TreeError> {
        let text = self.text().unwrap_or_default();
        let data = parse_hexa(text).ok_or_else(|| TreeError::InvalidValue {
            element: self.name.clone(),
            attribute: "#text".to_string(),
            value: text.to_string(),
        })?;

        if data.len() < min_len || data.len() > max_len {
            return Err(TreeError::InvalidLength {
                element: self.name.clone(),
                what: "hexadecimal content".to_string(),
                len: data.len(),
                min: min_len,
                max: max_len,
            });
        }

        Ok(data)
    }

    /// Add a child with hexadecimal text content, unless `data` is empty.
    pub fn add_hexa_child(&mut self, name: &str, data: &[u8]) {
        if !data.is_empty() {
            self.add_child(name).set_hexa_text(data);
        }
    }

    /// Decode the hexadecimal content of an optional unique child element.
    ///
    /// Returns an empty byte block if the child is absent.
    pub fn hexa_child(
        &self,
        name: &str,
        min_len: usize,
        max_len: usize,
    ) -> Result<Vec<u8>, TreeError> {
        let children: Vec<&Element> = self.children(name).collect();
        match children.as_slice() {
            [] => Ok(Vec::new()),
            [child] => child.hexa_text(min_len, max_len),
            _ => Err(TreeError::ChildCount {
                element: self.name.clone(),
                child: name.to_string(),
                found: children.len(),
                min: 0,
                max: 1,
            }),
        }
    }

    /// Check that this element is named `name`.
    pub fn expect_name(&self, name: &str) -> Result<(), TreeError> {
        if self.has_name(name) {
            Ok(())
        } else {
            Err(TreeError::UnexpectedElement {
                expected: name.to_string(),
                found: self.name.clone(),
            })
        }
    }

    fn missing(&self, attribute: &str) -> TreeError {
        TreeError::MissingAttribute {
            element: self.name.clone(),
            attribute: attribute.to_string(),
        }
    }

    fn invalid(&self, attribute: &str, value: &str) -> TreeError {
        TreeError::InvalidValue {
            element: self.name.clone(),
            attribute: attribute.to_string(),
            value: value.to_string(),
        }
    }
}

// Digits with optional ',' or '_' separators, in the given radix.
fn digits_with_separators<'a>(
    digits: fn(&'a str) -> IResult<&'a str, &'a str>,
    radix: u32,
) -> impl FnMut(&'a str) -> IResult<&'a str, i128> {
    map_res(
        recognize(many1(alt((digits, tag(","), tag("_"))))),
        move |s: &str| {
            let clean: String = s.chars().filter(|c| c.is_ascii_hexdigit()).collect();
            i128::from_str_radix(&clean, radix)
        },
    )
}

fn integer(i: &str) -> IResult<&str, i128> {
    let (i, neg) = opt(char('-'))(i)?;
    let (i, value) = alt((
        preceded(tag_no_case("0x"), digits_with_separators(hex_digit1, 16)),
        digits_with_separators(digit1, 10),
    ))(i)?;

    Ok((i, if neg.is_some() { -value } else { value }))
}

pub(crate) fn parse_integer(text: &str) -> Option<i128> {
    all_consuming(delimited(multispace0, integer, multispace0))(text)
        .ok()
        .map(|(_, value)| value)
}

fn hexa_byte(i: &str) -> IResult<&str, u8> {
    map_res(
        take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()),
        |s: &str| u8::from_str_radix(s, 16),
    )(i)
}

pub(crate) fn parse_hexa(text: &str) -> Option<Vec<u8>> {
    all_consuming(preceded(
        multispace0,
        many0(delimited(multispace0, hexa_byte, multispace0)),
    ))(text)
    .ok()
    .map(|(_, data)| data)
}
