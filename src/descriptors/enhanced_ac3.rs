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

use crate::{
    cursor::{ReadCursor, WriteCursor},
    error::TreeError,
    tag::{Did, Standards, MAX_PAYLOAD_SIZE},
    tree::Element,
    DescriptorPayload,
};

/// DVB `enhanced_AC-3_descriptor` (ETSI EN 300 468, D.5).
///
/// All fields except `mixinfoexists` are optional; a leading flags byte
/// tells which ones are present.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EnhancedAc3Descriptor {
    pub component_type: Option<u8>,
    pub bsid: Option<u8>,
    pub mainid: Option<u8>,
    pub asvc: Option<u8>,
    pub mixinfoexists: bool,
    pub substream1: Option<u8>,
    pub substream2: Option<u8>,
    pub substream3: Option<u8>,
    pub additional_info: Vec<u8>,
}

impl EnhancedAc3Descriptor {
    // Optional fields, in wire order.
    fn optional_fields(&self) -> [Option<u8>; 7] {
        [
            self.component_type,
            self.bsid,
            self.mainid,
            self.asvc,
            self.substream1,
            self.substream2,
            self.substream3,
        ]
    }

    fn optional_fields_mut(&mut self) -> [&mut Option<u8>; 7] {
        [
            &mut self.component_type,
            &mut self.bsid,
            &mut self.mainid,
            &mut self.asvc,
            &mut self.substream1,
            &mut self.substream2,
            &mut self.substream3,
        ]
    }

    /// Fill the fields which are unset in `self` from `other`.
    ///
    /// Used to combine the audio properties of one component signalled
    /// in several tables (e.g. PMT and SDT).
    pub fn merge(&mut self, other: &Self) {
        let values = other.optional_fields();
        for (field, value) in self.optional_fields_mut().into_iter().zip(values) {
            if field.is_none() {
                *field = value;
            }
        }
        self.mixinfoexists |= other.mixinfoexists;
        if self.additional_info.is_empty() {
            self.additional_info.clone_from(&other.additional_info);
        }
    }
}

const FIELD_NAMES: [&str; 7] = [
    "component_type",
    "bsid",
    "mainid",
    "asvc",
    "substream1",
    "substream2",
    "substream3",
];

impl DescriptorPayload for EnhancedAc3Descriptor {
    const TAG: Did = Did::ENHANCED_AC3;
    const XML_NAME: &'static str = "DVB_enhanced_AC3_descriptor";
    const XML_LEGACY_NAME: Option<&'static str> = Some("enhanced_AC3_descriptor");
    const STANDARDS: Standards = Standards::DVB;

    fn serialize_payload(&self, buf: &mut WriteCursor<'_>) {
        let [component_type, bsid, mainid, asvc, substream1, substream2, substream3] =
            self.optional_fields();

        buf.write_bit(component_type.is_some());
        buf.write_bit(bsid.is_some());
        buf.write_bit(mainid.is_some());
        buf.write_bit(asvc.is_some());
        buf.write_bit(self.mixinfoexists);
        buf.write_bit(substream1.is_some());
        buf.write_bit(substream2.is_some());
        buf.write_bit(substream3.is_some());

        for value in self.optional_fields().into_iter().flatten() {
            buf.write_u8(value);
        }

        buf.write_bytes(&self.additional_info);
    }

    fn deserialize_payload(&mut self, buf: &mut ReadCursor<'_>) {
        let component_type = buf.read_bit();
        let bsid = buf.read_bit();
        let mainid = buf.read_bit();
        let asvc = buf.read_bit();
        self.mixinfoexists = buf.read_bit();
        let substream1 = buf.read_bit();
        let substream2 = buf.read_bit();
        let substream3 = buf.read_bit();

        let present = [
            component_type,
            bsid,
            mainid,
            asvc,
            substream1,
            substream2,
            substream3,
        ];

        for (field, present) in self.optional_fields_mut().into_iter().zip(present) {
            if present {
                *field = Some(buf.read_u8());
            }
        }

        self.additional_info = buf.read_remaining_bytes().to_vec();
    }

    fn build_tree(&self, element: &mut Element) {
        for (name, value) in FIELD_NAMES.iter().zip(self.optional_fields()) {
            element.set_optional_int_attribute(name, value, true);
        }
        element.set_bool_attribute("mixinfoexists", self.mixinfoexists);
        element.add_hexa_child("additional_info", &self.additional_info);
    }

    fn analyze_tree(&mut self, element: &Element) -> Result<(), TreeError> {
        for (name, field) in FIELD_NAMES.iter().zip(self.optional_fields_mut()) {
            *field = element.optional_int_attribute(name, 0, u8::MAX)?;
        }
        self.mixinfoexists = element.bool_attribute("mixinfoexists", true, false)?;
        // The combined size is checked on serialization.
        self.additional_info = element.hexa_child("additional_info", 0, MAX_PAYLOAD_SIZE - 1)?;
        Ok(())
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
        descriptors::EnhancedAc3Descriptor,
        error::TreeError,
        tag::{Did, MAX_PAYLOAD_SIZE},
        tree::Element,
        Descriptor, RawDescriptor,
    };

    fn sample() -> EnhancedAc3Descriptor {
        EnhancedAc3Descriptor {
            component_type: Some(0x42),
            bsid: None,
            mainid: Some(0x01),
            asvc: None,
            mixinfoexists: true,
            substream1: None,
            substream2: None,
            substream3: Some(0x07),
            additional_info: hex!("deadbeef").to_vec(),
        }
    }

    #[test]
    fn binary() {
        let desc = Descriptor::from(sample());
        let raw = desc.serialize();

        assert_eq!(
            raw.as_bytes(),
            &hex!(
                "7a08" // tag, length
                "a9" // flags = 1010 1001
                "42" // component_type
                "01" // mainid
                "07" // substream3
                "deadbeef" // additional_info
            )
        );

        let decoded = Descriptor::<EnhancedAc3Descriptor>::try_from(&raw).unwrap();
        assert_eq!(decoded, desc);
    }

    #[test]
    fn flags_only() {
        let raw = RawDescriptor::from_bytes(hex!("7a01 08").to_vec());
        let desc = Descriptor::<EnhancedAc3Descriptor>::try_from(&raw).unwrap();
        assert!(desc.mixinfoexists);
        assert_eq!(desc.component_type, None);
        assert!(desc.additional_info.is_empty());
    }

    #[test]
    fn missing_flagged_field() {
        // component_type and bsid flagged, only one byte follows.
        let raw = RawDescriptor::from_bytes(hex!("7a02 c0 42").to_vec());
        let desc = Descriptor::<EnhancedAc3Descriptor>::from_raw(&raw);
        assert!(!desc.is_valid());
        assert_eq!(*desc.payload(), EnhancedAc3Descriptor::default());
    }

    #[test]
    fn empty_payload() {
        let raw = RawDescriptor::from_bytes(hex!("7a00").to_vec());
        assert!(!Descriptor::<EnhancedAc3Descriptor>::from_raw(&raw).is_valid());
    }

    #[test]
    fn tree() {
        let desc = Descriptor::from(sample());
        let element = desc.to_element().unwrap();

        assert_eq!(element.attribute("component_type"), Some("0x42"));
        assert_eq!(element.attribute("bsid"), None);
        assert_eq!(element.attribute("mixinfoexists"), Some("true"));
        assert_eq!(element.child("additional_info").unwrap().text(), Some("DEADBEEF"));

        let decoded = Descriptor::<EnhancedAc3Descriptor>::from_tree(&element).unwrap();
        assert_eq!(decoded, desc);
    }

    #[test]
    fn tree_with_longest_additional_info() {
        // Only the flags byte precedes the additional info.
        let mut payload = vec![0x08];
        payload.extend_from_slice(&[0xaa; MAX_PAYLOAD_SIZE - 1]);
        let raw = RawDescriptor::new(Did::ENHANCED_AC3, &payload);

        let desc = Descriptor::<EnhancedAc3Descriptor>::try_from(&raw).unwrap();
        assert_eq!(desc.additional_info.len(), 254);
        assert_eq!(desc.serialize(), raw);

        let element = desc.to_element().unwrap();
        let decoded = Descriptor::<EnhancedAc3Descriptor>::from_tree(&element).unwrap();
        assert_eq!(decoded, desc);
        assert_eq!(decoded.serialize(), raw);
    }

    #[test]
    fn tree_with_oversized_content() {
        // Valid in the tree, too large once the optional fields are added.
        let mut element = Element::new("DVB_enhanced_AC3_descriptor");
        element.set_attribute("component_type", "0x42");
        element.set_bool_attribute("mixinfoexists", false);
        element.add_hexa_child("additional_info", &[0xaa; 254]);

        let desc = Descriptor::<EnhancedAc3Descriptor>::from_tree(&element).unwrap();
        assert!(!desc.serialize().is_valid());
    }

    #[test]
    fn legacy_name() {
        let mut element = Element::new("enhanced_AC3_descriptor");
        element.set_attribute("bsid", "0x10");
        element.set_bool_attribute("mixinfoexists", false);

        let desc = Descriptor::<EnhancedAc3Descriptor>::from_tree(&element).unwrap();
        assert_eq!(desc.bsid, Some(0x10));

        // Trees are always built with the current name.
        assert_eq!(
            desc.to_element().unwrap().name(),
            "DVB_enhanced_AC3_descriptor"
        );
    }

    #[test]
    fn tree_requires_mixinfoexists() {
        let element = Element::new("enhanced_AC3_descriptor");
        assert_eq!(
            Descriptor::<EnhancedAc3Descriptor>::from_tree(&element).unwrap_err(),
            TreeError::MissingAttribute {
                element: "enhanced_AC3_descriptor".to_string(),
                attribute: "mixinfoexists".to_string(),
            }
        );
    }

    #[test]
    fn merge() {
        let mut pmt = EnhancedAc3Descriptor {
            component_type: Some(0x42),
            ..Default::default()
        };
        let sdt = EnhancedAc3Descriptor {
            component_type: Some(0x44),
            mainid: Some(0x01),
            mixinfoexists: true,
            substream2: Some(0x09),
            additional_info: hex!("0102").to_vec(),
            ..Default::default()
        };

        pmt.merge(&sdt);

        assert_eq!(
            pmt,
            EnhancedAc3Descriptor {
                component_type: Some(0x42),
                bsid: None,
                mainid: Some(0x01),
                asvc: None,
                mixinfoexists: true,
                substream1: None,
                substream2: Some(0x09),
                substream3: None,
                additional_info: hex!("0102").to_vec(),
            }
        );
    }

    #[test]
    fn merge_keeps_own_additional_info() {
        let mut desc = sample();
        desc.merge(&EnhancedAc3Descriptor {
            bsid: Some(0x10),
            additional_info: hex!("ff").to_vec(),
            ..Default::default()
        });

        assert_eq!(desc.bsid, Some(0x10));
        assert_eq!(desc.additional_info, hex!("deadbeef").to_vec());
        assert_eq!(desc.component_type, Some(0x42));
    }
}
