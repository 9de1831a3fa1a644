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
    tag::{Did, Pds, Standards, MAX_PAYLOAD_SIZE},
    tree::Element,
    DescriptorPayload,
};

// Each entry is 4 bytes on the wire.
const MAX_ENTRIES: usize = MAX_PAYLOAD_SIZE / 4;

/// One service of a [`LogicalChannelNumberDescriptor`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LogicalChannelNumberEntry {
    pub service_id: u16,
    pub visible: bool,

    /// 10 bits.
    pub lcn: u16,
}

/// EACEM `logical_channel_number_descriptor` (IEC/CENELEC 62 216).
///
/// This is a private descriptor: tag 0x83 only has this meaning after a
/// `private_data_specifier_descriptor` declaring [`Pds::EACEM`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LogicalChannelNumberDescriptor {
    pub entries: Vec<LogicalChannelNumberEntry>,
}

impl DescriptorPayload for LogicalChannelNumberDescriptor {
    const TAG: Did = Did::LOGICAL_CHANNEL_NUMBER;
    const XML_NAME: &'static str = "eacem_logical_channel_number_descriptor";
    const STANDARDS: Standards = Standards::DVB;
    const REQUIRED_PDS: Option<Pds> = Some(Pds::EACEM);

    fn serialize_payload(&self, buf: &mut WriteCursor<'_>) {
        for entry in &self.entries {
            buf.write_u16(entry.service_id);
            buf.write_bit(entry.visible);
            buf.write_reserved_bits(5);
            buf.write_bits(10, entry.lcn);
        }
    }

    fn deserialize_payload(&mut self, buf: &mut ReadCursor<'_>) {
        while !buf.at_end() && !buf.has_error() {
            let service_id = buf.read_u16();
            let visible = buf.read_bit();
            buf.skip_reserved_bits(5);
            let lcn = buf.read_bits(10);

            self.entries.push(LogicalChannelNumberEntry {
                service_id,
                visible,
                lcn,
            });
        }
    }

    fn build_tree(&self, element: &mut Element) {
        for entry in &self.entries {
            let service = element.add_child("service");
            service.set_int_attribute("service_id", entry.service_id, true);
            service.set_int_attribute("logical_channel_number", entry.lcn, false);
            service.set_bool_attribute("visible_service", entry.visible);
        }
    }

    fn analyze_tree(&mut self, element: &Element) -> Result<(), TreeError> {
        let services: Vec<&Element> = element.children("service").collect();
        if services.len() > MAX_ENTRIES {
            return Err(TreeError::ChildCount {
                element: element.name().to_string(),
                child: "service".to_string(),
                found: services.len(),
                min: 0,
                max: MAX_ENTRIES,
            });
        }

        for service in services {
            self.entries.push(LogicalChannelNumberEntry {
                service_id: service.int_attribute("service_id", true, 0, 0, u16::MAX)?,
                lcn: service.int_attribute("logical_channel_number", true, 0, 0, 0x3FF)?,
                visible: service.bool_attribute("visible_service", false, true)?,
            });
        }

        Ok(())
    }

    fn is_content_valid(&self) -> bool {
        self.entries.len() <= MAX_ENTRIES && self.entries.iter().all(|e| e.lcn <= 0x3FF)
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
        descriptors::{LogicalChannelNumberDescriptor, LogicalChannelNumberEntry},
        error::DeserializeError,
        tree::Element,
        Descriptor, RawDescriptor,
    };

    fn sample() -> LogicalChannelNumberDescriptor {
        LogicalChannelNumberDescriptor {
            entries: vec![
                LogicalChannelNumberEntry {
                    service_id: 0x0101,
                    visible: true,
                    lcn: 1,
                },
                LogicalChannelNumberEntry {
                    service_id: 0x0102,
                    visible: false,
                    lcn: 0x3e8,
                },
            ],
        }
    }

    #[test]
    fn binary() {
        let desc = Descriptor::from(sample());
        let raw = desc.serialize();

        assert_eq!(
            raw.as_bytes(),
            &hex!(
                "8308" // tag, length
                "0101 fc01" // service 0x0101, visible, lcn 1
                "0102 7fe8" // service 0x0102, hidden, lcn 1000
            )
        );

        let decoded = Descriptor::<LogicalChannelNumberDescriptor>::try_from(&raw).unwrap();
        assert_eq!(decoded, desc);
    }

    #[test]
    fn empty() {
        let raw = RawDescriptor::from_bytes(hex!("8300").to_vec());
        let desc = Descriptor::<LogicalChannelNumberDescriptor>::try_from(&raw).unwrap();
        assert!(desc.entries.is_empty());
    }

    #[test]
    fn partial_entry() {
        let raw = RawDescriptor::from_bytes(hex!("8306 0101fc01 0102").to_vec());
        assert_eq!(
            Descriptor::<LogicalChannelNumberDescriptor>::try_from(&raw).unwrap_err(),
            DeserializeError::Overflow
        );
    }

    #[test]
    fn too_many_entries() {
        let entry = LogicalChannelNumberEntry {
            service_id: 1,
            visible: true,
            lcn: 1,
        };

        let desc = Descriptor::from(LogicalChannelNumberDescriptor {
            entries: vec![entry; 63],
        });
        assert!(desc.serialize().is_valid());

        let desc = Descriptor::from(LogicalChannelNumberDescriptor {
            entries: vec![entry; 64],
        });
        assert!(!desc.serialize().is_valid());
    }

    #[test]
    fn tree() {
        let desc = Descriptor::from(sample());
        let element = desc.to_element().unwrap();
        assert_eq!(element.children("service").count(), 2);

        let decoded = Descriptor::<LogicalChannelNumberDescriptor>::from_tree(&element).unwrap();
        assert_eq!(decoded, desc);
    }

    #[test]
    fn tree_visible_defaults_to_true() {
        let mut element = Element::new("eacem_logical_channel_number_descriptor");
        let service = element.add_child("service");
        service.set_attribute("service_id", "0x0200");
        service.set_attribute("logical_channel_number", "12");

        let decoded = Descriptor::<LogicalChannelNumberDescriptor>::from_tree(&element).unwrap();
        assert_eq!(
            decoded.entries,
            vec![LogicalChannelNumberEntry {
                service_id: 0x200,
                visible: true,
                lcn: 12,
            }]
        );
    }
}
