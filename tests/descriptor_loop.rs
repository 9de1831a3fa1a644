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

#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]

use hex_literal::hex;
use pretty_assertions_sorted::assert_eq;
use tsdesc::{
    descriptors::{
        EnhancedAc3Descriptor, LogicalChannelNumberDescriptor, LogicalChannelNumberEntry,
        PrivateDataSpecifierDescriptor, SupplementaryAudioDescriptor,
    },
    tree::Element,
    AbstractDescriptor, Descriptor, DescriptorList, Did, Edid, ListError, Pds, RawDescriptor,
    Registry,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// An ES_info loop of an audio component followed by an SDT-like private
// loop.
const LOOP: [u8; 29] = hex!(
    "7a03" // DVB_enhanced_AC3_descriptor
    "80" // component_type present
    "42" // component_type
    "0a" // additional_info
    "7f06 06 87 656e67 aa" // supplementary_audio_descriptor
    "5f04 00000028" // private_data_specifier_descriptor (EACEM)
    "8308 0101fc01 0102 7fe8" // logical_channel_number_descriptor
);

#[test]
fn decode_loop() {
    init_logger();

    let list = DescriptorList::from_slice(&LOOP);
    assert_eq!(list.count(), 4);
    assert_eq!(list.binary_size(), LOOP.len());
    assert!(list.iter().all(RawDescriptor::is_valid));

    let (_, ac3) = list.find::<EnhancedAc3Descriptor>(0).unwrap();
    assert_eq!(ac3.component_type, Some(0x42));
    assert_eq!(ac3.additional_info, vec![0x0a]);

    let index = list
        .search_extension(Did::DVB_EXTENSION, Edid::SUPPLEMENTARY_AUDIO, 0)
        .unwrap();
    let mut audio = Descriptor::<SupplementaryAudioDescriptor>::new();
    list.deserialize_typed(index, &mut audio).unwrap();
    assert_eq!(audio.language_code.as_deref(), Some("eng"));

    assert_eq!(list.private_data_specifier(3), Some(Pds::EACEM));
    let (index, lcn) = list.find::<LogicalChannelNumberDescriptor>(0).unwrap();
    assert_eq!(index, 3);
    assert_eq!(
        lcn.entries,
        vec![
            LogicalChannelNumberEntry {
                service_id: 0x0101,
                visible: true,
                lcn: 1,
            },
            LogicalChannelNumberEntry {
                service_id: 0x0102,
                visible: false,
                lcn: 1000,
            },
        ]
    );

    assert_eq!(&list.serialize_all(LOOP.len()).unwrap()[..], &LOOP[..]);
}

#[test]
fn registry_dispatch() {
    init_logger();

    let list = DescriptorList::from_slice(&LOOP);
    let decoded = list.decode_all(&Registry::with_defaults());

    let names: Vec<&str> = decoded
        .iter()
        .map(|desc| desc.as_ref().unwrap().xml_name())
        .collect();
    assert_eq!(
        names,
        vec![
            "DVB_enhanced_AC3_descriptor",
            "supplementary_audio_descriptor",
            "private_data_specifier_descriptor",
            "eacem_logical_channel_number_descriptor",
        ]
    );

    // Re-encoding every decoded descriptor gives the original loop.
    let rebuilt: DescriptorList = decoded
        .iter()
        .map(|desc| desc.as_ref().unwrap().serialize())
        .collect();
    assert_eq!(rebuilt, list);
}

#[test]
fn private_tag_without_specifier_is_not_decoded() {
    init_logger();

    // Same LCN bytes, no private data specifier.
    let list = DescriptorList::from_slice(&hex!("8304 0101fc01"));
    assert_eq!(list.search(Did(0x83), 0), Some(0));
    assert_eq!(list.search_pds(Did(0x83), Pds::EACEM, 0), None);
    assert!(list.find::<LogicalChannelNumberDescriptor>(0).is_none());
    assert!(list.decode_all(&Registry::with_defaults())[0].is_none());
}

#[test]
fn truncated_loop() {
    init_logger();

    let list = DescriptorList::from_slice(&LOOP[..LOOP.len() - 1]);
    assert_eq!(list.count(), 4);
    assert!(!list[3].is_valid());
    assert!(list.find::<LogicalChannelNumberDescriptor>(0).is_none());
    assert!(list.serialize_all(1024).is_err());
}

#[test]
fn build_loop_through_tree() {
    init_logger();

    let mut root = Element::new("descriptors");

    let pds = Descriptor::from(PrivateDataSpecifierDescriptor::new(Pds::EACEM));
    pds.to_tree(&mut root).unwrap();

    let service = root
        .add_child("eacem_logical_channel_number_descriptor")
        .add_child("service");
    service.set_attribute("service_id", "0x0101");
    service.set_attribute("logical_channel_number", "1");

    let registry = Registry::with_defaults();
    let mut list = DescriptorList::new();
    let mut active = None;

    for element in root.all_children() {
        let mut desc: Box<dyn AbstractDescriptor> = match element.name() {
            "private_data_specifier_descriptor" => {
                Box::new(Descriptor::<PrivateDataSpecifierDescriptor>::new())
            }
            _ => registry.lookup(Did(0x83), None, active).unwrap()(),
        };
        desc.analyze(element).unwrap();

        if let Some(pds) = desc.downcast_ref::<PrivateDataSpecifierDescriptor>() {
            active = Some(Pds(pds.pds));
        }
        assert!(list.append_typed(desc.as_ref()));
    }

    assert_eq!(
        &list.serialize_all(1024).unwrap()[..],
        &hex!("5f04 00000028 8304 0101fc01")
    );
}

#[test]
fn oversized_list_is_rejected_whole() {
    init_logger();

    let list: DescriptorList = (0..4)
        .map(|_| RawDescriptor::new(Did(0x80), &[0xff; 100]))
        .collect();

    assert_eq!(list.serialize_all(408).unwrap().len(), 408);
    assert_eq!(
        list.serialize_all(400).unwrap_err(),
        ListError::Overflow {
            required: 408,
            max: 400,
        }
    );
}
