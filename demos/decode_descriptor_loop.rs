//! Example: Decode a descriptor loop from an in-memory byte slice.
//!
//! Every descriptor is dispatched through a `Registry`, which picks the
//! typed descriptor from the tag, the extended tag and the private data
//! specifier active at that point of the loop.
//!
//! Set `RUST_LOG=debug` to see why a descriptor fails to decode.

use hex_literal::hex;
use tsdesc::{descriptors::LogicalChannelNumberDescriptor, DescriptorList, Registry};

fn main() {
    env_logger::init();

    // A descriptor loop, as found in a PMT or SDT.
    let data = hex!(
        "7a03" // DVB_enhanced_AC3_descriptor
            "80" // component_type present
            "42" // component_type
            "0a" // additional_info
        "7f06" // extension descriptor
            "06" // supplementary_audio_descriptor
            "87" // mix_type, editorial_classification, language present
            "656e67" // "eng"
            "aa" // private data
        "5f04" // private_data_specifier_descriptor
            "00000028" // EACEM
        "8308" // logical_channel_number_descriptor
            "0101fc01" // service 0x0101, visible, LCN 1
            "01027fe8" // service 0x0102, hidden, LCN 1000
        "0a05 0102" // truncated
    );

    let list = DescriptorList::from_slice(&data);
    println!("Descriptor loop: {} descriptors, {} bytes", list.count(), list.binary_size());

    let registry = Registry::with_defaults();

    for (i, (raw, desc)) in list.iter().zip(list.decode_all(&registry)).enumerate() {
        print!("  {i}: tag {:?}, {} bytes", raw.tag(), raw.size());

        if !raw.is_valid() {
            println!(", malformed");
            continue;
        }

        match desc {
            Some(desc) if desc.is_valid() => println!(", {}", desc.xml_name()),
            Some(desc) => println!(", invalid {}", desc.xml_name()),
            None => println!(", unknown"),
        }
    }

    // Typed access, honoring the private data specifier.
    if let Some((index, lcn)) = list.find::<LogicalChannelNumberDescriptor>(0) {
        println!("Logical channel numbers (descriptor {index}):");
        for entry in &lcn.entries {
            println!(
                "  service 0x{:04X}: LCN {}{}",
                entry.service_id,
                entry.lcn,
                if entry.visible { "" } else { " (hidden)" }
            );
        }
    }
}
