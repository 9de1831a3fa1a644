//! Example: Convert descriptors between binary form and a textual tree.
//!
//! The tree is the editable representation of a descriptor: it is built
//! from a typed descriptor, modified, then analyzed back into a typed
//! descriptor and serialized.

use tsdesc::{
    descriptors::EnhancedAc3Descriptor, tree::Element, Descriptor, DescriptorList, RawDescriptor,
};

fn main() {
    let raw = RawDescriptor::from_bytes(vec![0x7a, 0x04, 0xa0, 0x42, 0x10, 0xee]);
    println!("Binary: {raw:?}");

    let desc = Descriptor::<EnhancedAc3Descriptor>::try_from(&raw)
        .expect("Failed to decode DVB_enhanced_AC3_descriptor");

    // Build the tree.
    let mut root = Element::new("descriptors");
    let element = desc.to_tree(&mut root).expect("Descriptor is invalid");
    print_element(element, 1);

    // Edit the tree: add a substream and drop the additional info.
    let mut edited = element.clone();
    edited.set_attribute("substream1", "0x21");
    let edited = without_child(edited, "additional_info");

    // Analyze it back and serialize.
    match Descriptor::<EnhancedAc3Descriptor>::from_tree(&edited) {
        Ok(desc) => {
            let mut list = DescriptorList::new();
            if list.append_typed(&desc) {
                println!("Re-serialized: {:?}", list[0]);
            } else {
                eprintln!("Failed to serialize the edited descriptor");
            }
        }
        Err(e) => {
            eprintln!("Failed to analyze tree: {e}");
        }
    }
}

fn without_child(element: Element, name: &str) -> Element {
    let mut result = Element::new(element.name());
    for (attr, value) in element.attributes() {
        result.set_attribute(attr, value);
    }
    for child in element.all_children() {
        if !child.has_name(name) {
            result.push_child(child.clone());
        }
    }
    result
}

fn print_element(element: &Element, depth: usize) {
    let indent = "  ".repeat(depth);
    print!("{indent}<{}", element.name());
    for (name, value) in element.attributes() {
        print!(" {name}=\"{value}\"");
    }

    match (element.text(), element.all_children()) {
        (None, []) => println!("/>"),
        (text, children) => {
            println!(">");
            if let Some(text) = text {
                println!("{indent}  {text}");
            }
            for child in children {
                print_element(child, depth + 1);
            }
            println!("{indent}</{}>", element.name());
        }
    }
}
