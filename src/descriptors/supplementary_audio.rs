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
    tag::{Did, Edid, Standards, MAX_PAYLOAD_SIZE},
    tree::Element,
    DescriptorPayload,
};

/// DVB `supplementary_audio_descriptor` (ETSI EN 300 468, 6.4.11).
///
/// This is an extension descriptor: tag 0x7F, extended tag 0x06.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SupplementaryAudioDescriptor {
    /// 1 bit: 0 = supplementary stream, 1 = complete and independent.
    pub mix_type: u8,

    /// 5 bits: editorial classification of the audio stream.
    pub editorial_classification: u8,

    /// ISO 639 language code of the audio stream, if different from the
    /// language signalled elsewhere.
    pub language_code: Option<String>,

    /// Private data bytes.
    pub private_data: Vec<u8>,
}

impl DescriptorPayload for SupplementaryAudioDescriptor {
    const TAG: Did = Did::DVB_EXTENSION;
    const XML_NAME: &'static str = "supplementary_audio_descriptor";
    const STANDARDS: Standards = Standards::DVB;
    const EXTENDED_TAG: Option<Edid> = Some(Edid::SUPPLEMENTARY_AUDIO);

    fn serialize_payload(&self, buf: &mut WriteCursor<'_>) {
        buf.write_bits(1, self.mix_type);
        buf.write_bits(5, self.editorial_classification);
        buf.write_reserved_bits(1);
        buf.write_bit(self.language_code.is_some());

        if let Some(code) = &self.language_code {
            buf.write_language_code(code);
        }

        buf.write_bytes(&self.private_data);
    }

    fn deserialize_payload(&mut self, buf: &mut ReadCursor<'_>) {
        self.mix_type = buf.read_bits(1);
        self.editorial_classification = buf.read_bits(5);
        buf.skip_reserved_bits(1);

        if buf.read_bit() {
            self.language_code = Some(buf.read_language_code());
        }

        self.private_data = buf.read_remaining_bytes().to_vec();
    }

    fn build_tree(&self, element: &mut Element) {
        element.set_int_attribute("mix_type", self.mix_type, false);
        element.set_int_attribute(
            "editorial_classification",
            self.editorial_classification,
            true,
        );
        if let Some(code) = &self.language_code {
            element.set_attribute("language_code", code.as_str());
        }
        element.add_hexa_child("private_data", &self.private_data);
    }

    fn analyze_tree(&mut self, element: &Element) -> Result<(), TreeError> {
        self.mix_type = element.int_attribute("mix_type", true, 0, 0, 1)?;
        self.editorial_classification =
            element.int_attribute("editorial_classification", true, 0, 0, 0x1F)?;
        self.language_code = element.optional_string_attribute("language_code", 3, 3)?;
        // Extended tag and flags byte; the language code is checked on
        // serialization.
        self.private_data = element.hexa_child("private_data", 0, MAX_PAYLOAD_SIZE - 2)?;
        Ok(())
    }

    fn is_content_valid(&self) -> bool {
        self.mix_type <= 1
            && self.editorial_classification <= 0x1F
            && self.language_code.as_deref().is_none_or(is_language_code)
    }
}

// Three ISO 8859-1 characters.
fn is_language_code(code: &str) -> bool {
    code.chars().count() == 3 && code.chars().all(|c| u32::from(c) < 0x100)
}
