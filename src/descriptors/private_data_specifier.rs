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
    tag::{Did, Pds, Standards},
    tree::Element,
    DescriptorPayload,
};

/// DVB `private_data_specifier_descriptor` (ETSI EN 300 468, 6.2.31).
///
/// Sets the private data specifier for all following descriptors of the
/// same descriptor loop.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PrivateDataSpecifierDescriptor {
    /// Private data specifier.
    pub pds: u32,
}

impl PrivateDataSpecifierDescriptor {
    /// Create a descriptor declaring `pds`.
    pub fn new(pds: Pds) -> Self {
        Self { pds: pds.0 }
    }
}

impl DescriptorPayload for PrivateDataSpecifierDescriptor {
    const TAG: Did = Did::PRIVATE_DATA_SPECIFIER;
    const XML_NAME: &'static str = "private_data_specifier_descriptor";
    const STANDARDS: Standards = Standards::DVB;

    fn serialize_payload(&self, buf: &mut WriteCursor<'_>) {
        buf.write_u32(self.pds);
    }

    fn deserialize_payload(&mut self, buf: &mut ReadCursor<'_>) {
        self.pds = buf.read_u32();
    }

    fn build_tree(&self, element: &mut Element) {
        element.set_int_attribute("private_data_specifier", self.pds, true);
    }

    fn analyze_tree(&mut self, element: &Element) -> Result<(), TreeError> {
        self.pds = element.int_attribute("private_data_specifier", true, 0, 0, u32::MAX)?;
        Ok(())
    }
}
