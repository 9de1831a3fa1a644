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

use std::{
    fmt::{Debug, Formatter},
    ops::{BitOr, BitOrAssign},
};

/// Maximum size in bytes of a complete descriptor (tag, length, payload).
pub const MAX_DESCRIPTOR_SIZE: usize = 257;

/// Maximum size in bytes of a descriptor payload.
pub const MAX_PAYLOAD_SIZE: usize = 255;

/// Descriptor tag (first byte of every descriptor).
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Did(pub u8);

impl Did {
    /// MPEG-defined extension descriptor (ISO/IEC 13818-1).
    pub const MPEG_EXTENSION: Did = Did(0x3F);

    /// DVB private_data_specifier_descriptor (ETSI EN 300 468).
    pub const PRIVATE_DATA_SPECIFIER: Did = Did(0x5F);

    /// DVB enhanced_AC-3_descriptor.
    pub const ENHANCED_AC3: Did = Did(0x7A);

    /// DVB extension descriptor.
    pub const DVB_EXTENSION: Did = Did(0x7F);

    /// EACEM logical_channel_number_descriptor (private, PDS 0x28).
    pub const LOGICAL_CHANNEL_NUMBER: Did = Did(0x83);

    /// Returns `true` if this tag introduces an extension descriptor,
    /// whose true identity is the first payload byte.
    pub fn is_extension(self) -> bool {
        self == Self::MPEG_EXTENSION || self == Self::DVB_EXTENSION
    }

    /// Returns `true` if this tag is in the user-private range, where the
    /// same value may be reused by different organizations.
    pub fn is_private(self) -> bool {
        self.0 >= 0x80
    }
}

impl Debug for Did {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "0x{:02X}", self.0)
    }
}

impl From<u8> for Did {
    fn from(tag: u8) -> Self {
        Self(tag)
    }
}

/// Extended descriptor tag (first payload byte of an extension descriptor).
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Edid(pub u8);

impl Edid {
    /// DVB supplementary_audio_descriptor.
    pub const SUPPLEMENTARY_AUDIO: Edid = Edid(0x06);
}

impl Debug for Edid {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "0x{:02X}", self.0)
    }
}

/// Private data specifier, as carried by a
/// `private_data_specifier_descriptor`.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Pds(pub u32);

impl Pds {
    /// Eutelsat S.A.
    pub const EUTELSAT: Pds = Pds(0x0000_000F);

    /// EACEM / EICTA / DIGITALEUROPE.
    pub const EACEM: Pds = Pds(0x0000_0028);

    /// NorDig.
    pub const NORDIG: Pds = Pds(0x0000_0029);
}

impl Debug for Pds {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "0x{:08X}", self.0)
    }
}

/// Set of signalization standards a descriptor belongs to.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct Standards(u8);

impl Standards {
    /// No standard.
    pub const NONE: Standards = Standards(0x00);

    /// ISO/IEC 13818-1 (MPEG-2 Systems).
    pub const MPEG: Standards = Standards(0x01);

    /// ETSI DVB.
    pub const DVB: Standards = Standards(0x02);

    /// ANSI/SCTE.
    pub const SCTE: Standards = Standards(0x04);

    /// ATSC.
    pub const ATSC: Standards = Standards(0x08);

    /// ARIB ISDB.
    pub const ISDB: Standards = Standards(0x10);

    const NAMES: [(Standards, &'static str); 5] = [
        (Self::MPEG, "MPEG"),
        (Self::DVB, "DVB"),
        (Self::SCTE, "SCTE"),
        (Self::ATSC, "ATSC"),
        (Self::ISDB, "ISDB"),
    ];

    /// Returns `true` if every standard in `other` is also in `self`.
    pub const fn contains(self, other: Standards) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if `self` and `other` share at least one standard.
    pub const fn intersects(self, other: Standards) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns `true` if no standard is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Union of two sets, usable in `const` context.
    pub const fn union(self, other: Standards) -> Standards {
        Standards(self.0 | other.0)
    }
}

impl BitOr for Standards {
    type Output = Standards;

    fn bitor(self, rhs: Standards) -> Standards {
        self.union(rhs)
    }
}

impl BitOrAssign for Standards {
    fn bitor_assign(&mut self, rhs: Standards) {
        self.0 |= rhs.0;
    }
}

impl Debug for Standards {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(s, _)| self.contains(*s))
            .map(|(_, name)| *name)
            .collect();

        if names.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", names.join("|"))
        }
    }
}
