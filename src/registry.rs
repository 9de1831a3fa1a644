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

//! Run-time dispatch from binary descriptors to typed descriptors.

use std::{
    collections::HashMap,
    fmt::{Debug, Formatter},
};

use log::{debug, trace};

use crate::{
    descriptors::{
        EnhancedAc3Descriptor, LogicalChannelNumberDescriptor, PrivateDataSpecifierDescriptor,
        SupplementaryAudioDescriptor,
    },
    tag::{Did, Edid, Pds},
    AbstractDescriptor, Descriptor, DescriptorPayload, RawDescriptor,
};

/// Creates a cleared typed descriptor.
pub type Factory = fn() -> Box<dyn AbstractDescriptor>;

type Key = (Did, Option<Edid>, Option<Pds>);

/// Table of known descriptor types, keyed by tag, extended tag and
/// required private data specifier.
///
/// Lookups with an active private data specifier first try the entry
/// registered for that specifier, then the standard entry for the same tag
/// (registered without specifier). An entry registered for one specifier
/// never matches when another one is active.
///
/// Applications register their own descriptor types next to (or instead
/// of) the bundled ones.
#[derive(Clone, Default)]
pub struct Registry {
    factories: HashMap<Key, Factory>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with all descriptor types of this crate.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register::<PrivateDataSpecifierDescriptor>();
        registry.register::<EnhancedAc3Descriptor>();
        registry.register::<SupplementaryAudioDescriptor>();
        registry.register::<LogicalChannelNumberDescriptor>();
        registry
    }

    /// Register descriptor type `P`, replacing any type previously
    /// registered with the same identity.
    pub fn register<P: DescriptorPayload + 'static>(&mut self) {
        fn create<P: DescriptorPayload + 'static>() -> Box<dyn AbstractDescriptor> {
            Box::new(Descriptor::<P>::new())
        }

        let key = (P::TAG, P::EXTENDED_TAG, P::REQUIRED_PDS);
        if self.factories.insert(key, create::<P>).is_some() {
            debug!("{}: replaces a registered descriptor type", P::XML_NAME);
        }
    }

    /// Number of registered descriptor types.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns `true` if no descriptor type is registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Find the factory for a descriptor. `edid` is ignored unless `tag`
    /// is an extension tag.
    pub fn lookup(&self, tag: Did, edid: Option<Edid>, pds: Option<Pds>) -> Option<Factory> {
        let edid = edid.filter(|_| tag.is_extension());

        pds.and_then(|pds| self.factories.get(&(tag, edid, Some(pds))))
            .or_else(|| self.factories.get(&(tag, edid, None)))
            .copied()
    }

    /// Decode a binary descriptor, given the private data specifier active
    /// at its position in its list.
    ///
    /// Returns `None` if no type is registered for the descriptor. The
    /// returned descriptor is invalid if decoding failed.
    pub fn decode(
        &self,
        raw: &RawDescriptor,
        pds: Option<Pds>,
    ) -> Option<Box<dyn AbstractDescriptor>> {
        let Some(factory) = self.lookup(raw.tag(), raw.extended_tag(), pds) else {
            trace!("no registered type for descriptor {:?}", raw.tag());
            return None;
        };

        let mut desc = factory();
        if let Err(err) = desc.deserialize(raw) {
            debug!("{}: decoded as invalid ({err})", desc.xml_name());
        }

        Some(desc)
    }
}

impl Debug for Registry {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        let mut keys: Vec<&Key> = self.factories.keys().collect();
        keys.sort();

        f.debug_struct("Registry").field("types", &keys).finish()
    }
}
