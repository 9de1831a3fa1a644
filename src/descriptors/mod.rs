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

//! Concrete descriptor payloads bundled with this crate.
//!
//! Each type here is an ordinary [`DescriptorPayload`] implementation;
//! applications add their own the same way.
//!
//! [`DescriptorPayload`]: crate::DescriptorPayload

mod enhanced_ac3;
mod logical_channel_number;
mod private_data_specifier;
mod supplementary_audio;

pub use enhanced_ac3::EnhancedAc3Descriptor;
pub use logical_channel_number::{LogicalChannelNumberDescriptor, LogicalChannelNumberEntry};
pub use private_data_specifier::PrivateDataSpecifierDescriptor;
pub use supplementary_audio::SupplementaryAudioDescriptor;
