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

#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unwrap_used)]
#![deny(warnings)]
#![doc = include_str!("../README.md")]

pub mod cursor;

mod debug;

mod descriptor;
pub use descriptor::{AbstractDescriptor, Descriptor, DescriptorPayload};

pub mod descriptors;

pub mod error;
pub use error::{DeserializeError, ListError, TreeError};

mod list;
pub use list::{DescriptorList, MAX_LOOP_LENGTH};

mod raw;
pub use raw::RawDescriptor;

mod registry;
pub use registry::{Factory, Registry};

pub mod tag;
pub use tag::{Did, Edid, Pds, Standards};

pub mod tree;
