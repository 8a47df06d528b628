// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! The Puffin file format: a container of opaque typed byte blobs plus a
//! JSON footer cataloguing them. See [Puffin spec] for the format this
//! module implements.
//!
//! [Puffin spec]: https://iceberg.apache.org/puffin-spec/

mod blob;
mod compression;
mod metadata;
mod reader;
mod writer;

pub use blob::{Blob, BlobBuilder};
pub use compression::CompressionCodec;
pub use metadata::{BlobMetadata, FileMetadata};
pub use reader::{PuffinReadBuilder, PuffinReader};
pub use writer::{PuffinWriteBuilder, PuffinWriter};

/// The 4-byte magic framing every Puffin file at both ends: ASCII `PFA1`.
pub const MAGIC: [u8; 4] = [0x50, 0x46, 0x41, 0x31];
pub const MAGIC_SIZE: u64 = MAGIC.len() as u64;

pub const FLAGS_SIZE: u64 = 4;
pub const FOOTER_PAYLOAD_SIZE_SIZE: u64 = 4;

/// Bytes following the last blob payload that are not the footer JSON
/// itself: payload size (4) + flags (4) + trailing magic (4).
pub const FOOTER_STRUCT_SIZE: u64 = FOOTER_PAYLOAD_SIZE_SIZE + FLAGS_SIZE + MAGIC_SIZE;

/// Smallest possible Puffin file: leading magic + an empty footer whose
/// payload is `{"blobs":[]}` (12 bytes).
pub const MIN_FOOTER_PAYLOAD_SIZE: u64 = 12;
pub const MIN_FILE_SIZE: u64 = MAGIC_SIZE + FOOTER_STRUCT_SIZE + MIN_FOOTER_PAYLOAD_SIZE;

bitflags::bitflags! {
    /// The 4-byte flags word in the footer trailer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FooterFlags: u32 {
        const DEFAULT = 0b0000_0000;
        /// Bit 0: the footer payload is compressed with the implementation's
        /// fixed footer codec (zstd).
        const COMPRESSED = 0b0000_0001;
    }
}

/// Reserved file-level property key: a free-form writer identifier.
pub const CREATED_BY: &str = "created-by";

/// The fixed codec used whenever footer compression is enabled. The footer
/// trailer has no codec-identifying bits beyond "compressed or not", so the
/// implementation commits to a single footer codec rather than negotiating
/// one.
pub const FOOTER_COMPRESSION_CODEC: CompressionCodec = CompressionCodec::Zstd;

#[cfg(test)]
pub(crate) mod test_util;

/// Entry point for building a [`PuffinWriter`] or [`PuffinReader`] from a
/// writable or readable file handle.
pub struct Puffin;

impl Puffin {
    pub fn write(output_file: crate::io::OutputFile) -> PuffinWriteBuilder {
        PuffinWriteBuilder::new(output_file)
    }

    pub fn read(input_file: crate::io::InputFile) -> PuffinReadBuilder {
        PuffinReadBuilder::new(input_file)
    }
}
