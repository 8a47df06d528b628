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

use std::sync::OnceLock;

use bytes::Bytes;

use super::metadata::{BlobMetadata, FileMetadata};
use super::{FooterFlags, FOOTER_COMPRESSION_CODEC, FOOTER_STRUCT_SIZE, MAGIC, MAGIC_SIZE, MIN_FILE_SIZE};
use crate::error::{Error, ErrorKind, Result};
use crate::io::InputFile;

/// Configuration builder for [`PuffinReader`]. Obtained from
/// [`crate::puffin::Puffin::read`]; validated only in [`Self::build`].
pub struct PuffinReadBuilder {
    input_file: Option<InputFile>,
    file_size: Option<u64>,
    footer_size: Option<u64>,
}

impl PuffinReadBuilder {
    pub(crate) fn new(input_file: InputFile) -> Self {
        Self {
            input_file: Some(input_file),
            file_size: None,
            footer_size: None,
        }
    }

    pub fn with_file_size(mut self, size: u64) -> Self {
        self.file_size = Some(size);
        self
    }

    pub fn with_footer_size(mut self, size: u64) -> Self {
        self.footer_size = Some(size);
        self
    }

    pub fn build(self) -> Result<PuffinReader> {
        let input_file = self
            .input_file
            .ok_or_else(|| Error::new(ErrorKind::InvalidArgument, "Input file is absent"))?;
        Ok(PuffinReader {
            source: input_file,
            file_size_hint: self.file_size,
            footer_size_hint: self.footer_size,
            metadata: OnceLock::new(),
        })
    }
}

/// Random-access reader over a Puffin file: locates and decodes the
/// footer on first access, then serves blob reads against cached
/// metadata.
pub struct PuffinReader {
    source: InputFile,
    file_size_hint: Option<u64>,
    footer_size_hint: Option<u64>,
    metadata: OnceLock<FileMetadata>,
}

impl PuffinReader {
    /// The decoded footer, parsing and caching it on first call.
    pub fn file_metadata(&self) -> Result<&FileMetadata> {
        if let Some(metadata) = self.metadata.get() {
            return Ok(metadata);
        }
        let metadata = self.locate_and_parse_footer()?;
        Ok(self.metadata.get_or_init(|| metadata))
    }

    /// Reads and, if compressed, decompresses the payload bytes for one
    /// catalogued blob. Blobs may be read in any order.
    pub fn read_blob(&self, blob_metadata: &BlobMetadata) -> Result<Vec<u8>> {
        let bytes = self.read_at(blob_metadata.offset, blob_metadata.length)?;
        match blob_metadata.compression_codec {
            Some(codec) => codec.decompress(&bytes),
            None => Ok(bytes.to_vec()),
        }
    }

    fn file_size(&self) -> Result<u64> {
        match self.file_size_hint {
            Some(size) => Ok(size),
            None => Ok(self.source.metadata()?.size),
        }
    }

    fn read_at(&self, offset: u64, length: u64) -> Result<Bytes> {
        self.source.reader()?.read_range(offset..offset + length)
    }

    fn locate_and_parse_footer(&self) -> Result<FileMetadata> {
        let file_size = self.file_size()?;
        if file_size < MIN_FILE_SIZE {
            return Err(Error::new(
                ErrorKind::InvalidFormat,
                format!("File is too small to be a Puffin file: {file_size} bytes"),
            ));
        }

        let (payload, flags) = match self.footer_size_hint {
            Some(footer_size) => {
                let total = footer_size + FOOTER_STRUCT_SIZE;
                if total > file_size {
                    return Err(Error::new(
                        ErrorKind::InvalidFormat,
                        "Footer size hint is larger than the file",
                    ));
                }
                let block = self.read_at(file_size - total, total)?;
                self.verify_magic(&block[block.len() - 4..], "missing trailing magic")?;
                let flags = Self::parse_flags(&block[block.len() - 8..block.len() - 4])?;
                let payload = block[..block.len() - 12].to_vec();
                (payload, flags)
            }
            None => {
                let tail = self.read_at(file_size - FOOTER_STRUCT_SIZE, FOOTER_STRUCT_SIZE)?;
                self.verify_magic(&tail[8..12], "missing trailing magic")?;
                let flags = Self::parse_flags(&tail[4..8])?;
                let payload_size = Self::read_u32_le(&tail[0..4])? as u64;
                let total = payload_size + FOOTER_STRUCT_SIZE;
                if total > file_size {
                    return Err(Error::new(
                        ErrorKind::InvalidFormat,
                        "Footer payload size exceeds the file",
                    ));
                }
                let payload = self.read_at(file_size - total, payload_size)?;
                (payload.to_vec(), flags)
            }
        };

        let head = self.read_at(0, MAGIC_SIZE)?;
        self.verify_magic(&head, "missing leading magic")?;

        let payload = if flags.contains(FooterFlags::COMPRESSED) {
            FOOTER_COMPRESSION_CODEC.decompress(&payload)?
        } else {
            payload
        };

        FileMetadata::from_json(&payload)
    }

    fn verify_magic(&self, bytes: &[u8], message: &str) -> Result<()> {
        if bytes == MAGIC {
            Ok(())
        } else {
            Err(Error::new(ErrorKind::InvalidFormat, message))
        }
    }

    fn parse_flags(bytes: &[u8]) -> Result<FooterFlags> {
        let raw = Self::read_u32_le(bytes)?;
        Ok(FooterFlags::from_bits_retain(raw))
    }

    fn read_u32_le(bytes: &[u8]) -> Result<u32> {
        let array: [u8; 4] = bytes
            .try_into()
            .map_err(|_| Error::new(ErrorKind::InvalidFormat, "truncated footer trailer"))?;
        Ok(u32::from_le_bytes(array))
    }
}
