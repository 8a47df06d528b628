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

use indexmap::IndexMap;

use super::blob::Blob;
use super::metadata::{BlobMetadata, FileMetadata};
use super::{CompressionCodec, CREATED_BY, FOOTER_COMPRESSION_CODEC, FooterFlags, MAGIC};
use crate::error::{Error, ErrorKind, Result};
use crate::io::{FileWrite, OutputFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Accepting `write_blob` calls; header not yet on the wire.
    Open,
    /// Accepting `write_blob` calls; header already on the wire.
    HeaderWritten,
    Closed,
    /// A sink write failed; no further operation succeeds.
    Failed,
}

/// Configuration builder for [`PuffinWriter`]. Obtained from
/// [`crate::puffin::Puffin::write`]; validated only in [`Self::build`].
pub struct PuffinWriteBuilder {
    output_file: Option<OutputFile>,
    properties: IndexMap<String, String>,
    compress_footer: bool,
    default_blob_compression: CompressionCodec,
}

impl PuffinWriteBuilder {
    pub(crate) fn new(output_file: OutputFile) -> Self {
        Self {
            output_file: Some(output_file),
            properties: IndexMap::new(),
            compress_footer: false,
            default_blob_compression: CompressionCodec::None,
        }
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn set_all(mut self, properties: impl IntoIterator<Item = (String, String)>) -> Self {
        for (key, value) in properties {
            self.properties.insert(key, value);
        }
        self
    }

    pub fn created_by(self, application_identifier: impl Into<String>) -> Self {
        self.set(CREATED_BY, application_identifier)
    }

    pub fn compress_footer(mut self) -> Self {
        self.compress_footer = true;
        self
    }

    pub fn compress_blobs(mut self, codec: CompressionCodec) -> Self {
        self.default_blob_compression = codec;
        self
    }

    pub fn build(self) -> Result<PuffinWriter> {
        let output_file = self
            .output_file
            .ok_or_else(|| Error::new(ErrorKind::InvalidArgument, "Output file is absent"))?;
        let writer = output_file.writer()?;
        Ok(PuffinWriter {
            writer,
            state: State::Open,
            num_bytes_written: 0,
            written_blobs_metadata: Vec::new(),
            properties: self.properties,
            compress_footer: self.compress_footer,
            default_blob_compression: self.default_blob_compression,
            footer_size: None,
        })
    }
}

/// Writes a sequence of blobs followed by a JSON footer, producing a
/// byte-exact Puffin file.
pub struct PuffinWriter {
    writer: Box<dyn FileWrite>,
    state: State,
    num_bytes_written: u64,
    written_blobs_metadata: Vec<BlobMetadata>,
    properties: IndexMap<String, String>,
    compress_footer: bool,
    default_blob_compression: CompressionCodec,
    footer_size: Option<u64>,
}

impl PuffinWriter {
    /// Appends `blob` to the file, compressing its payload with the
    /// per-call override if present, else the writer's default codec.
    pub fn write_blob(&mut self, blob: Blob) -> Result<()> {
        match self.state {
            State::Closed | State::Failed => {
                return Err(Error::new(
                    ErrorKind::InvalidState,
                    "Cannot write a blob: writer is closed",
                ));
            }
            State::Open | State::HeaderWritten => {}
        }

        self.write_header_once()?;

        let codec = blob.requested_compression.unwrap_or(self.default_blob_compression);
        let compressed = codec.compress(&blob.blob_data)?;
        let offset = self.num_bytes_written;
        let length = compressed.len() as u64;
        self.write(&compressed)?;

        let stored_codec = match codec {
            CompressionCodec::None => None,
            other => Some(other),
        };

        self.written_blobs_metadata.push(BlobMetadata {
            r#type: blob.r#type,
            fields: blob.input_fields,
            snapshot_id: blob.snapshot_id,
            sequence_number: blob.sequence_number,
            offset,
            length,
            compression_codec: stored_codec,
            properties: blob.properties,
        });

        Ok(())
    }

    /// The blob catalogue accumulated so far, in `write_blob` call order.
    pub fn written_blobs_metadata(&self) -> &[BlobMetadata] {
        &self.written_blobs_metadata
    }

    /// The total byte count spent on format framing rather than blob
    /// payloads: the leading 4-byte magic, the footer payload, and the
    /// 12-byte trailer (payload size + flags + trailing magic). For a
    /// file with no blobs this equals the whole file's length. Only
    /// available once [`Self::close`] has run.
    pub fn footer_size(&self) -> Result<u64> {
        self.footer_size.ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidArgument,
                "Footer size not available until closed",
            )
        })
    }

    /// Finalizes the file: emits the header if no blob ever did, writes
    /// the footer, and releases the output sink. Idempotent: a second
    /// call on an already-closed writer is a no-op success.
    pub fn close(&mut self) -> Result<()> {
        if self.state == State::Closed {
            return Ok(());
        }
        if self.state == State::Failed {
            return Err(Error::new(
                ErrorKind::InvalidState,
                "Cannot close: writer previously failed",
            ));
        }

        self.write_header_once()?;
        self.write_footer()?;
        if let Err(e) = self.writer.close() {
            self.state = State::Failed;
            return Err(e);
        }
        self.state = State::Closed;
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        use std::io::Write;
        match self.writer.write_all(bytes) {
            Ok(()) => {
                self.num_bytes_written += bytes.len() as u64;
                Ok(())
            }
            Err(e) => {
                self.state = State::Failed;
                Err(Error::from(e))
            }
        }
    }

    fn write_header_once(&mut self) -> Result<()> {
        if self.state == State::Open {
            self.write(&MAGIC)?;
            self.state = State::HeaderWritten;
        }
        Ok(())
    }

    fn write_footer(&mut self) -> Result<()> {
        let file_metadata = FileMetadata {
            blobs: std::mem::take(&mut self.written_blobs_metadata),
            properties: std::mem::take(&mut self.properties),
        };
        let mut footer_payload = file_metadata.to_canonical_json()?;
        self.written_blobs_metadata = file_metadata.blobs;

        let mut flags = FooterFlags::DEFAULT;
        if self.compress_footer {
            footer_payload = FOOTER_COMPRESSION_CODEC.compress(&footer_payload)?;
            flags |= FooterFlags::COMPRESSED;
        }

        let payload_size = footer_payload.len() as u32;
        self.write(&footer_payload)?;
        self.write(&payload_size.to_le_bytes())?;
        self.write(&flags.bits().to_le_bytes())?;
        self.write(&MAGIC)?;

        self.footer_size =
            Some(super::MAGIC_SIZE + footer_payload.len() as u64 + super::FOOTER_STRUCT_SIZE);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::FileIO;
    use crate::puffin::test_util::{blob_0, blob_1, file_properties};
    use crate::puffin::{Puffin, MIN_FILE_SIZE};

    #[test]
    fn empty_uncompressed_file_is_28_bytes() {
        let file_io = FileIO::memory();
        let output = file_io.new_output("mem://empty.puffin").unwrap();
        let mut writer = Puffin::write(output.clone()).build().unwrap();

        let err = writer.footer_size().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.message(), "Footer size not available until closed");

        writer.close().unwrap();
        assert_eq!(writer.footer_size().unwrap(), 28);
        assert!(writer.written_blobs_metadata().is_empty());

        let input = output.to_input_file();
        let bytes = input.read().unwrap();
        assert_eq!(bytes.len(), 28);
        assert_eq!(&bytes[0..4], &MAGIC);
        assert_eq!(&bytes[bytes.len() - 4..], &MAGIC);
        assert_eq!(bytes.len() as u64, MIN_FILE_SIZE);

        let payload = &bytes[4..bytes.len() - 12];
        assert_eq!(payload, br#"{"blobs":[]}"#);
    }

    #[test]
    fn close_is_idempotent() {
        let file_io = FileIO::memory();
        let output = file_io.new_output("mem://idempotent.puffin").unwrap();
        let mut writer = Puffin::write(output).build().unwrap();
        writer.close().unwrap();
        writer.close().unwrap();
    }

    #[test]
    fn write_after_close_is_invalid_state() {
        let file_io = FileIO::memory();
        let output = file_io.new_output("mem://after-close.puffin").unwrap();
        let mut writer = Puffin::write(output).build().unwrap();
        writer.close().unwrap();

        let err = writer.write_blob(blob_0()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[test]
    fn two_uncompressed_blobs_have_contiguous_offsets() {
        let file_io = FileIO::memory();
        let output = file_io.new_output("mem://two-blobs.puffin").unwrap();
        let mut writer = Puffin::write(output)
            .created_by("Test 1234")
            .set_all(file_properties())
            .build()
            .unwrap();

        writer.write_blob(blob_0()).unwrap();
        writer.write_blob(blob_1()).unwrap();

        let metadata = writer.written_blobs_metadata();
        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata[0].r#type, "some-blob");
        assert_eq!(metadata[0].offset, 4);
        assert_eq!(metadata[0].length, 9);
        assert!(metadata[0].properties.is_empty());
        assert_eq!(metadata[1].r#type, "some-other-blob");
        assert_eq!(metadata[1].offset, metadata[0].offset + metadata[0].length);

        writer.close().unwrap();
    }

    #[test]
    fn compress_blobs_sets_default_codec_on_every_blob() {
        let file_io = FileIO::memory();
        let output = file_io.new_output("mem://zstd.puffin").unwrap();
        let mut writer = Puffin::write(output)
            .compress_blobs(CompressionCodec::Zstd)
            .build()
            .unwrap();

        writer.write_blob(blob_0()).unwrap();
        writer.write_blob(blob_1()).unwrap();

        for metadata in writer.written_blobs_metadata() {
            assert_eq!(metadata.compression_codec, Some(CompressionCodec::Zstd));
        }
        writer.close().unwrap();
    }

    #[test]
    fn per_call_override_takes_precedence_over_default() {
        let file_io = FileIO::memory();
        let output = file_io.new_output("mem://override.puffin").unwrap();
        let mut writer = Puffin::write(output)
            .compress_blobs(CompressionCodec::Zstd)
            .build()
            .unwrap();

        let mut blob = blob_0();
        blob.requested_compression = Some(CompressionCodec::None);
        writer.write_blob(blob).unwrap();

        assert_eq!(writer.written_blobs_metadata()[0].compression_codec, None);
        writer.close().unwrap();
    }
}
