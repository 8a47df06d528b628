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

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};

/// Compression codec for a blob's stored bytes, or the footer payload.
///
/// Serialized in the footer as the absence of the `compression-codec` key
/// (`None`) or the lowercase strings `"lz4"` / `"zstd"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionCodec {
    None,
    Lz4,
    Zstd,
}

impl Default for CompressionCodec {
    fn default() -> Self {
        CompressionCodec::None
    }
}

impl CompressionCodec {
    /// The name used in the footer JSON and accepted by [`Self::from_name`].
    pub fn name(&self) -> Option<&'static str> {
        match self {
            CompressionCodec::None => None,
            CompressionCodec::Lz4 => Some("lz4"),
            CompressionCodec::Zstd => Some("zstd"),
        }
    }

    /// Looks up a codec by its footer-JSON name. `None`/absent is not a
    /// valid argument here; callers represent "no compression" with
    /// `Option::None` at the call site, not with this lookup.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "lz4" => Ok(CompressionCodec::Lz4),
            "zstd" => Ok(CompressionCodec::Zstd),
            other => Err(Error::new(
                ErrorKind::InvalidFormat,
                format!("Unknown compression codec: {other}"),
            )),
        }
    }

    pub fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        match self {
            CompressionCodec::None => Ok(bytes.to_vec()),
            CompressionCodec::Lz4 => Ok(lz4_flex::compress_prepend_size(bytes)),
            CompressionCodec::Zstd => {
                let mut encoder = zstd::Encoder::new(Vec::new(), 3)
                    .map_err(|e| Error::new(ErrorKind::Io, e.to_string()))?;
                encoder
                    .write_all(bytes)
                    .map_err(|e| Error::new(ErrorKind::Io, e.to_string()))?;
                encoder
                    .finish()
                    .map_err(|e| Error::new(ErrorKind::Io, e.to_string()))
            }
        }
    }

    pub fn decompress(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        match self {
            CompressionCodec::None => Ok(bytes.to_vec()),
            CompressionCodec::Lz4 => lz4_flex::decompress_size_prepended(bytes).map_err(|e| {
                Error::new(
                    ErrorKind::InvalidFormat,
                    format!("Lz4 decompression failed: {e}"),
                )
            }),
            CompressionCodec::Zstd => {
                let mut decoder = zstd::Decoder::new(bytes).map_err(|e| {
                    Error::new(
                        ErrorKind::InvalidFormat,
                        format!("Zstd decompression failed: {e}"),
                    )
                })?;
                let mut out = Vec::new();
                decoder.read_to_end(&mut out).map_err(|e| {
                    Error::new(
                        ErrorKind::InvalidFormat,
                        format!("Zstd decompression failed: {e}"),
                    )
                })?;
                Ok(out)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_identity() {
        let data = b"hello world";
        let compressed = CompressionCodec::None.compress(data).unwrap();
        assert_eq!(compressed, data);
        let decompressed = CompressionCodec::None.decompress(&compressed).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn zstd_round_trips() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(8);
        let compressed = CompressionCodec::Zstd.compress(&data).unwrap();
        let decompressed = CompressionCodec::Zstd.decompress(&compressed).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn lz4_round_trips() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(8);
        let compressed = CompressionCodec::Lz4.compress(&data).unwrap();
        let decompressed = CompressionCodec::Lz4.decompress(&compressed).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn zstd_decompress_rejects_garbage() {
        let err = CompressionCodec::Zstd.decompress(b"not zstd").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn from_name_round_trips() {
        assert_eq!(CompressionCodec::from_name("lz4").unwrap(), CompressionCodec::Lz4);
        assert_eq!(CompressionCodec::from_name("zstd").unwrap(), CompressionCodec::Zstd);
        assert_eq!(
            CompressionCodec::from_name("bogus").unwrap_err().kind(),
            ErrorKind::InvalidFormat
        );
    }

    #[test]
    fn names_round_trip_through_from_name() {
        for codec in [CompressionCodec::Lz4, CompressionCodec::Zstd] {
            let name = codec.name().unwrap();
            assert_eq!(CompressionCodec::from_name(name).unwrap(), codec);
        }
        assert_eq!(CompressionCodec::None.name(), None);
    }
}
