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
use serde::{Deserialize, Serialize};

use super::compression::CompressionCodec;
use crate::error::{Error, ErrorKind, Result};

/// A blob catalogued in a Puffin footer.
///
/// Field order here is load-bearing: serde_json serializes struct fields
/// in declaration order, and the declaration order below is the canonical
/// on-disk order the footer codec must produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobMetadata {
    #[serde(rename = "type")]
    pub r#type: String,
    #[serde(default)]
    pub fields: Vec<i64>,
    #[serde(rename = "snapshot-id")]
    pub snapshot_id: i64,
    #[serde(rename = "sequence-number")]
    pub sequence_number: i64,
    pub offset: u64,
    pub length: u64,
    /// Absent means uncompressed. Never store `Some(CompressionCodec::None)`
    /// here; use the `Option` itself to represent "no compression", so the
    /// key disappears from the footer entirely.
    #[serde(rename = "compression-codec", default, skip_serializing_if = "Option::is_none")]
    pub compression_codec: Option<CompressionCodec>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, String>,
}

/// The footer payload: the ordered blob catalogue plus file-level
/// properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FileMetadata {
    pub blobs: Vec<BlobMetadata>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, String>,
}

impl FileMetadata {
    /// Canonical, compact JSON encoding: declared field order, no
    /// insignificant whitespace, properties in insertion order.
    pub fn to_canonical_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| Error::new(ErrorKind::InvalidFormat, format!("Error encoding footer: {e}")))
    }

    /// Parses a footer payload. Unknown top-level or blob-level keys are
    /// ignored for forward compatibility.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| Error::new(ErrorKind::InvalidFormat, format!("Error decoding footer: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_metadata_encodes_to_expected_bytes() {
        let meta = FileMetadata::default();
        assert_eq!(meta.to_canonical_json().unwrap(), br#"{"blobs":[]}"#);
    }

    #[test]
    fn canonical_key_order_and_no_whitespace() {
        let mut properties = IndexMap::new();
        properties.insert("a".to_string(), "1".to_string());
        let meta = FileMetadata {
            blobs: vec![BlobMetadata {
                r#type: "some-blob".to_string(),
                fields: vec![1],
                snapshot_id: 2,
                sequence_number: 1,
                offset: 4,
                length: 9,
                compression_codec: None,
                properties: IndexMap::new(),
            }],
            properties,
        };
        let json = String::from_utf8(meta.to_canonical_json().unwrap()).unwrap();
        assert_eq!(
            json,
            r#"{"blobs":[{"type":"some-blob","fields":[1],"snapshot-id":2,"sequence-number":1,"offset":4,"length":9}],"properties":{"a":"1"}}"#
        );
    }

    #[test]
    fn compression_codec_absent_means_uncompressed() {
        let meta = BlobMetadata {
            r#type: "t".to_string(),
            fields: vec![],
            snapshot_id: 0,
            sequence_number: 0,
            offset: 4,
            length: 1,
            compression_codec: Some(CompressionCodec::Zstd),
            properties: IndexMap::new(),
        };
        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains(r#""compression-codec":"zstd""#));

        let meta = BlobMetadata {
            compression_codec: None,
            ..meta
        };
        let json = serde_json::to_string(&meta).unwrap();
        assert!(!json.contains("compression-codec"));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let json = br#"{"blobs":[],"properties":{},"unknown-top-level":1}"#;
        let meta = FileMetadata::from_json(json).unwrap();
        assert!(meta.blobs.is_empty());
    }

    #[test]
    fn malformed_json_is_invalid_format() {
        let err = FileMetadata::from_json(b"not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn round_trips_through_json() {
        let mut properties = IndexMap::new();
        properties.insert("created-by".to_string(), "test".to_string());
        let meta = FileMetadata {
            blobs: vec![BlobMetadata {
                r#type: "some-blob".to_string(),
                fields: vec![1, 2],
                snapshot_id: 10,
                sequence_number: 3,
                offset: 4,
                length: 5,
                compression_codec: Some(CompressionCodec::Lz4),
                properties: IndexMap::new(),
            }],
            properties,
        };
        let bytes = meta.to_canonical_json().unwrap();
        let decoded = FileMetadata::from_json(&bytes).unwrap();
        assert_eq!(decoded, meta);
    }
}
