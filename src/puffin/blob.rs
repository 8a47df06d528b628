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

use super::compression::CompressionCodec;
use crate::error::{Error, ErrorKind, Result};

/// An unwritten blob, built by the caller and consumed (moved) into a
/// [`super::writer::PuffinWriter`] via `write_blob`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub r#type: String,
    pub input_fields: Vec<i64>,
    pub snapshot_id: i64,
    pub sequence_number: i64,
    pub blob_data: Vec<u8>,
    pub requested_compression: Option<CompressionCodec>,
    pub properties: IndexMap<String, String>,
}

impl Blob {
    /// Builds a blob, enforcing the construction invariant: `r#type` and
    /// `blob_data` must both be non-empty.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        r#type: impl Into<String>,
        input_fields: Vec<i64>,
        snapshot_id: i64,
        sequence_number: i64,
        blob_data: Vec<u8>,
        requested_compression: Option<CompressionCodec>,
        properties: IndexMap<String, String>,
    ) -> Result<Self> {
        let r#type = r#type.into();
        if r#type.is_empty() {
            return Err(Error::new(ErrorKind::InvalidArgument, "type is empty"));
        }
        if blob_data.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                "blob_data is empty",
            ));
        }
        Ok(Self {
            r#type,
            input_fields,
            snapshot_id,
            sequence_number,
            blob_data,
            requested_compression,
            properties,
        })
    }

    /// Starts a [`BlobBuilder`] for the mandatory `type` and `blob_data`
    /// fields, with every other field defaulted.
    pub fn builder(r#type: impl Into<String>, blob_data: Vec<u8>) -> BlobBuilder {
        BlobBuilder {
            r#type: r#type.into(),
            input_fields: Vec::new(),
            snapshot_id: 0,
            sequence_number: 0,
            blob_data,
            requested_compression: None,
            properties: IndexMap::new(),
        }
    }
}

/// Fluent builder for [`Blob`], validating only in [`BlobBuilder::build`].
#[derive(Debug, Clone)]
pub struct BlobBuilder {
    r#type: String,
    input_fields: Vec<i64>,
    snapshot_id: i64,
    sequence_number: i64,
    blob_data: Vec<u8>,
    requested_compression: Option<CompressionCodec>,
    properties: IndexMap<String, String>,
}

impl BlobBuilder {
    pub fn input_fields(mut self, input_fields: Vec<i64>) -> Self {
        self.input_fields = input_fields;
        self
    }

    pub fn snapshot_id(mut self, snapshot_id: i64) -> Self {
        self.snapshot_id = snapshot_id;
        self
    }

    pub fn sequence_number(mut self, sequence_number: i64) -> Self {
        self.sequence_number = sequence_number;
        self
    }

    pub fn requested_compression(mut self, codec: CompressionCodec) -> Self {
        self.requested_compression = Some(codec);
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Result<Blob> {
        Blob::new(
            self.r#type,
            self.input_fields,
            self.snapshot_id,
            self.sequence_number,
            self.blob_data,
            self.requested_compression,
            self.properties,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_type() {
        let err = Blob::builder("", vec![1]).build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn rejects_empty_payload() {
        let err = Blob::builder("some-blob", Vec::new()).build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn builds_with_defaults() {
        let blob = Blob::builder("some-blob", vec![1, 2, 3]).build().unwrap();
        assert_eq!(blob.r#type, "some-blob");
        assert!(blob.input_fields.is_empty());
        assert_eq!(blob.snapshot_id, 0);
        assert_eq!(blob.sequence_number, 0);
        assert!(blob.properties.is_empty());
    }

    #[test]
    fn builds_with_overrides() {
        let blob = Blob::builder("some-blob", vec![1])
            .input_fields(vec![1, 2])
            .snapshot_id(7)
            .sequence_number(3)
            .requested_compression(CompressionCodec::Zstd)
            .property("k", "v")
            .build()
            .unwrap();
        assert_eq!(blob.input_fields, vec![1, 2]);
        assert_eq!(blob.snapshot_id, 7);
        assert_eq!(blob.sequence_number, 3);
        assert_eq!(blob.requested_compression, Some(CompressionCodec::Zstd));
        assert_eq!(blob.properties.get("k"), Some(&"v".to_string()));
    }
}
