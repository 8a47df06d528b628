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

//! Shared fixtures for the puffin test suite, mirroring the two-blob
//! scenario used across writer/reader tests: a short ASCII blob and a
//! binary blob containing a NUL byte and a 4-byte emoji.

use indexmap::IndexMap;

use super::blob::Blob;

pub(crate) fn blob_0() -> Blob {
    Blob::builder("some-blob", b"abcdefghi".to_vec())
        .input_fields(vec![1])
        .snapshot_id(2)
        .sequence_number(1)
        .build()
        .unwrap()
}

/// "some blob \0 binary data \u{1F92F} that is not very very very very
/// very very long, is it?" as raw bytes (83 bytes, including the NUL and
/// the 4-byte UTF-8 encoding of the emoji).
pub(crate) fn blob_1_payload() -> Vec<u8> {
    let mut data = b"some blob \0 binary data ".to_vec();
    data.extend_from_slice("\u{1F92F}".as_bytes());
    data.extend_from_slice(b" that is not very very very very very very long, is it?");
    data
}

pub(crate) fn blob_1() -> Blob {
    Blob::builder("some-other-blob", blob_1_payload())
        .input_fields(vec![2])
        .snapshot_id(2)
        .sequence_number(1)
        .build()
        .unwrap()
}

pub(crate) fn file_properties() -> IndexMap<String, String> {
    let mut properties = IndexMap::new();
    properties.insert("created-by".to_string(), "Test 1234".to_string());
    properties
}
