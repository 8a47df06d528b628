//! A reader and writer for the Puffin binary statistics-and-indexes
//! sidecar file format: an ordered sequence of opaque typed blobs plus a
//! JSON footer describing each blob's identity, byte range, compression,
//! and properties.
//!
//! The file-format codec (magic framing, footer JSON schema, compression
//! pipelines, and the writer's sequencing state machine) is the core of
//! this crate; [`io`] supplies the narrow `OutputFile`/`InputFile`
//! capability sets the codec treats as an external collaborator.

pub mod error;
pub mod io;
pub mod puffin;

pub use error::{Error, ErrorKind, Result};
