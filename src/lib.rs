#![cfg_attr(docsrs, feature(doc_cfg))]
//! Codecs for the integer streams and the geometry topology of columnar vector tiles.
//!
//! Every stream is written as its [`metadata::StreamMetadata`] followed by its payload.
//! Integer streams are encoded with a logical level technique (delta, run-length, ...) on top
//! of a physical one (varint or FastPFOR); geometry columns are written as length streams plus
//! a vertex buffer, optionally through a vertex dictionary ordered along a space-filling
//! curve.
#[macro_use]
pub mod error;

pub mod curve;
pub mod encoding;
pub mod geometry;
pub mod metadata;
pub mod read;
pub mod types;
pub mod write;
