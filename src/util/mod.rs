//! Common utilities and data structures

pub mod bytes;

pub use bytes::ByteReader;
