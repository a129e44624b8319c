//! Integer readers for container headers
//!
//! RIFF headers mix byte orders: chunk identifiers are stored high byte
//! first while sizes and format fields are little-endian. These readers
//! return `i32` across the board so header arithmetic stays in one type,
//! with the sign carried down from the top byte.

use crate::error::Result;
use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::io::Read;

/// Extension trait adding header integer reads to any `Read` source.
///
/// A short read surfaces as `Error::Io` with `UnexpectedEof`, which
/// callers treat as a truncated header.
pub trait ByteReader: Read {
    /// Read a 32-bit integer stored high byte first.
    fn read_i32_be(&mut self) -> Result<i32> {
        Ok(ReadBytesExt::read_i32::<BigEndian>(self)?)
    }

    /// Read a 32-bit integer stored low byte first.
    fn read_i32_le(&mut self) -> Result<i32> {
        Ok(ReadBytesExt::read_i32::<LittleEndian>(self)?)
    }

    /// Read a 16-bit little-endian integer, sign-extended to `i32`.
    fn read_i16_le(&mut self) -> Result<i32> {
        Ok(i32::from(ReadBytesExt::read_i16::<LittleEndian>(self)?))
    }
}

impl<R: Read + ?Sized> ByteReader for R {}
