// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Register value codec
//!
//! Values are reconstructed from a byte window of the register's width.
//! The window is first brought into big-endian order according to its
//! [`Endian`] and then interpreted as the declared [`DataType`].

use crate::{catalog::*, error::*, frame::*};
use byteorder::{BigEndian, ByteOrder};

pub mod bitmask;
pub mod downlink;
pub mod uplink;

type Result<T> = core::result::Result<T, Error>;

/// A reconstructed, unscaled register value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawValue {
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    F32(f32),
}

impl RawValue {
    #[must_use]
    pub const fn data_type(self) -> DataType {
        match self {
            Self::U16(_) => DataType::Uint16,
            Self::I16(_) => DataType::Int16,
            Self::U32(_) => DataType::Uint32,
            Self::I32(_) => DataType::Int32,
            Self::F32(_) => DataType::Float32,
        }
    }

    /// Widen the value without loss of precision.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        match self {
            Self::U16(v) => f64::from(v),
            Self::I16(v) => f64::from(v),
            Self::U32(v) => f64::from(v),
            Self::I32(v) => f64::from(v),
            Self::F32(v) => f64::from(v),
        }
    }

    /// The bit pattern of a 16 bit value.
    #[must_use]
    pub const fn as_word(self) -> Option<Word> {
        match self {
            Self::U16(v) => Some(v),
            Self::I16(v) => Some(v as u16),
            _ => None,
        }
    }
}

/// Bring a window into big-endian order.
///
/// [`Endian::Mixed`] swaps the two registers of a 4 byte window and leaves
/// a 2 byte window untouched.
#[must_use]
pub fn reorder<const N: usize>(window: [u8; N], endian: Endian) -> [u8; N] {
    let mut bytes = window;
    match endian {
        Endian::Big => {}
        Endian::Little => bytes.reverse(),
        Endian::Mixed => {
            if N == 4 {
                bytes.swap(0, 2);
                bytes.swap(1, 3);
            }
        }
    }
    bytes
}

fn window<const N: usize>(buf: &[u8]) -> Result<[u8; N]> {
    buf.get(..N)
        .and_then(|bytes| <[u8; N]>::try_from(bytes).ok())
        .ok_or(Error::OutOfRangeRead {
            offset: 0,
            width: N,
            len: buf.len(),
        })
}

/// Reconstruct a raw value from the leading bytes of `buf`.
pub fn decode_raw(data_type: DataType, endian: Endian, buf: &[u8]) -> Result<RawValue> {
    use DataType as t;

    let raw = match data_type {
        t::Uint16 | t::Int16 => {
            let word = BigEndian::read_u16(&reorder(window::<2>(buf)?, endian));
            match data_type {
                t::Uint16 => RawValue::U16(word),
                _ => RawValue::I16(word as i16),
            }
        }
        t::Uint32 | t::Int32 | t::Float32 => {
            let dword = BigEndian::read_u32(&reorder(window::<4>(buf)?, endian));
            match data_type {
                t::Uint32 => RawValue::U32(dword),
                t::Int32 => RawValue::I32(dword as i32),
                _ => RawValue::F32(f32::from_bits(dword)),
            }
        }
    };
    Ok(raw)
}

/// Serialize a raw value in the given byte order.
#[must_use]
pub fn encode_raw(raw: RawValue, endian: Endian) -> Vec<u8> {
    let mut bytes = [0; 4];
    match raw {
        RawValue::U16(v) => BigEndian::write_u16(&mut bytes, v),
        RawValue::I16(v) => BigEndian::write_i16(&mut bytes, v),
        RawValue::U32(v) => BigEndian::write_u32(&mut bytes, v),
        RawValue::I32(v) => BigEndian::write_i32(&mut bytes, v),
        RawValue::F32(v) => BigEndian::write_f32(&mut bytes, v),
    }
    match raw.data_type().width() {
        2 => reorder([bytes[0], bytes[1]], endian).to_vec(),
        _ => reorder(bytes, endian).to_vec(),
    }
}

/// Encode a single register word.
#[must_use]
pub fn encode_word(word: Word) -> [u8; 2] {
    let mut bytes = [0; 2];
    BigEndian::write_u16(&mut bytes, word);
    bytes
}

/// Decode and scale a register value.
///
/// Bitmask registers are expanded into flags and never scaled.
pub fn decode_value(def: &RegisterDefinition, buf: &[u8]) -> Result<Value> {
    let raw = decode_raw(def.data_type, def.endian, buf)?;
    if let Some(mask) = &def.bitmask {
        let word = raw
            .as_word()
            .ok_or_else(|| Error::InvalidBitmask(def.name.clone()))?;
        return Ok(Value::Flags(bitmask::expand(word, mask)));
    }
    if !def.has_valid_scale() {
        return Err(Error::InvalidScale {
            name: def.name.clone(),
            scale: def.scale,
        });
    }
    Ok(Value::Number(raw.to_f64() / def.scale))
}
