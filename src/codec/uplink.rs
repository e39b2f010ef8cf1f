// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Uplink frame decoding
//!
//! An uplink carries a read response without CRC:
//! `slave | function | byte count | register bytes...`

use super::*;

/// Extract the header of an uplink frame.
pub fn decode_header(buf: &[u8]) -> Result<Header> {
    if buf.is_empty() {
        return Err(Error::NoPayloadBytes);
    }
    if buf.len() < HEADER_LEN {
        return Err(Error::OutOfRangeRead {
            offset: 0,
            width: HEADER_LEN,
            len: buf.len(),
        });
    }
    let hdr = Header {
        slave: buf[0],
        function: FunctionCode::new(buf[1]),
        byte_count: buf[2],
    };
    if hdr.frame_end() > buf.len() {
        return Err(Error::OutOfRangeRead {
            offset: HEADER_LEN,
            width: usize::from(hdr.byte_count),
            len: buf.len(),
        });
    }
    Ok(hdr)
}

/// Decode an uplink frame against the register table of its slave.
///
/// Registers without a definition are reported as `register_<index>`
/// with their raw value.
pub fn decode(buf: &[u8], catalog: &RegisterCatalog) -> Result<DecodedFrame> {
    let hdr = decode_header(buf)?;
    let table = catalog.device(hdr.slave);
    let data = &buf[HEADER_LEN..hdr.frame_end()];

    let mut values = DecodedValues::default();
    let mut cursor = 0;
    let mut index: u16 = 0;

    while cursor < data.len() {
        let (name, value, width, count) = match table.get(index) {
            Some(def) => {
                let width = def.width();
                let value = decode_value(def, &data[cursor..])
                    .map_err(|err| at_offset(err, HEADER_LEN + cursor))?;
                (def.name.clone(), value, width, def.register_count())
            }
            None => {
                let word = decode_raw(DataType::Uint16, Endian::Big, &data[cursor..])
                    .map_err(|err| at_offset(err, HEADER_LEN + cursor))?
                    .as_word()
                    .unwrap_or_default();
                #[cfg(feature = "log")]
                log::debug!(
                    "No definition for register {index} of slave {}, using raw value",
                    hdr.slave
                );
                (format!("register_{index}"), Value::Raw(word), 2, 1)
            }
        };
        values.insert(name, value);
        cursor += width;
        index = index.saturating_add(count);
    }
    Ok(DecodedFrame { hdr, values })
}

// Windows are passed relative to the register data.
fn at_offset(err: Error, offset: usize) -> Error {
    match err {
        Error::OutOfRangeRead { width, len, .. } => Error::OutOfRangeRead {
            offset,
            width,
            len: offset + len,
        },
        err => err,
    }
}
