// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::fmt;

use crate::SlaveId;

/// modbus-lorawan-codec Error
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The payload contains no bytes at all
    NoPayloadBytes,
    /// A read of `width` bytes at `offset` exceeds the available `len` bytes
    OutOfRangeRead {
        offset: usize,
        width: usize,
        len: usize,
    },
    /// A required field of a write command is missing
    MissingEncodeFields(&'static str),
    /// Only function codes 6 and 16 can be encoded
    UnsupportedFunctionCode(u8),
    /// Slave address outside of `0..=247`
    InvalidSlaveAddress(SlaveId),
    /// Register scale is zero, negative or not finite
    InvalidScale { name: String, scale: f64 },
    /// Bitmask declared on a register wider than 16 bit
    InvalidBitmask(String),
    /// Malformed register definition in a catalog
    InvalidDefinition {
        slave: SlaveId,
        index: u16,
        reason: &'static str,
    },
    /// Invalid byte count
    ByteCount(usize),
    /// Invalid buffer size
    BufferSize,
    /// Catalog configuration could not be loaded
    Config(String),
    /// Write request document could not be parsed
    InvalidInput(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Error::*;

        match self {
            NoPayloadBytes => write!(f, "No payload bytes"),
            OutOfRangeRead { offset, width, len } => write!(
                f,
                "Out of range read: {width} byte(s) at offset {offset}, payload length {len}"
            ),
            MissingEncodeFields(field) => write!(
                f,
                "Missing required field '{field}': slaveAddress, functionCode, register and values are required"
            ),
            UnsupportedFunctionCode(code) => {
                write!(f, "Unsupported function code: {code} (only 6 and 16)")
            }
            InvalidSlaveAddress(addr) => write!(f, "Invalid slave address: {addr}"),
            InvalidScale { name, scale } => {
                write!(f, "Invalid scale for register '{name}': {scale}")
            }
            InvalidBitmask(name) => {
                write!(f, "Bitmask on register '{name}' requires a 16 bit type")
            }
            InvalidDefinition {
                slave,
                index,
                reason,
            } => write!(
                f,
                "Invalid register definition (slave {slave}, index {index}): {reason}"
            ),
            ByteCount(cnt) => write!(f, "Invalid byte count: {cnt}"),
            BufferSize => write!(f, "Invalid buffer size"),
            Config(msg) => write!(f, "Invalid register catalog: {msg}"),
            InvalidInput(msg) => write!(f, "Invalid write request: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}
