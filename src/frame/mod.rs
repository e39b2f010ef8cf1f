// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::fmt;

mod value;

pub use self::value::*;

/// Slave ID
pub type SlaveId = u8;

/// A Modbus address is represented by 16 bit (from `0` to `65535`).
pub type Address = u16;

/// Modbus uses 16 bit for its data items (big-endian representation).
pub type Word = u16;

/// Highest assignable slave address on a serial line.
pub const MAX_SLAVE_ADDRESS: SlaveId = 247;

/// Size of the `slave | function | byte count` header in front of the register bytes.
pub const HEADER_LEN: usize = 3;

/// A Modbus function code.
///
/// It is represented by an unsigned 8 bit integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionCode {
    /// Modbus Function Code: `03` (`0x03`).
    ReadHoldingRegisters,

    /// Modbus Function Code: `04` (`0x04`).
    ReadInputRegisters,

    /// Modbus Function Code: `06` (`0x06`).
    WriteSingleRegister,

    /// Modbus Function Code: `16` (`0x10`).
    WriteMultipleRegisters,

    /// Any other function code, echoed as received.
    Custom(u8),
}

impl FunctionCode {
    /// Create a new [`FunctionCode`] with `value`.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        match value {
            0x03 => Self::ReadHoldingRegisters,
            0x04 => Self::ReadInputRegisters,
            0x06 => Self::WriteSingleRegister,
            0x10 => Self::WriteMultipleRegisters,
            code => Self::Custom(code),
        }
    }

    /// Get the [`u8`] value of the current [`FunctionCode`].
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::ReadHoldingRegisters => 0x03,
            Self::ReadInputRegisters => 0x04,
            Self::WriteSingleRegister => 0x06,
            Self::WriteMultipleRegisters => 0x10,
            Self::Custom(code) => code,
        }
    }
}

impl From<u8> for FunctionCode {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for FunctionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value().fmt(f)
    }
}

/// Uplink frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub slave: SlaveId,
    pub function: FunctionCode,
    /// Number of register bytes following the header
    pub byte_count: u8,
}

impl Header {
    /// One past the last register byte of the frame.
    #[must_use]
    pub const fn frame_end(&self) -> usize {
        HEADER_LEN + self.byte_count as usize
    }
}

/// A decoded uplink frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedFrame {
    pub hdr: Header,
    pub values: DecodedValues,
}

/// A register write to be sent as downlink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteCommand {
    pub slave: SlaveId,
    pub function: FunctionCode,
    /// Starting register address
    pub register: Address,
    pub values: Vec<Word>,
}

impl WriteCommand {
    #[must_use]
    pub fn new(
        slave: SlaveId,
        function: impl Into<FunctionCode>,
        register: Address,
        values: Vec<Word>,
    ) -> Self {
        Self {
            slave,
            function: function.into(),
            register,
            values,
        }
    }

    /// Number of bytes required for the serialized frame.
    ///
    /// Returns `None` for function codes that cannot be encoded.
    #[must_use]
    pub fn frame_len(&self) -> Option<usize> {
        match self.function {
            FunctionCode::WriteSingleRegister => Some(6),
            FunctionCode::WriteMultipleRegisters => Some(7 + self.values.len() * 2),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn function_code_into_u8() {
        let x: u8 = FunctionCode::WriteMultipleRegisters.value();
        assert_eq!(x, 16);
        let x: u8 = FunctionCode::Custom(0xBB).value();
        assert_eq!(x, 0xBB);
    }

    #[test]
    fn function_code_from_u8() {
        assert_eq!(FunctionCode::new(3), FunctionCode::ReadHoldingRegisters);
        assert_eq!(FunctionCode::new(6), FunctionCode::WriteSingleRegister);
        assert_eq!(FunctionCode::new(0x10), FunctionCode::WriteMultipleRegisters);
        assert_eq!(FunctionCode::new(5), FunctionCode::Custom(5));
        assert_eq!(FunctionCode::from(0xBB), FunctionCode::Custom(0xBB));
    }

    #[test]
    fn header_frame_end() {
        let hdr = Header {
            slave: 1,
            function: FunctionCode::ReadHoldingRegisters,
            byte_count: 4,
        };
        assert_eq!(hdr.frame_end(), 7);
    }

    #[test]
    fn write_command_frame_len() {
        assert_eq!(WriteCommand::new(1, 6, 0, vec![1]).frame_len(), Some(6));
        assert_eq!(
            WriteCommand::new(1, 16, 0, vec![1, 2, 3]).frame_len(),
            Some(13)
        );
        assert_eq!(WriteCommand::new(1, 5, 0, vec![1]).frame_len(), None);
    }
}
