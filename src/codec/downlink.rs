// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Downlink write command encoding

use super::*;

/// Maximum number of registers a single write multiple request can carry.
pub const MAX_WRITE_QUANTITY: usize = 123;

/// Encode a write command into `buf`.
///
/// Returns the number of bytes written.
pub fn encode(cmd: &WriteCommand, buf: &mut [u8]) -> Result<usize> {
    let WriteCommand {
        slave,
        function,
        register,
        values,
    } = cmd;
    if *slave > MAX_SLAVE_ADDRESS {
        return Err(Error::InvalidSlaveAddress(*slave));
    }
    let len = match function {
        FunctionCode::WriteSingleRegister => 6,
        FunctionCode::WriteMultipleRegisters => {
            if values.len() > MAX_WRITE_QUANTITY {
                return Err(Error::ByteCount(values.len() * 2));
            }
            7 + values.len() * 2
        }
        _ => return Err(Error::UnsupportedFunctionCode(function.value())),
    };
    if buf.len() < len {
        return Err(Error::BufferSize);
    }
    buf[0] = *slave;
    buf[1] = function.value();
    buf[2..4].copy_from_slice(&encode_word(*register));
    match function {
        FunctionCode::WriteSingleRegister => {
            let value = values.first().copied().unwrap_or(0);
            buf[4..6].copy_from_slice(&encode_word(value));
        }
        _ => {
            buf[4..6].copy_from_slice(&encode_word(values.len() as u16));
            buf[6] = (values.len() * 2) as u8;
            for (chunk, v) in buf[7..len].chunks_exact_mut(2).zip(values) {
                chunk.copy_from_slice(&encode_word(*v));
            }
        }
    }
    Ok(len)
}

/// Encode a write command into a new byte vector.
pub fn encode_to_vec(cmd: &WriteCommand) -> Result<Vec<u8>> {
    let len = cmd
        .frame_len()
        .ok_or(Error::UnsupportedFunctionCode(cmd.function.value()))?;
    let mut buf = vec![0; len];
    let len = encode(cmd, &mut buf)?;
    buf.truncate(len);
    Ok(buf)
}
