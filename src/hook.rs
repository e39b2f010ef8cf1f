// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Network server payload hook documents
//!
//! Decoding yields `{ "data": { ... } }` and encoding yields
//! `{ "bytes": [...] }`. Any failure yields `{ "errors": ["..."] }` instead.

use serde::{Deserialize, Serialize};

use crate::{
    catalog::RegisterCatalog,
    codec::{downlink, uplink},
    error::*,
    frame::*,
};

type Result<T> = core::result::Result<T, Error>;

/// Payload of a successful uplink decoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UplinkData {
    pub slave_address: SlaveId,
    pub function_code: u8,
    pub values: DecodedValues,
}

impl From<DecodedFrame> for UplinkData {
    fn from(frame: DecodedFrame) -> Self {
        let DecodedFrame { hdr, values } = frame;
        Self {
            slave_address: hdr.slave,
            function_code: hdr.function.value(),
            values,
        }
    }
}

/// Result document of an uplink decoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DecodeOutput {
    Data { data: UplinkData },
    Errors { errors: Vec<String> },
}

impl From<Result<DecodedFrame>> for DecodeOutput {
    fn from(res: Result<DecodedFrame>) -> Self {
        match res {
            Ok(frame) => Self::Data { data: frame.into() },
            Err(err) => Self::Errors {
                errors: vec![err.to_string()],
            },
        }
    }
}

/// Write request as handed over by the network server.
///
/// All fields are optional so that missing ones can be reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodeInput {
    pub slave_address: Option<SlaveId>,
    pub function_code: Option<u8>,
    pub register: Option<i64>,
    pub values: Option<Vec<Option<i64>>>,
}

impl EncodeInput {
    /// Convert into a write command.
    ///
    /// Negative values are sent as two's complement and `null` values as 0.
    pub fn to_command(&self) -> Result<WriteCommand> {
        let slave = self
            .slave_address
            .ok_or(Error::MissingEncodeFields("slaveAddress"))?;
        let function = self
            .function_code
            .ok_or(Error::MissingEncodeFields("functionCode"))?;
        let register = self
            .register
            .ok_or(Error::MissingEncodeFields("register"))?;
        let values = self
            .values
            .as_ref()
            .ok_or(Error::MissingEncodeFields("values"))?;
        let register = Address::try_from(register)
            .map_err(|_| Error::InvalidInput(format!("register {register} out of range")))?;
        let values = values
            .iter()
            .map(|v| to_word(v.unwrap_or(0)))
            .collect::<Result<_>>()?;
        Ok(WriteCommand::new(slave, function, register, values))
    }
}

fn to_word(value: i64) -> Result<Word> {
    Word::try_from(value)
        .or_else(|_| i16::try_from(value).map(|v| v as Word))
        .map_err(|_| Error::InvalidInput(format!("value {value} out of range")))
}

/// Result document of a downlink encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EncodeOutput {
    Bytes { bytes: Vec<u8> },
    Errors { errors: Vec<String> },
}

impl From<Result<Vec<u8>>> for EncodeOutput {
    fn from(res: Result<Vec<u8>>) -> Self {
        match res {
            Ok(bytes) => Self::Bytes { bytes },
            Err(err) => Self::Errors {
                errors: vec![err.to_string()],
            },
        }
    }
}

/// Decode uplink payload bytes.
pub fn decode_uplink(bytes: &[u8], catalog: &RegisterCatalog) -> DecodeOutput {
    let res = uplink::decode(bytes, catalog);
    #[cfg(feature = "log")]
    let res = res.inspect_err(|err| log::warn!("Failed to decode uplink {bytes:02X?}: {err}"));
    res.into()
}

/// Encode a downlink write request.
pub fn encode_downlink(input: &EncodeInput) -> EncodeOutput {
    let res = input
        .to_command()
        .and_then(|cmd| downlink::encode_to_vec(&cmd));
    #[cfg(feature = "log")]
    let res = res.inspect_err(|err| log::warn!("Failed to encode downlink {input:?}: {err}"));
    res.into()
}

/// Encode a downlink write request given as JSON document.
pub fn encode_downlink_json(input: serde_json::Value) -> EncodeOutput {
    serde_json::from_value::<EncodeInput>(input)
        .map_err(|err| Error::InvalidInput(err.to_string()))
        .map_or_else(
            |err| EncodeOutput::Errors {
                errors: vec![err.to_string()],
            },
            |input| encode_downlink(&input),
        )
}
