// SPDX-FileCopyrightText: Copyright (c) 2018-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

#![doc = include_str!("../README.md")]

pub mod catalog;
mod codec;
mod error;
mod frame;
pub mod hook;

pub use catalog::{Bitmask, DataType, Endian, RegisterCatalog, RegisterDefinition, RegisterTable};
pub use codec::{bitmask, downlink, uplink};
pub use codec::{RawValue, decode_raw, decode_value, encode_raw, encode_word, reorder};
pub use error::*;
pub use frame::*;
