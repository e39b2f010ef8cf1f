// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Device register catalog
//!
//! A catalog maps a slave address to the register layout of the device,
//! keyed by logical register index. 32 bit types occupy one index but two
//! physical registers, so the index following such a definition stays unused.

use std::{collections::BTreeMap, io::Read, sync::OnceLock};

use serde::{Deserialize, Serialize};

use crate::{error::*, frame::SlaveId};

type Result<T> = core::result::Result<T, Error>;

/// Register data type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Uint16,
    Int16,
    Uint32,
    Int32,
    Float32,
}

impl DataType {
    /// Number of bytes occupied in the frame.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::Uint16 | Self::Int16 => 2,
            Self::Uint32 | Self::Int32 | Self::Float32 => 4,
        }
    }

    /// Number of 16 bit registers occupied.
    #[must_use]
    pub const fn register_count(self) -> u16 {
        (self.width() / 2) as u16
    }
}

/// Byte order of a register value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endian {
    /// `ABCD`
    #[default]
    Big,
    /// `DCBA`
    Little,
    /// `CDAB`: registers swapped, bytes within a register big-endian
    Mixed,
}

/// Bit index to flag name mapping of a status register.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bitmask(BTreeMap<u8, String>);

impl Bitmask {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_flag(mut self, bit: u8, name: impl Into<String>) -> Self {
        self.0.insert(bit, name.into());
        self
    }

    /// Iterate over `(bit, name)` in ascending bit order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &str)> {
        self.0.iter().map(|(bit, name)| (*bit, name.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(u8, S)> for Bitmask {
    fn from_iter<T: IntoIterator<Item = (u8, S)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(bit, name)| (bit, name.into())).collect())
    }
}

const fn default_scale() -> f64 {
    1.0
}

/// Layout of a single register value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterDefinition {
    /// Output field name
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
    /// Divisor applied to the raw value
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub endian: Endian,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitmask: Option<Bitmask>,
}

impl RegisterDefinition {
    /// Create a big-endian definition with a scale of `1`.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            scale: default_scale(),
            endian: Endian::Big,
            bitmask: None,
        }
    }

    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub fn with_endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    #[must_use]
    pub fn with_bitmask(mut self, bitmask: Bitmask) -> Self {
        self.bitmask = Some(bitmask);
        self
    }

    /// Number of bytes occupied in the frame.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.data_type.width()
    }

    /// Number of 16 bit registers occupied.
    #[must_use]
    pub const fn register_count(&self) -> u16 {
        self.data_type.register_count()
    }

    /// A scale is usable if it is finite and strictly positive.
    #[must_use]
    pub fn has_valid_scale(&self) -> bool {
        self.scale.is_finite() && self.scale > 0.0
    }

    fn check(&self) -> core::result::Result<(), &'static str> {
        if !self.has_valid_scale() {
            return Err("scale must be finite and greater than zero");
        }
        if let Some(bitmask) = &self.bitmask {
            if self.data_type != DataType::Uint16 {
                return Err("bitmask is only supported on uint16 registers");
            }
            if bitmask.iter().any(|(bit, _)| bit > 15) {
                return Err("bitmask bit index exceeds 15");
            }
        }
        Ok(())
    }
}

/// Register layout of a single device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegisterTable(BTreeMap<u16, RegisterDefinition>);

static EMPTY_TABLE: RegisterTable = RegisterTable(BTreeMap::new());

impl RegisterTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_register(mut self, index: u16, definition: RegisterDefinition) -> Self {
        self.0.insert(index, definition);
        self
    }

    /// Get the definition at a logical register index.
    #[must_use]
    pub fn get(&self, index: u16) -> Option<&RegisterDefinition> {
        self.0.get(&index)
    }

    /// Iterate over the definitions in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &RegisterDefinition)> {
        self.0.iter().map(|(index, def)| (*index, def))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Register tables of all known devices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegisterCatalog(BTreeMap<SlaveId, RegisterTable>);

impl RegisterCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_device(mut self, slave: SlaveId, table: RegisterTable) -> Self {
        self.insert(slave, table);
        self
    }

    /// Add or replace the table of a device.
    pub fn insert(&mut self, slave: SlaveId, table: RegisterTable) {
        self.0.insert(slave, table);
    }

    /// Get the register table of a device.
    ///
    /// Unknown slaves get an empty table.
    #[must_use]
    pub fn device(&self, slave: SlaveId) -> &RegisterTable {
        self.0.get(&slave).unwrap_or(&EMPTY_TABLE)
    }

    #[must_use]
    pub fn contains(&self, slave: SlaveId) -> bool {
        self.0.contains_key(&slave)
    }

    /// Load and validate a catalog from its JSON representation.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load and validate a catalog from a JSON reader.
    pub fn from_json_reader(reader: impl Read) -> Result<Self> {
        let catalog: Self = serde_json::from_reader(reader)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check every definition of every device.
    ///
    /// Besides the per-definition checks this rejects indices that fall into
    /// the second register of a preceding 32 bit value.
    pub fn validate(&self) -> Result<()> {
        for (&slave, table) in &self.0 {
            let mut next_free = 0u16;
            for (index, def) in table.iter() {
                let reason = if index < next_free {
                    Err("index overlaps the preceding 32 bit register")
                } else {
                    def.check()
                };
                if let Err(reason) = reason {
                    #[cfg(feature = "log")]
                    log::error!("Rejecting register '{}' of slave {slave}: {reason}", def.name);
                    return Err(Error::InvalidDefinition {
                        slave,
                        index,
                        reason,
                    });
                }
                next_free = index.saturating_add(def.register_count());
            }
        }
        Ok(())
    }

    /// Demo catalog with a single environmental sensor at slave address `1`.
    pub fn builtin() -> &'static Self {
        static BUILTIN: OnceLock<RegisterCatalog> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let sensor = RegisterTable::new()
                .with_register(
                    0,
                    RegisterDefinition::new("temperature", DataType::Int16).with_scale(1000.0),
                )
                .with_register(
                    1,
                    RegisterDefinition::new("humidity", DataType::Uint16).with_scale(10.0),
                )
                .with_register(
                    2,
                    RegisterDefinition::new("status", DataType::Uint16).with_bitmask(
                        Bitmask::new()
                            .with_flag(0, "system_ok")
                            .with_flag(1, "heater_on")
                            .with_flag(2, "fan_on")
                            .with_flag(3, "error_flag"),
                    ),
                )
                .with_register(
                    3,
                    RegisterDefinition::new("energy", DataType::Uint32).with_scale(1000.0),
                )
                .with_register(
                    5,
                    RegisterDefinition::new("power", DataType::Float32).with_endian(Endian::Mixed),
                );
            RegisterCatalog::new().with_device(1, sensor)
        })
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    const CATALOG_JSON: &str = r#"{
        "1": {
            "0": { "name": "temperature", "type": "int16", "scale": 1000 },
            "1": { "name": "humidity", "type": "uint16", "scale": 10, "endian": "big" },
            "2": {
                "name": "status",
                "type": "uint16",
                "bitmask": { "0": "system_ok", "1": "heater_on", "2": "fan_on", "3": "error_flag" }
            },
            "3": { "name": "energy", "type": "uint32", "endian": "mixed" }
        },
        "17": {
            "0": { "name": "pressure", "type": "float32", "endian": "little" }
        }
    }"#;

    #[test]
    fn data_type_width() {
        assert_eq!(DataType::Uint16.width(), 2);
        assert_eq!(DataType::Int16.width(), 2);
        assert_eq!(DataType::Uint32.width(), 4);
        assert_eq!(DataType::Int32.width(), 4);
        assert_eq!(DataType::Float32.width(), 4);
        assert_eq!(DataType::Float32.register_count(), 2);
        assert_eq!(DataType::Int16.register_count(), 1);
    }

    #[test]
    fn unknown_slave_has_empty_table() {
        let catalog = RegisterCatalog::new();
        assert!(catalog.device(42).is_empty());
        assert!(!catalog.contains(42));
    }

    #[test]
    fn load_catalog_from_json() {
        let catalog = RegisterCatalog::from_json_str(CATALOG_JSON).unwrap();
        let table = catalog.device(1);
        assert_eq!(table.len(), 4);

        let temperature = table.get(0).unwrap();
        assert_eq!(temperature.data_type, DataType::Int16);
        assert_eq!(temperature.scale, 1000.0);
        assert_eq!(temperature.endian, Endian::Big);

        let status = table.get(2).unwrap();
        let flags: Vec<_> = status.bitmask.as_ref().unwrap().iter().collect();
        assert_eq!(
            flags,
            [
                (0, "system_ok"),
                (1, "heater_on"),
                (2, "fan_on"),
                (3, "error_flag")
            ]
        );

        let energy = table.get(3).unwrap();
        assert_eq!(energy.scale, 1.0);
        assert_eq!(energy.endian, Endian::Mixed);

        assert_eq!(catalog.device(17).get(0).unwrap().endian, Endian::Little);
    }

    #[test]
    fn load_catalog_from_reader() {
        let catalog = RegisterCatalog::from_json_reader(CATALOG_JSON.as_bytes()).unwrap();
        assert!(catalog.contains(17));
    }

    #[test]
    fn reject_unknown_data_type() {
        let json = r#"{ "1": { "0": { "name": "x", "type": "uint64" } } }"#;
        assert!(matches!(
            RegisterCatalog::from_json_str(json),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn reject_zero_scale() {
        let json = r#"{ "1": { "0": { "name": "x", "type": "uint16", "scale": 0 } } }"#;
        assert_eq!(
            RegisterCatalog::from_json_str(json).err().unwrap(),
            Error::InvalidDefinition {
                slave: 1,
                index: 0,
                reason: "scale must be finite and greater than zero"
            }
        );
    }

    #[test]
    fn reject_bitmask_on_wide_register() {
        let catalog = RegisterCatalog::new().with_device(
            3,
            RegisterTable::new().with_register(
                0,
                RegisterDefinition::new("alarms", DataType::Uint32)
                    .with_bitmask(Bitmask::new().with_flag(0, "a")),
            ),
        );
        assert!(matches!(
            catalog.validate(),
            Err(Error::InvalidDefinition {
                slave: 3,
                index: 0,
                ..
            })
        ));
    }

    #[test]
    fn reject_bitmask_bit_out_of_range() {
        let catalog = RegisterCatalog::new().with_device(
            1,
            RegisterTable::new().with_register(
                0,
                RegisterDefinition::new("alarms", DataType::Uint16)
                    .with_bitmask(Bitmask::new().with_flag(16, "a")),
            ),
        );
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn reject_overlapping_index() {
        let catalog = RegisterCatalog::new().with_device(
            1,
            RegisterTable::new()
                .with_register(2, RegisterDefinition::new("energy", DataType::Uint32))
                .with_register(3, RegisterDefinition::new("voltage", DataType::Uint16)),
        );
        assert_eq!(
            catalog.validate().err().unwrap(),
            Error::InvalidDefinition {
                slave: 1,
                index: 3,
                reason: "index overlaps the preceding 32 bit register"
            }
        );

        let catalog = RegisterCatalog::new().with_device(
            1,
            RegisterTable::new()
                .with_register(2, RegisterDefinition::new("energy", DataType::Uint32))
                .with_register(4, RegisterDefinition::new("voltage", DataType::Uint16)),
        );
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = RegisterCatalog::builtin();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.device(1).len(), 5);
        assert!(core::ptr::eq(catalog, RegisterCatalog::builtin()));
    }

    #[test]
    fn serialize_catalog_back_to_json() {
        let catalog = RegisterCatalog::from_json_str(CATALOG_JSON).unwrap();
        let json = serde_json::to_string(&catalog).unwrap();
        assert_eq!(RegisterCatalog::from_json_str(&json).unwrap(), catalog);
    }
}
