// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Serialize, Serializer, ser::SerializeMap};

use super::Word;

/// A single decoded register value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Scaled numeric value of a declared register
    Number(f64),
    /// Unscaled word of an undeclared register
    Raw(Word),
    /// Expanded bitmask register
    Flags(Flags),
}

impl Value {
    /// The numeric value, if this is not a bitmask.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Raw(w) => Some(f64::from(*w)),
            Self::Flags(_) => None,
        }
    }

    #[must_use]
    pub const fn as_flags(&self) -> Option<&Flags> {
        match self {
            Self::Flags(flags) => Some(flags),
            _ => None,
        }
    }
}

/// Largest magnitude below which every integral `f64` is exact.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

impl Serialize for Value {
    /// Integral numbers are written without a fraction (`812`, not `812.0`).
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(v) if v.fract() == 0.0 && v.abs() < MAX_EXACT_INTEGER => {
                serializer.serialize_i64(*v as i64)
            }
            Self::Number(v) => serializer.serialize_f64(*v),
            Self::Raw(word) => serializer.serialize_u16(*word),
            Self::Flags(flags) => flags.serialize(serializer),
        }
    }
}

/// Named boolean flags, ordered by bit index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags(Vec<(String, bool)>);

impl Flags {
    pub(crate) fn push(&mut self, name: String, state: bool) {
        self.0.push((name, state));
    }

    /// Get the state of a flag by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<bool> {
        self.0
            .iter()
            .find_map(|(n, state)| (n == name).then_some(*state))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(n, state)| (n.as_str(), *state))
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

impl Serialize for Flags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, state) in &self.0 {
            map.serialize_entry(name, state)?;
        }
        map.end()
    }
}

/// Decoded field values in frame order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedValues(Vec<(String, Value)>);

impl DecodedValues {
    /// Insert a value.
    ///
    /// A field that already exists keeps its position and gets the new value.
    pub fn insert(&mut self, name: String, value: Value) {
        if let Some(slot) = self.0.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.0.push((name, value));
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find_map(|(n, v)| (n == name).then_some(v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
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

impl Serialize for DecodedValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
