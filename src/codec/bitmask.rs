// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Status register expansion

use super::*;

/// Expand the bits of a status word into named flags.
///
/// Only bits listed in the bitmask are reported.
pub fn expand(word: Word, bitmask: &Bitmask) -> Flags {
    let mut flags = Flags::default();
    for (bit, name) in bitmask.iter() {
        let state = u32::from(word).checked_shr(u32::from(bit)).unwrap_or(0) & 0b1 > 0;
        flags.push(name.to_owned(), state);
    }
    flags
}
