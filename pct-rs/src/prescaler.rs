// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Prescaler settings.
//!
//! The 4-bit prescaler field selects a divisor of 2^1 .. 2^16. Divide by
//! one is not encodable in the field; it is selected with the separate
//! bypass bit. In pulse-count mode the same setting gives the glitch
//! filter width in clock cycles.

use crate::errors::Error;

/// Exponent used when the prescaler is bypassed (divisor 1).
pub const BYPASS_EXPONENT: u32 = 0;

/// Largest prescaler exponent the hardware supports (divisor 2^16).
pub const MAX_EXPONENT: u32 = 16;

/// Prescaler field values
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[repr(u8)]
pub enum Prescaler {
    #[default]
    Div2 = 0,
    Div4 = 1,
    Div8 = 2,
    Div16 = 3,
    Div32 = 4,
    Div64 = 5,
    Div128 = 6,
    Div256 = 7,
    Div512 = 8,
    Div1024 = 9,
    Div2048 = 10,
    Div4096 = 11,
    Div8192 = 12,
    Div16384 = 13,
    Div32768 = 14,
    Div65536 = 15,
}

// Indexed by field code.
const EXPONENTS: [(Prescaler, u32); 16] = [
    (Prescaler::Div2, 1),
    (Prescaler::Div4, 2),
    (Prescaler::Div8, 3),
    (Prescaler::Div16, 4),
    (Prescaler::Div32, 5),
    (Prescaler::Div64, 6),
    (Prescaler::Div128, 7),
    (Prescaler::Div256, 8),
    (Prescaler::Div512, 9),
    (Prescaler::Div1024, 10),
    (Prescaler::Div2048, 11),
    (Prescaler::Div4096, 12),
    (Prescaler::Div8192, 13),
    (Prescaler::Div16384, 14),
    (Prescaler::Div32768, 15),
    (Prescaler::Div65536, 16),
];

impl Prescaler {
    /// Register field code, 0..=15.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Divisor exponent of this setting when not bypassed.
    pub const fn divisor_exponent(self) -> u32 {
        EXPONENTS[self as usize].1
    }

    /// Shift amount applied to counts, taking bypass into account.
    pub const fn exponent(self, bypass: bool) -> u32 {
        if bypass {
            BYPASS_EXPONENT
        } else {
            self.divisor_exponent()
        }
    }

    /// Effective clock divisor, taking bypass into account.
    pub const fn divisor(self, bypass: bool) -> u32 {
        1 << self.exponent(bypass)
    }

    /// Glitch filter width in clock cycles used in pulse-count mode.
    pub const fn filter_cycles(self) -> u32 {
        1 << self.divisor_exponent()
    }

    /// Maps a search exponent back to a (setting, bypass) pair.
    ///
    /// Exponent 0 is only reachable through bypass, in which case the
    /// setting field is irrelevant and reported as [Prescaler::Div2].
    pub fn from_exponent(exponent: u32) -> Option<(Self, bool)> {
        if exponent == BYPASS_EXPONENT {
            return Some((Self::Div2, true));
        }
        EXPONENTS
            .iter()
            .find(|(_, e)| *e == exponent)
            .map(|(p, _)| (*p, false))
    }
}

impl TryFrom<u8> for Prescaler {
    type Error = Error;
    fn try_from(code: u8) -> Result<Self, Self::Error> {
        EXPONENTS
            .get(code as usize)
            .map(|(p, _)| *p)
            .ok_or(Error::InvalidPrescaler(code))
    }
}

impl From<Prescaler> for u8 {
    fn from(val: Prescaler) -> Self {
        val.code()
    }
}
