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

//! Conversions between microseconds, raw clock counts and prescaled ticks.
//!
//! All functions are pure and safe to call from interrupt context.

use crate::errors::Error;
use crate::prescaler::MAX_EXPONENT;
use crate::warn;

pub const MICROS_PER_SEC: u64 = 1_000_000;

/// Raw clock edges in `micros` at `freq_hz`, rounded half up.
///
/// `freq_hz` must be nonzero; callers resolve a running clock first.
pub fn micros_to_counts(freq_hz: u32, micros: u32) -> u64 {
    debug_assert!(freq_hz != 0, "micros_to_counts on a stopped clock");
    (micros as u64 * freq_hz as u64 + MICROS_PER_SEC / 2) / MICROS_PER_SEC
}

/// Prescaled tick count for `counts`, rounded half up.
pub fn counts_to_ticks(counts: u64, exponent: u32) -> u64 {
    debug_assert!(exponent <= MAX_EXPONENT);
    let divisor = 1u64 << exponent;
    (counts + divisor / 2) / divisor
}

/// Duration in microseconds of a zero-based compare value `ticks`.
///
/// The counter fires after `ticks + 1` prescaled ticks. Results past
/// `u32::MAX` are reported as [Error::MicrosOverflow] instead of being
/// truncated.
pub fn ticks_to_micros(freq_hz: u32, exponent: u32, ticks: u16) -> Result<u32, Error> {
    if freq_hz == 0 {
        debug_assert!(false, "ticks_to_micros on a stopped clock");
        return Err(Error::ZeroFrequency);
    }
    debug_assert!(exponent <= MAX_EXPONENT);
    let counts = (ticks as u64 + 1) << exponent;
    let micros = counts * MICROS_PER_SEC / freq_hz as u64;
    u32::try_from(micros).map_err(|_| {
        warn!(
            "{} ticks at {} Hz exponent {}: {} us, clamped to {}",
            ticks as u32 + 1,
            freq_hz,
            exponent,
            micros,
            u32::MAX
        );
        Error::MicrosOverflow
    })
}

/// Like [ticks_to_micros], but saturates at `u32::MAX` on overflow.
///
/// For diagnostics next to a failed [ticks_to_micros].
pub fn clamped_micros(freq_hz: u32, exponent: u32, ticks: u16) -> u32 {
    match ticks_to_micros(freq_hz, exponent, ticks) {
        Ok(micros) => micros,
        Err(Error::MicrosOverflow) => u32::MAX,
        Err(_) => 0,
    }
}
