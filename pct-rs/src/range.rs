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

//! Compare register range checks.
//!
//! The compare register holds a zero-based countdown: a compare value of
//! `n` fires after `n + 1` ticks. Every path that programs a duration goes
//! through [ticks_to_compare_value].

use crate::errors::Error;
use crate::warn;

/// Largest tick count the 16-bit compare register can represent.
pub const MAX_TICKS: u64 = 1 << 16;

/// Compare value written for [MAX_TICKS], also the clamp on overflow.
pub const MAX_COMPARE_VALUE: u16 = u16::MAX;

/// Converts a tick count into the compare register value.
///
/// * `Err(ZeroTicks)` if `nticks` is 0, the duration rounded to nothing.
/// * `Err(TicksOverflow)` if `nticks` is above [MAX_TICKS].
pub fn ticks_to_compare_value(nticks: u64) -> Result<u16, Error> {
    if nticks == 0 {
        warn!("duration rounds to zero ticks");
        return Err(Error::ZeroTicks);
    }
    if nticks > MAX_TICKS {
        warn!("{} ticks overflow compare register", nticks);
        return Err(Error::TicksOverflow(nticks));
    }
    Ok((nticks - 1) as u16)
}

/// Best-effort compare value for diagnostics: clamps instead of failing.
pub fn clamped_compare_value(nticks: u64) -> u16 {
    match ticks_to_compare_value(nticks) {
        Ok(v) => v,
        Err(Error::TicksOverflow(_)) => MAX_COMPARE_VALUE,
        Err(_) => 0,
    }
}
