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

/// PCT driver errors
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// Requested duration rounds to zero ticks
    ZeroTicks,
    /// Tick count does not fit the 16-bit compare register.
    /// Carries the computed tick count; the clamped value is
    /// [crate::range::MAX_COMPARE_VALUE].
    TicksOverflow(u64),
    /// Readback does not fit in 32-bit microseconds
    MicrosOverflow,
    /// Clock tree reports the clock as not running
    ClockNotRunning,
    /// Clock resolved to 0 Hz where a live clock is required
    ZeroFrequency,
    /// Peripheral instance index out of range
    InvalidInstance(u8),
    /// Prescaler code outside 0..=15
    InvalidPrescaler(u8),
    /// Microsecond compare units are meaningless when counting pulses
    UnitMismatch,
    /// Register interface failed
    Register,
}

impl Error {
    /// True for failures of the representable range check.
    pub fn is_range_error(&self) -> bool {
        matches!(self, Self::ZeroTicks | Self::TicksOverflow(_))
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ZeroTicks => f.write_str("duration rounds to zero ticks"),
            Self::TicksOverflow(n) => write!(f, "{} ticks overflow the compare register", n),
            Self::MicrosOverflow => f.write_str("microseconds overflow u32"),
            Self::ClockNotRunning => f.write_str("clock not running"),
            Self::ZeroFrequency => f.write_str("clock frequency is zero"),
            Self::InvalidInstance(i) => write!(f, "invalid PCT instance {}", i),
            Self::InvalidPrescaler(c) => write!(f, "invalid prescaler code {}", c),
            Self::UnitMismatch => f.write_str("microsecond units in pulse-count mode"),
            Self::Register => f.write_str("register access failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
