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

use crate::errors::Error;
use crate::timer::Instance;
use crate::{error, trace};

/// PCT counter clock source, as encoded in the clock select field
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[repr(u8)]
pub enum ClockSource {
    /// Internal high speed oscillator divided by two
    #[default]
    HsiDiv2 = 0,
    /// 1kHz low speed internal oscillator
    Lsi1k = 1,
    /// Real time clock oscillator
    Rtc = 2,
    /// Functional clock configured in the peripheral clock controller
    Pcc = 3,
}

impl From<ClockSource> for u8 {
    fn from(val: ClockSource) -> Self {
        val as Self
    }
}

impl From<u8> for ClockSource {
    fn from(val: u8) -> Self {
        match val & 0x3 {
            0 => Self::HsiDiv2,
            1 => Self::Lsi1k,
            2 => Self::Rtc,
            _ => Self::Pcc,
        }
    }
}

/// Clock names understood by the clock tree
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ClockName {
    HsiDiv2,
    Lsi1k,
    Rtc,
    /// PCC functional clock of the given PCT instance
    PctFunctional(u8),
}

impl ClockSource {
    /// Clock tree node feeding this source on `instance`.
    pub fn clock_name(self, instance: Instance) -> ClockName {
        match self {
            Self::HsiDiv2 => ClockName::HsiDiv2,
            Self::Lsi1k => ClockName::Lsi1k,
            Self::Rtc => ClockName::Rtc,
            Self::Pcc => ClockName::PctFunctional(instance.index()),
        }
    }
}

/// Frequency lookup in the system clock tree.
///
/// Implemented by the board's clock driver. The tree may be reconfigured
/// at any time, so results must not be cached across calls.
pub trait ClockTree {
    /// Current frequency of `clock` in Hz, or [Error::ClockNotRunning].
    fn frequency(&self, clock: ClockName) -> Result<u32, Error>;
}

impl<T: ClockTree + ?Sized> ClockTree for &T {
    fn frequency(&self, clock: ClockName) -> Result<u32, Error> {
        (**self).frequency(clock)
    }
}

/// Resolves the frequency driving `source` on `instance`.
///
/// A zero frequency is a caller bug wherever a time conversion follows: it
/// asserts in debug builds and fails with [Error::ZeroFrequency] otherwise.
pub fn resolve_frequency<C: ClockTree>(
    clocks: &C,
    source: ClockSource,
    instance: Instance,
) -> Result<u32, Error> {
    let name = source.clock_name(instance);
    let freq = clocks.frequency(name).inspect_err(|e| {
        error!("clock {:?} lookup failed: {:?}", name, e);
    })?;
    trace!("clock {:?} at {} Hz", name, freq);
    if freq == 0 {
        debug_assert!(false, "PCT clock {:?} resolved to 0 Hz", name);
        return Err(Error::ZeroFrequency);
    }
    Ok(freq)
}
