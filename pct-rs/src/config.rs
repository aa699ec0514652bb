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

use crate::clock::ClockSource;
use crate::prescaler::Prescaler;
use crate::timer::{Events, Instance};

/// Compare event callback.
///
/// Invoked from [crate::Pct::on_interrupt] with the instance, the events
/// that fired and a reserved word that is always 0.
pub type Callback = fn(Instance, Events, u32);

/// What the counter counts
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum WorkMode {
    /// Prescaled clock edges
    #[default]
    Time,
    /// Edges on the selected input pin, prescaler acts as glitch filter
    PulseCount,
}

/// Units of [Config::compare_value]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum CompareUnits {
    /// Prescaled ticks until the compare event
    #[default]
    Ticks,
    /// Duration in microseconds, time mode only
    Micros,
}

/// Pulse input pin
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[repr(u8)]
pub enum PinSelect {
    #[default]
    Input0 = 0,
    Input1 = 1,
    Input2 = 2,
    Input3 = 3,
}

impl From<PinSelect> for u8 {
    fn from(val: PinSelect) -> Self {
        val as Self
    }
}

/// Pulse input edge counted
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum PinPolarity {
    #[default]
    RisingEdge,
    FallingEdge,
}

/// Which value a compare register read returns
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum CompareReadSelect {
    /// The value last programmed
    #[default]
    Programmed,
    /// The value latched at the last compare event
    Latched,
}

/// Whole-peripheral configuration, applied by [crate::Pct::init]
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub interrupt_enable: bool,
    pub free_run: bool,
    pub work_mode: WorkMode,
    pub clock_source: ClockSource,
    /// Ignored for [CompareUnits::Micros] in time mode, where the
    /// prescaler is chosen automatically.
    pub prescaler: Prescaler,
    pub bypass: bool,
    pub read_select: CompareReadSelect,
    /// Tick count (1..=65536) or microseconds, per `compare_units`.
    pub compare_value: u32,
    pub compare_units: CompareUnits,
    pub pin_select: PinSelect,
    pub pin_polarity: PinPolarity,
    pub callback: Option<Callback>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interrupt_enable: false,
            free_run: false,
            work_mode: WorkMode::Time,
            clock_source: ClockSource::HsiDiv2,
            prescaler: Prescaler::Div2,
            bypass: true,
            read_select: CompareReadSelect::Programmed,
            compare_value: 1,
            compare_units: CompareUnits::Ticks,
            pin_select: PinSelect::Input0,
            pin_polarity: PinPolarity::RisingEdge,
            callback: None,
        }
    }
}

impl Config {
    pub fn with_interrupt(mut self, enable: bool) -> Self {
        self.interrupt_enable = enable;
        self
    }

    pub fn with_free_run(mut self, free_run: bool) -> Self {
        self.free_run = free_run;
        self
    }

    pub fn with_work_mode(mut self, mode: WorkMode) -> Self {
        self.work_mode = mode;
        self
    }

    pub fn with_clock_source(mut self, source: ClockSource) -> Self {
        self.clock_source = source;
        self
    }

    pub fn with_prescaler(mut self, prescaler: Prescaler, bypass: bool) -> Self {
        self.prescaler = prescaler;
        self.bypass = bypass;
        self
    }

    pub fn with_read_select(mut self, select: CompareReadSelect) -> Self {
        self.read_select = select;
        self
    }

    pub fn with_compare_value(mut self, value: u32) -> Self {
        self.compare_value = value;
        self
    }

    pub fn with_compare_units(mut self, units: CompareUnits) -> Self {
        self.compare_units = units;
        self
    }

    pub fn with_pin(mut self, pin: PinSelect, polarity: PinPolarity) -> Self {
        self.pin_select = pin;
        self.pin_polarity = polarity;
        self
    }

    pub fn with_callback(mut self, callback: Callback) -> Self {
        self.callback = Some(callback);
        self
    }
}
