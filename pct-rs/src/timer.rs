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

use crate::clock::{resolve_frequency, ClockSource, ClockTree};
use crate::config::{Callback, CompareReadSelect, CompareUnits, Config, PinPolarity, WorkMode};
use crate::counts::ticks_to_micros;
use crate::errors::Error;
use crate::prescaler::Prescaler;
use crate::range::ticks_to_compare_value;
use crate::registers::{FieldAccess, PctRegisters};
use crate::search::{choose_clock_config, micros_to_compare_value, ClockConfig};
use crate::{debug, info, warn};

/// Number of PCT instances on the chip.
pub const INSTANCE_COUNT: u8 = 4;

/// Index of a PCT instance
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Instance(u8);

impl Instance {
    pub fn new(index: u8) -> Result<Self, Error> {
        if index >= INSTANCE_COUNT {
            return Err(Error::InvalidInstance(index));
        }
        Ok(Self(index))
    }

    pub fn index(&self) -> u8 {
        self.0
    }
}

bitflags::bitflags! {
    /// Events reported to the callback
    ///
    /// The PCT has a single event flag: counter overflow in free-run mode
    /// and the compare match both raise it, so both arrive as
    /// [Events::COMPARE].
    #[derive(Debug, PartialEq, Eq, Clone, Copy)]
    pub struct Events: u8 {
        /// Counter reached the compare value or wrapped
        const COMPARE = 0x01;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Events {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Events({=u8:#x})", self.bits())
    }
}

/// Counter state
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum State {
    Stopped,
    Running,
}

/// Outcome of programming a compare value
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CompareStatus {
    /// Counter is below the new compare value
    Armed,
    /// Counter already reached the new compare value; the event may have
    /// been missed or is imminent. The value is programmed regardless.
    Timeout,
}

/// A PCT instance
///
/// Owns the register block, the clock tree handle and the installed
/// callback of one peripheral instance.
///
/// If the compare interrupt is enabled, reprogram inside
/// [Pct::with_interrupt_masked] so the handler never sees a half-written
/// configuration.
pub struct Pct<R: PctRegisters, C: ClockTree> {
    instance: Instance,
    regs: FieldAccess<R>,
    clocks: C,
    callback: Option<Callback>,
}

impl<R: PctRegisters, C: ClockTree> Pct<R, C> {
    pub fn new(instance: Instance, regs: R, clocks: C) -> Self {
        Self {
            instance,
            regs: FieldAccess::new(regs),
            clocks,
            callback: None,
        }
    }

    /// Gives back the register block and clock tree.
    pub fn release(self) -> (R, C) {
        (self.regs.release(), self.clocks)
    }

    pub fn instance(&self) -> Instance {
        self.instance
    }

    fn frequency(&mut self) -> Result<u32, Error> {
        let source = self.clock_source()?;
        resolve_frequency(&self.clocks, source, self.instance)
    }

    /// Works out prescaler and compare value before touching hardware.
    fn plan(&self, config: &Config) -> Result<ClockConfig, Error> {
        match (config.compare_units, config.work_mode) {
            (CompareUnits::Ticks, _) => Ok(ClockConfig {
                prescaler: config.prescaler,
                bypass: config.bypass,
                compare_value: ticks_to_compare_value(config.compare_value as u64)?,
            }),
            (CompareUnits::Micros, WorkMode::Time) => {
                let freq = resolve_frequency(&self.clocks, config.clock_source, self.instance)?;
                choose_clock_config(freq, config.compare_value)
            }
            (CompareUnits::Micros, WorkMode::PulseCount) => Err(Error::UnitMismatch),
        }
    }

    /// Applies a whole configuration, leaving the counter stopped.
    ///
    /// Microsecond durations in time mode pick the prescaler
    /// automatically. If the duration is not representable nothing is
    /// written.
    pub fn init(&mut self, config: &Config) -> Result<(), Error> {
        let plan = self.plan(config)?;
        debug!(
            "PCT{} init: {:?} {:?} prescaler {:?} bypass {} compare {}",
            self.instance.index(),
            config.work_mode,
            config.clock_source,
            plan.prescaler,
            plan.bypass,
            plan.compare_value
        );

        self.regs.set_counter_enabled(false)?;
        self.regs.set_interrupt_enabled(false)?;
        self.regs.clear_compare_flag()?;

        self.regs
            .set_pulse_mode(config.work_mode == WorkMode::PulseCount)?;
        self.regs.set_free_run(config.free_run)?;
        self.regs.set_pin_select(config.pin_select.into())?;
        self.regs
            .set_pin_falling(config.pin_polarity == PinPolarity::FallingEdge)?;
        self.regs
            .set_read_latched(config.read_select == CompareReadSelect::Latched)?;

        self.regs.set_clock_source_code(config.clock_source.into())?;
        self.regs.set_prescaler_code(plan.prescaler.code())?;
        self.regs.set_bypass(plan.bypass)?;
        self.regs.set_compare_value(plan.compare_value)?;

        self.callback = config.callback;
        if config.interrupt_enable {
            self.regs.set_interrupt_enabled(true)?;
        }
        Ok(())
    }

    /// Stops the counter and restores the reset configuration.
    pub fn deinit(&mut self) -> Result<(), Error> {
        debug!("PCT{} deinit", self.instance.index());
        self.callback = None;
        self.regs.reset()
    }

    /// Starts counting.
    ///
    /// In time mode without bypass the clock must be running.
    pub fn start(&mut self) -> Result<(), Error> {
        if self.work_mode()? == WorkMode::Time && !self.regs.bypass()? {
            self.frequency()?;
        }
        info!("PCT{} start", self.instance.index());
        self.regs.set_counter_enabled(true)
    }

    /// Stops counting. Always allowed.
    pub fn stop(&mut self) -> Result<(), Error> {
        info!("PCT{} stop", self.instance.index());
        self.regs.set_counter_enabled(false)
    }

    pub fn state(&mut self) -> Result<State, Error> {
        Ok(if self.regs.counter_enabled()? {
            State::Running
        } else {
            State::Stopped
        })
    }

    pub fn work_mode(&mut self) -> Result<WorkMode, Error> {
        Ok(if self.regs.pulse_mode()? {
            WorkMode::PulseCount
        } else {
            WorkMode::Time
        })
    }

    pub fn clock_source(&mut self) -> Result<ClockSource, Error> {
        Ok(self.regs.clock_source_code()?.into())
    }

    pub fn set_clock_source(&mut self, source: ClockSource) -> Result<(), Error> {
        self.regs.set_clock_source_code(source.into())
    }

    pub fn prescaler(&mut self) -> Result<Prescaler, Error> {
        Prescaler::try_from(self.regs.prescaler_code()?)
    }

    pub fn bypass(&mut self) -> Result<bool, Error> {
        self.regs.bypass()
    }

    pub fn set_prescaler(&mut self, prescaler: Prescaler, bypass: bool) -> Result<(), Error> {
        self.regs.set_prescaler_code(prescaler.code())?;
        self.regs.set_bypass(bypass)
    }

    fn exponent(&mut self) -> Result<u32, Error> {
        let bypass = self.regs.bypass()?;
        Ok(self.prescaler()?.exponent(bypass))
    }

    fn write_compare(&mut self, compare_value: u16) -> Result<CompareStatus, Error> {
        self.regs.set_compare_value(compare_value)?;
        if !self.regs.counter_enabled()? {
            return Ok(CompareStatus::Armed);
        }
        let counter = self.regs.counter()?;
        if counter >= compare_value {
            warn!(
                "PCT{} counter {} already past compare {}",
                self.instance.index(),
                counter,
                compare_value
            );
            Ok(CompareStatus::Timeout)
        } else {
            Ok(CompareStatus::Armed)
        }
    }

    /// Programs the compare event `nticks` prescaled ticks after start.
    ///
    /// `nticks` must be in 1..=65536, otherwise nothing is written.
    pub fn set_compare_ticks(&mut self, nticks: u32) -> Result<CompareStatus, Error> {
        let compare_value = ticks_to_compare_value(nticks as u64)?;
        self.write_compare(compare_value)
    }

    /// Programs the compare event `micros` after start using the current
    /// clock source and prescaler.
    ///
    /// Fails without writing if the duration does not fit at the current
    /// prescaler.
    pub fn set_compare_micros(&mut self, micros: u32) -> Result<CompareStatus, Error> {
        if self.work_mode()? == WorkMode::PulseCount {
            return Err(Error::UnitMismatch);
        }
        let freq = self.frequency()?;
        let exponent = self.exponent()?;
        let compare_value = micros_to_compare_value(freq, exponent, micros)?;
        self.write_compare(compare_value)
    }

    /// Programmed tick count, compare register value plus one.
    pub fn compare_ticks(&mut self) -> Result<u32, Error> {
        Ok(self.regs.compare_value()? as u32 + 1)
    }

    /// Programmed duration in microseconds. Time mode only.
    pub fn compare_micros(&mut self) -> Result<u32, Error> {
        if self.work_mode()? == WorkMode::PulseCount {
            return Err(Error::UnitMismatch);
        }
        let compare_value = self.regs.compare_value()?;
        let freq = self.frequency()?;
        let exponent = self.exponent()?;
        ticks_to_micros(freq, exponent, compare_value)
    }

    /// Current counter value.
    pub fn counter(&mut self) -> Result<u16, Error> {
        self.regs.counter()
    }

    /// Current counter value converted to microseconds. Time mode only.
    pub fn counter_micros(&mut self) -> Result<u32, Error> {
        if self.work_mode()? == WorkMode::PulseCount {
            return Err(Error::UnitMismatch);
        }
        let counter = self.regs.counter()?;
        if counter == 0 {
            return Ok(0);
        }
        let freq = self.frequency()?;
        let exponent = self.exponent()?;
        ticks_to_micros(freq, exponent, counter - 1)
    }

    pub fn enable_interrupt(&mut self) -> Result<(), Error> {
        self.regs.set_interrupt_enabled(true)
    }

    pub fn disable_interrupt(&mut self) -> Result<(), Error> {
        self.regs.set_interrupt_enabled(false)
    }

    pub fn is_flag_set(&mut self) -> Result<bool, Error> {
        self.regs.compare_flag()
    }

    pub fn clear_flag(&mut self) -> Result<(), Error> {
        self.regs.clear_compare_flag()
    }

    /// Installs the compare callback, replacing any previous one.
    pub fn install_callback(&mut self, callback: Callback) {
        self.callback = Some(callback);
    }

    pub fn remove_callback(&mut self) {
        self.callback = None;
    }

    /// Interrupt handler body.
    ///
    /// Call this from the PCT interrupt. Clears the pending flag and
    /// dispatches to the installed callback.
    pub fn on_interrupt(&mut self) -> Result<Events, Error> {
        let mut events = Events::empty();
        if self.regs.compare_flag()? {
            self.regs.clear_compare_flag()?;
            events |= Events::COMPARE;
        }
        if !events.is_empty() {
            if let Some(callback) = self.callback {
                callback(self.instance, events, 0);
            }
        }
        Ok(events)
    }

    /// Runs `f` with the compare interrupt disabled, then restores it.
    pub fn with_interrupt_masked<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let was_enabled = self.regs.interrupt_enabled()?;
        if was_enabled {
            self.regs.set_interrupt_enabled(false)?;
        }
        let res = f(self);
        if was_enabled {
            self.regs.set_interrupt_enabled(true)?;
        }
        res
    }
}
