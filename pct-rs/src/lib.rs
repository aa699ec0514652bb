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

//! Pulse/Counter Timer (PCT) driver
//!
//! The PCT counts either prescaled clock edges (time mode) or external
//! pulses (pulse-count mode) and raises an event when the 16-bit counter
//! reaches the compare value.
//!
//! The main entry point is [Pct]. Register access goes through the
//! [PctRegisters] trait and clock frequencies come from a [ClockTree], so
//! the driver itself owns no global state.
//!
//! The time/tick conversion pieces are public on their own:
//! [counts], [range] and [search] are pure functions that can be called
//! from interrupt context.
//!
//! Basic usage:
//! ```no_run
//! # use pct::{Pct, Instance, Config, CompareUnits, PctRegisters, ClockTree};
//! # fn demo<R: PctRegisters, C: ClockTree>(regs: R, clocks: C) -> Result<(), pct::Error> {
//! let mut timer = Pct::new(Instance::new(0)?, regs, clocks);
//! let config = Config::default()
//!     .with_compare_value(4_000_000)
//!     .with_compare_units(CompareUnits::Micros);
//! timer.init(&config)?;
//! timer.start()?;
//! # Ok(())
//! # }
//! ```
#![no_std]

#[cfg(any(test, feature = "std"))]
extern crate std;

#[cfg(feature = "defmt")]
pub(crate) use defmt::{debug, error, info, trace, warn};
#[cfg(not(feature = "defmt"))]
pub(crate) use log::{debug, error, info, trace, warn};

pub mod clock;
pub mod config;
pub mod counts;
pub mod errors;
pub mod prescaler;
pub mod range;
pub mod registers;
pub mod search;
mod timer;

pub use clock::{ClockName, ClockSource, ClockTree};
pub use config::{
    Callback, CompareReadSelect, CompareUnits, Config, PinPolarity, PinSelect, WorkMode,
};
pub use errors::Error;
pub use prescaler::Prescaler;
pub use registers::PctRegisters;
pub use search::ClockConfig;
pub use timer::{CompareStatus, Events, Instance, Pct, State, INSTANCE_COUNT};
