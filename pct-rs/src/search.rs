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

//! Automatic prescaler selection.
//!
//! Picks the finest prescaler whose tick count still fits the compare
//! register, so the programmed duration keeps as much resolution as the
//! hardware allows.

use crate::counts::{counts_to_ticks, micros_to_counts};
use crate::errors::Error;
use crate::prescaler::{Prescaler, BYPASS_EXPONENT, MAX_EXPONENT};
use crate::range::{clamped_compare_value, ticks_to_compare_value, MAX_TICKS};
use crate::{trace, warn};

/// Prescaler, bypass and compare value chosen for a duration
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ClockConfig {
    pub prescaler: Prescaler,
    pub bypass: bool,
    pub compare_value: u16,
}

impl ClockConfig {
    /// Shift amount this configuration applies to raw counts.
    pub fn exponent(&self) -> u32 {
        self.prescaler.exponent(self.bypass)
    }
}

/// First exponent, finest to coarsest, whose tick count fits.
///
/// Returns the exponent and its tick count. If even [MAX_EXPONENT]
/// overflows, that exponent's result is returned for the range check to
/// reject. At most `MAX_EXPONENT + 1` iterations.
pub fn search_exponent(counts: u64) -> (u32, u64) {
    let mut exponent = BYPASS_EXPONENT;
    loop {
        let nticks = counts_to_ticks(counts, exponent);
        if nticks <= MAX_TICKS || exponent == MAX_EXPONENT {
            return (exponent, nticks);
        }
        exponent += 1;
    }
}

/// Chooses prescaler, bypass and compare value for `micros` at `freq_hz`.
///
/// Fails with the range error if the duration rounds to zero ticks or
/// still overflows at the coarsest prescaler.
pub fn choose_clock_config(freq_hz: u32, micros: u32) -> Result<ClockConfig, Error> {
    let counts = micros_to_counts(freq_hz, micros);
    let (exponent, nticks) = search_exponent(counts);
    trace!(
        "{} us at {} Hz: {} counts, exponent {}, {} ticks",
        micros,
        freq_hz,
        counts,
        exponent,
        nticks
    );
    let compare_value = ticks_to_compare_value(nticks).inspect_err(|_| {
        warn!(
            "{} us not representable at {} Hz (best effort compare {})",
            micros,
            freq_hz,
            clamped_compare_value(nticks)
        );
    })?;
    // search_exponent never leaves 0..=MAX_EXPONENT
    let (prescaler, bypass) =
        Prescaler::from_exponent(exponent).unwrap_or((Prescaler::Div65536, false));
    Ok(ClockConfig {
        prescaler,
        bypass,
        compare_value,
    })
}

/// Compare value for `micros` at a fixed, caller-chosen prescaler exponent.
pub fn micros_to_compare_value(freq_hz: u32, exponent: u32, micros: u32) -> Result<u16, Error> {
    let counts = micros_to_counts(freq_hz, micros);
    ticks_to_compare_value(counts_to_ticks(counts, exponent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counts::ticks_to_micros;

    #[test]
    fn test_short_duration_bypasses() {
        let cfg = choose_clock_config(24_000_000, 1000).unwrap();
        assert_eq!(
            cfg,
            ClockConfig {
                prescaler: Prescaler::Div2,
                bypass: true,
                compare_value: 23_999,
            }
        );
        assert_eq!(cfg.exponent(), 0);
    }

    #[test]
    fn test_four_seconds_at_24mhz() {
        let cfg = choose_clock_config(24_000_000, 4_000_000).unwrap();
        assert!(!cfg.bypass);
        assert_eq!(cfg.prescaler.code(), 10);
        assert_eq!(cfg.prescaler, Prescaler::Div2048);
        assert_eq!(cfg.compare_value, 46_874);
    }

    #[test]
    fn test_zero_duration() {
        assert_eq!(choose_clock_config(24_000_000, 0), Err(Error::ZeroTicks));
        // 0.4 counts at 1kHz
        assert_eq!(choose_clock_config(1_000, 400), Err(Error::ZeroTicks));
    }

    #[test]
    fn test_too_long() {
        // ~71 minutes at 48MHz needs far more than 2^32 counts
        match choose_clock_config(48_000_000, u32::MAX) {
            Err(Error::TicksOverflow(n)) => assert!(n > MAX_TICKS),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_fixed_exponent() {
        assert_eq!(micros_to_compare_value(24_000_000, 0, 1000), Ok(23_999));
        assert_eq!(micros_to_compare_value(24_000_000, 11, 4_000_000), Ok(46_874));
        assert_eq!(
            micros_to_compare_value(24_000_000, 10, 4_000_000),
            Err(Error::TicksOverflow(93_750))
        );
        assert_eq!(micros_to_compare_value(32_768, 16, 1000), Err(Error::ZeroTicks));
    }

    #[test]
    fn test_exact_boundaries() {
        assert_eq!(search_exponent(65_536), (0, 65_536));
        assert_eq!(search_exponent(65_537), (1, 32_769));
        assert_eq!(search_exponent(0), (0, 0));
        assert_eq!(search_exponent(u64::MAX >> 1).0, MAX_EXPONENT);
    }

    #[test]
    fn test_minimality() {
        for counts in [1u64, 1_000, 65_536, 65_537, 131_072, 131_073, 9_999_999] {
            let (e, nticks) = search_exponent(counts);
            assert!(nticks <= MAX_TICKS);
            if e > 0 {
                assert!(counts_to_ticks(counts, e - 1) > MAX_TICKS);
            }
        }
    }

    #[test]
    fn test_readback_within_one_tick() {
        // Keep at least one count per microsecond of tick so that truncation
        // to whole microseconds cannot move more than one tick.
        for freq in [1_000u32, 32_768, 1_000_000, 24_000_000] {
            for e in 0..=MAX_EXPONENT {
                if (freq as u64 >> e) > 1_000_000 {
                    continue;
                }
                for t in [40_000u16, 50_000, 65_535] {
                    let Ok(us) = ticks_to_micros(freq, e, t) else {
                        continue;
                    };
                    let cfg = choose_clock_config(freq, us).unwrap();
                    assert_eq!(cfg.exponent(), e, "freq {} e {} t {}", freq, e, t);
                    let diff = (cfg.compare_value as i32 - t as i32).abs();
                    assert!(diff <= 1, "freq {} e {} t {} got {}", freq, e, t, cfg.compare_value);
                }
            }
        }
    }
}
