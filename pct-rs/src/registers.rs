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
use crate::trace;

/// PCT register offsets
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Reg {
    /// Control and status
    Csr = 0x00,
    /// Prescale and clock select
    Psr = 0x04,
    /// Compare value
    Cmr = 0x08,
    /// Counter value, latched by a write
    Cnr = 0x0C,
}

impl From<Reg> for u32 {
    fn from(val: Reg) -> Self {
        val as u32
    }
}

/// Counter enable.
pub(crate) const CSR_TEN_BIT: u32 = 0x01;
/// Pulse-count mode select.
pub(crate) const CSR_TMS_BIT: u32 = 0x02;
/// Free running counter, no reset on compare.
pub(crate) const CSR_TFC_BIT: u32 = 0x04;
/// Pulse input is active low / falling edge.
pub(crate) const CSR_TPP_BIT: u32 = 0x08;
/// Pulse input pin select.
pub(crate) const CSR_TPS_SHIFT: u32 = 4;
pub(crate) const CSR_TPS_MASK: u32 = 0x3 << CSR_TPS_SHIFT;
/// Compare interrupt enable.
pub(crate) const CSR_TIE_BIT: u32 = 0x40;
/// Compare flag, write 1 to clear.
pub(crate) const CSR_TCF_BIT: u32 = 0x80;
/// Compare value read select: latched at last compare event.
pub(crate) const CSR_CRS_BIT: u32 = 0x100;

/// Clock source select.
pub(crate) const PSR_PCS_MASK: u32 = 0x3;
/// Prescaler bypass.
pub(crate) const PSR_PBYP_BIT: u32 = 0x04;
/// Prescaler value.
pub(crate) const PSR_PRESCALE_SHIFT: u32 = 3;
pub(crate) const PSR_PRESCALE_MASK: u32 = 0xF << PSR_PRESCALE_SHIFT;

/// Mask for the 16-bit compare and counter registers.
pub(crate) const LOW_16_BIT_MASK: u32 = 0xFFFF;

/// Reset values.
pub(crate) const CSR_RESET: u32 = 0;
pub(crate) const PSR_RESET: u32 = 0;
pub(crate) const CMR_RESET: u32 = 0;

/// Trait for reading and writing the PCT register block
///
/// Implemented per board, typically with volatile accesses at the
/// instance base address. Accesses are assumed atomic with respect to the
/// calling context.
pub trait PctRegisters {
    /// Read a 32-bit register
    fn read(&mut self, reg: Reg) -> Result<u32, Error>;
    /// Write a 32-bit register
    fn write(&mut self, reg: Reg, val: u32) -> Result<(), Error>;
}

impl<T: PctRegisters + ?Sized> PctRegisters for &mut T {
    fn read(&mut self, reg: Reg) -> Result<u32, Error> {
        (**self).read(reg)
    }
    fn write(&mut self, reg: Reg, val: u32) -> Result<(), Error> {
        (**self).write(reg, val)
    }
}

/// Field level access on top of [PctRegisters]
pub(crate) struct FieldAccess<R: PctRegisters> {
    regs: R,
}

impl<R: PctRegisters> FieldAccess<R> {
    pub fn new(regs: R) -> Self {
        Self { regs }
    }

    pub fn release(self) -> R {
        self.regs
    }

    fn modify(&mut self, reg: Reg, mask: u32, val: u32) -> Result<(), Error> {
        let mut cur = self.regs.read(reg)?;
        if reg == Reg::Csr {
            // Writing back a set TCF would clear it
            cur &= !CSR_TCF_BIT;
        }
        let new = (cur & !mask) | (val & mask);
        trace!("{:?}: {:#x} -> {:#x}", reg, cur, new);
        self.regs.write(reg, new)
    }

    fn set_bit(&mut self, reg: Reg, bit: u32, set: bool) -> Result<(), Error> {
        self.modify(reg, bit, if set { bit } else { 0 })
    }

    fn bit(&mut self, reg: Reg, bit: u32) -> Result<bool, Error> {
        Ok(self.regs.read(reg)? & bit != 0)
    }

    pub fn compare_value(&mut self) -> Result<u16, Error> {
        Ok((self.regs.read(Reg::Cmr)? & LOW_16_BIT_MASK) as u16)
    }

    pub fn set_compare_value(&mut self, val: u16) -> Result<(), Error> {
        self.regs.write(Reg::Cmr, val as u32)
    }

    pub fn prescaler_code(&mut self) -> Result<u8, Error> {
        Ok(((self.regs.read(Reg::Psr)? & PSR_PRESCALE_MASK) >> PSR_PRESCALE_SHIFT) as u8)
    }

    pub fn set_prescaler_code(&mut self, code: u8) -> Result<(), Error> {
        self.modify(
            Reg::Psr,
            PSR_PRESCALE_MASK,
            (code as u32) << PSR_PRESCALE_SHIFT,
        )
    }

    pub fn bypass(&mut self) -> Result<bool, Error> {
        self.bit(Reg::Psr, PSR_PBYP_BIT)
    }

    pub fn set_bypass(&mut self, bypass: bool) -> Result<(), Error> {
        self.set_bit(Reg::Psr, PSR_PBYP_BIT, bypass)
    }

    pub fn clock_source_code(&mut self) -> Result<u8, Error> {
        Ok((self.regs.read(Reg::Psr)? & PSR_PCS_MASK) as u8)
    }

    pub fn set_clock_source_code(&mut self, code: u8) -> Result<(), Error> {
        self.modify(Reg::Psr, PSR_PCS_MASK, code as u32)
    }

    pub fn counter_enabled(&mut self) -> Result<bool, Error> {
        self.bit(Reg::Csr, CSR_TEN_BIT)
    }

    pub fn set_counter_enabled(&mut self, enable: bool) -> Result<(), Error> {
        self.set_bit(Reg::Csr, CSR_TEN_BIT, enable)
    }

    pub fn compare_flag(&mut self) -> Result<bool, Error> {
        self.bit(Reg::Csr, CSR_TCF_BIT)
    }

    pub fn clear_compare_flag(&mut self) -> Result<(), Error> {
        let cur = self.regs.read(Reg::Csr)?;
        self.regs.write(Reg::Csr, cur | CSR_TCF_BIT)
    }

    pub fn interrupt_enabled(&mut self) -> Result<bool, Error> {
        self.bit(Reg::Csr, CSR_TIE_BIT)
    }

    pub fn set_interrupt_enabled(&mut self, enable: bool) -> Result<(), Error> {
        self.set_bit(Reg::Csr, CSR_TIE_BIT, enable)
    }

    pub fn pulse_mode(&mut self) -> Result<bool, Error> {
        self.bit(Reg::Csr, CSR_TMS_BIT)
    }

    pub fn set_pulse_mode(&mut self, pulse: bool) -> Result<(), Error> {
        self.set_bit(Reg::Csr, CSR_TMS_BIT, pulse)
    }

    pub fn set_free_run(&mut self, free_run: bool) -> Result<(), Error> {
        self.set_bit(Reg::Csr, CSR_TFC_BIT, free_run)
    }

    pub fn set_pin_falling(&mut self, falling: bool) -> Result<(), Error> {
        self.set_bit(Reg::Csr, CSR_TPP_BIT, falling)
    }

    pub fn set_pin_select(&mut self, pin: u8) -> Result<(), Error> {
        self.modify(Reg::Csr, CSR_TPS_MASK, (pin as u32) << CSR_TPS_SHIFT)
    }

    pub fn set_read_latched(&mut self, latched: bool) -> Result<(), Error> {
        self.set_bit(Reg::Csr, CSR_CRS_BIT, latched)
    }

    /// Current counter value. The write latches the running count.
    pub fn counter(&mut self) -> Result<u16, Error> {
        self.regs.write(Reg::Cnr, 0)?;
        Ok((self.regs.read(Reg::Cnr)? & LOW_16_BIT_MASK) as u16)
    }

    /// Restore the reset state, clearing a pending flag.
    pub fn reset(&mut self) -> Result<(), Error> {
        self.regs.write(Reg::Csr, CSR_RESET | CSR_TCF_BIT)?;
        self.regs.write(Reg::Psr, PSR_RESET)?;
        self.regs.write(Reg::Cmr, CMR_RESET)
    }
}
