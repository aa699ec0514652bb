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

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pct::registers::Reg;
use pct::{ClockName, ClockTree, Error, Instance, Pct, PctRegisters};

pub const TCF: u32 = 0x80;

#[derive(Default, Debug)]
pub struct RegState {
    pub csr: u32,
    pub psr: u32,
    pub cmr: u32,
    /// Live counter, copied to `cnr` on a CNR write.
    pub counter: u16,
    pub cnr: u32,
    pub writes: Vec<(Reg, u32)>,
}

/// In-memory PCT register block shared with the test body.
#[derive(Clone, Default)]
pub struct FakeRegs(pub Rc<RefCell<RegState>>);

impl FakeRegs {
    pub fn state(&self) -> std::cell::Ref<'_, RegState> {
        self.0.borrow()
    }

    pub fn set_counter(&self, counter: u16) {
        self.0.borrow_mut().counter = counter;
    }

    /// Hardware side: compare event happened.
    pub fn raise_compare(&self) {
        self.0.borrow_mut().csr |= TCF;
    }

    pub fn config_writes(&self) -> usize {
        self.0
            .borrow()
            .writes
            .iter()
            .filter(|(r, _)| *r != Reg::Cnr)
            .count()
    }
}

impl PctRegisters for FakeRegs {
    fn read(&mut self, reg: Reg) -> Result<u32, Error> {
        let s = self.0.borrow();
        Ok(match reg {
            Reg::Csr => s.csr,
            Reg::Psr => s.psr,
            Reg::Cmr => s.cmr,
            Reg::Cnr => s.cnr,
        })
    }

    fn write(&mut self, reg: Reg, val: u32) -> Result<(), Error> {
        let mut s = self.0.borrow_mut();
        s.writes.push((reg, val));
        match reg {
            Reg::Csr => {
                let tcf = if val & TCF != 0 { 0 } else { s.csr & TCF };
                s.csr = (val & !TCF) | tcf;
            }
            Reg::Psr => s.psr = val,
            Reg::Cmr => s.cmr = val & 0xFFFF,
            Reg::Cnr => s.cnr = s.counter as u32,
        }
        Ok(())
    }
}

/// Clock tree with adjustable frequencies; `None` means not running.
pub struct FakeClocks {
    pub hsi_div2: Cell<Option<u32>>,
    pub lsi_1k: Cell<Option<u32>>,
    pub rtc: Cell<Option<u32>>,
    pub pcc: Cell<Option<u32>>,
}

impl Default for FakeClocks {
    fn default() -> Self {
        Self {
            hsi_div2: Cell::new(Some(24_000_000)),
            lsi_1k: Cell::new(Some(1_000)),
            rtc: Cell::new(Some(32_768)),
            pcc: Cell::new(None),
        }
    }
}

impl ClockTree for FakeClocks {
    fn frequency(&self, clock: ClockName) -> Result<u32, Error> {
        let f = match clock {
            ClockName::HsiDiv2 => self.hsi_div2.get(),
            ClockName::Lsi1k => self.lsi_1k.get(),
            ClockName::Rtc => self.rtc.get(),
            ClockName::PctFunctional(_) => self.pcc.get(),
        };
        f.ok_or(Error::ClockNotRunning)
    }
}

pub fn make_pct(clocks: &FakeClocks) -> (Pct<FakeRegs, &FakeClocks>, FakeRegs) {
    let regs = FakeRegs::default();
    let pct = Pct::new(Instance::new(0).unwrap(), regs.clone(), clocks);
    (pct, regs)
}
