// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE.txt for details)

//! This crate implements a Chip-8 virtual machine as if it were a real CPU architecture.
//!
//! The [CPU] owns memory, registers, timers, the stack, and the keypad.
//! The [Screen] is passed to each instruction, so a frontend can present it
//! however it likes. [Chip8] bundles the two, and runs them a frame at a time.
//!
//! # Examples
//! ```rust
//! use chip8vm::*;
//! let mut ch8 = Chip8::new(&[
//!     0x60, 0x0a, // ld v0, #0a
//!     0x70, 0x05, // add v0, #05
//!     0x12, 0x04, // jp $204
//! ]).unwrap();
//! ch8.frame(10).unwrap();
//! assert_eq!(0x0f, ch8.cpu.v()[0]);
//! assert_eq!(0x204, ch8.cpu.pc());
//! ```

pub mod cpu;
pub mod error;
pub mod screen;

use std::path::Path;

// Common imports for chip8vm
pub use cpu::{
    flags::Flags,
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn,
    },
    CPU,
};
pub use error::{Error, Result};
pub use screen::Screen;

/// Holds the state of a Chip-8
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Chip8 {
    /// Contains the registers, timers, memory, etc.
    pub cpu: CPU,
    /// Contains the frame buffer
    pub screen: Screen,
}

impl Chip8 {
    /// Constructs a Chip-8 with `rom` in its program space
    pub fn new(rom: &[u8]) -> Result<Self> {
        let mut ch8 = Self::default();
        ch8.cpu.load_program_bytes(rom)?;
        Ok(ch8)
    }

    /// Constructs a Chip-8 with the file at `rom` in its program space
    pub fn load(rom: impl AsRef<Path>) -> Result<Self> {
        let mut ch8 = Self::default();
        ch8.cpu.load_program(rom)?;
        Ok(ch8)
    }

    /// Runs one 60Hz frame: up to `ipf` instructions, then one timer tick.
    ///
    /// Timers tick even if an instruction fails, so a breakpoint doesn't stall them.
    pub fn frame(&mut self, ipf: usize) -> Result<&mut Self> {
        let result = self.cpu.multistep(&mut self.screen, ipf).map(|_| ());
        self.cpu.tick_timers();
        result?;
        Ok(self)
    }

    /// Resets the CPU and clears the screen, keeping the loaded program
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.screen.clear();
    }
}

/// Common imports for chip8vm
pub mod prelude {
    pub use super::{Chip8, Dis, Disassembler, Error, Flags, Insn, Result, Screen, CPU};
    pub use crate::cpu::{
        keys::KEY_COUNT,
        mem::{Mem, Region},
        stack::STACK_DEPTH,
    };
    pub use crate::screen::{HEIGHT, WIDTH};
}
