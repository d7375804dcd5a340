// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Decodes and runs instructions


pub mod behavior;
pub mod flags;
pub mod instruction;
pub mod keys;
pub mod mem;
pub mod stack;

use self::{
    flags::Flags,
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn,
    },
    keys::Keys,
    mem::{Mem, PROGRAM_START},
    stack::{Stack, StackFault},
};
use crate::{
    error::{Error, Result},
    screen::Screen,
};
use std::{fmt::Debug, path::Path};

type Reg = usize;
/// A 12-bit address, stored in 16 bits
pub type Adr = u16;
type Nib = u8;

/// Represents the internal state of the CPU interpreter
#[derive(Clone, PartialEq)]
pub struct CPU {
    /// Flags that control how the CPU behaves, but which aren't inherent to the
    /// chip-8. Includes pause, keypause, etc.
    pub flags: Flags,
    // memory
    mem: Mem,
    stack: Stack,
    // registers
    pc: Adr,
    i: Adr,
    v: [u8; 16],
    delay: u8,
    sound: u8,
    // I/O
    keys: Keys,
    // Execution data
    cycle: usize,
    breakpoints: Vec<Adr>,
}

// public interface
impl CPU {
    /// Constructs a new CPU with the glyph table loaded, and no program
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let cpu = CPU::new();
    /// assert_eq!(0x200, cpu.pc());
    /// assert_eq!(0, cpu.sp());
    /// ```
    pub fn new() -> Self {
        CPU {
            flags: Flags::default(),
            mem: Mem::new(),
            stack: Stack::new(),
            pc: PROGRAM_START,
            i: 0,
            v: [0; 16],
            delay: 0,
            sound: 0,
            keys: Keys::new(),
            cycle: 0,
            breakpoints: vec![],
        }
    }

    /// Loads a program from disk into the CPU's program space
    ///
    /// Returns [Error::RomReadFailure] if the file can't be read,
    /// or [Error::RomTooLarge] if it doesn't fit.
    pub fn load_program(&mut self, rom: impl AsRef<Path>) -> Result<&mut Self> {
        let rom = rom.as_ref();
        let bytes = mem::read_rom(rom)?;
        log::debug!("Loaded {} ({} bytes)", rom.display(), bytes.len());
        self.load_program_bytes(&bytes)
    }

    /// Loads bytes into the CPU's program space
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[0x60, 0x0a]).unwrap();
    /// assert_eq!(0x60, cpu.mem().read(0x200));
    /// ```
    pub fn load_program_bytes(&mut self, rom: &[u8]) -> Result<&mut Self> {
        self.mem.load_program(rom)?;
        Ok(self)
    }

    /// Presses a key, and reports whether the key's state changed.
    /// If key does not exist, returns [Error::InvalidKey].
    ///
    /// If [Flags::keypause] was enabled, it is disabled,
    /// and the [Flags::lastkey] is recorded.
    ///
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    ///
    /// // press key `7`
    /// let did_press = cpu.press(0x7).unwrap();
    /// assert!(did_press);
    ///
    /// // press key `7` again, even though it's already pressed
    /// let did_press = cpu.press(0x7).unwrap();
    /// // it was already pressed, so nothing's changed.
    /// assert!(!did_press);
    /// ```
    pub fn press(&mut self, key: usize) -> Result<bool> {
        let changed = self.keys.set(key, true)?;
        if changed && self.flags.keypause {
            log::debug!("Key {key:X} ended keypause at {:03x}", self.pc);
            self.flags.lastkey = Some(key);
            self.flags.keypause = false;
        }
        Ok(changed)
    }

    /// Releases a key, and reports whether the key's state changed.
    /// If key is outside range `0..=0xF`, returns [Error::InvalidKey].
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// // press key `7`
    /// cpu.press(0x7).unwrap();
    /// // release key `7`
    /// let changed = cpu.release(0x7).unwrap();
    /// assert!(changed); // key released
    /// // try releasing `7` again
    /// let changed = cpu.release(0x7).unwrap();
    /// assert!(!changed); // key was not held
    /// ```
    pub fn release(&mut self, key: usize) -> Result<bool> {
        self.keys.set(key, false)
    }

    /// Presses or releases a key, and reports whether the key's state changed.
    pub fn set_key(&mut self, key: usize, pressed: bool) -> Result<bool> {
        match pressed {
            true => self.press(key),
            false => self.release(key),
        }
    }

    /// Reports whether a key is held.
    /// If key does not exist, returns [Error::InvalidKey].
    pub fn is_pressed(&self, key: usize) -> Result<bool> {
        self.keys.is_pressed(key)
    }

    /// Gets the state of every key, indexed by digit
    pub fn keys(&self) -> &[bool] {
        self.keys.as_slice()
    }

    /// Sets a general purpose register in the CPU.
    /// If the register doesn't exist, returns [Error::InvalidRegister]
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// // Create a new CPU, and set v4 to 0x41
    /// let mut cpu = CPU::default();
    /// cpu.set_v(0x4, 0x41).unwrap();
    /// assert_eq!(0x41, cpu.v()[4]);
    /// assert!(cpu.set_v(0x10, 0x41).is_err());
    /// ```
    pub fn set_v(&mut self, reg: Reg, value: u8) -> Result<()> {
        if let Some(gpr) = self.v.get_mut(reg) {
            *gpr = value;
            Ok(())
        } else {
            Err(Error::InvalidRegister { reg })
        }
    }

    /// Gets a slice of the entire general purpose registers
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// cpu.set_v(0x0, 0x41).unwrap();
    /// assert_eq!(
    ///     cpu.v(),
    ///     [0x41, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]
    /// )
    /// ```
    pub fn v(&self) -> &[u8] {
        self.v.as_slice()
    }

    /// Gets the program counter
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn pc(&self) -> Adr {
        self.pc
    }

    /// Sets the program counter
    pub fn set_pc(&mut self, pc: Adr) {
        self.pc = pc;
    }

    /// Gets the I register
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(0, cpu.i());
    /// ```
    pub fn i(&self) -> Adr {
        self.i
    }

    /// Sets the I register
    pub fn set_i(&mut self, i: Adr) {
        self.i = i;
    }

    /// Gets the stack pointer, which counts the return addresses on the stack
    pub fn sp(&self) -> usize {
        self.stack.sp()
    }

    /// Gets the return addresses on the stack, oldest first
    pub fn stack(&self) -> &[Adr] {
        self.stack.as_slice()
    }

    /// Gets the value in the Sound Timer register
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(0, cpu.sound());
    /// ```
    pub fn sound(&self) -> u8 {
        self.sound
    }

    /// Sets the Sound Timer register
    pub fn set_sound(&mut self, sound: u8) {
        self.sound = sound;
    }

    /// Returns true while a tone should play, which is whenever the Sound Timer is nonzero
    pub fn sound_active(&self) -> bool {
        self.sound > 0
    }

    /// Gets the value in the Delay Timer register
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(0, cpu.delay());
    /// ```
    pub fn delay(&self) -> u8 {
        self.delay
    }

    /// Sets the Delay Timer register
    pub fn set_delay(&mut self, delay: u8) {
        self.delay = delay;
    }

    /// Gets the CPU's memory
    pub fn mem(&self) -> &Mem {
        &self.mem
    }

    /// Gets the CPU's memory, mutably
    pub fn mem_mut(&mut self) -> &mut Mem {
        &mut self.mem
    }

    /// Gets the number of cycles the CPU has executed
    ///
    /// Paused cycles are not counted.
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(0x0, cpu.cycle());
    /// ```
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Soft resets the CPU, releasing keypause and halt, and
    /// reinitializing the program counter to 0x200
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::new();
    /// cpu.set_pc(0x340);
    /// cpu.flags.keypause = true;
    /// cpu.soft_reset();
    /// assert_eq!(0x200, cpu.pc());
    /// assert_eq!(false, cpu.flags.keypause);
    /// ```
    pub fn soft_reset(&mut self) {
        self.pc = PROGRAM_START;
        self.flags.keypause = false;
        self.flags.lastkey = None;
        self.flags.halted = false;
    }

    /// Resets the emulator.
    ///
    /// Touches the [Flags], stack, pc, registers, timers, keys, and cycle count.
    ///
    /// Does not touch memory or breakpoints.
    pub fn reset(&mut self) {
        self.flags = Flags::default();
        // clear the stack
        self.stack.clear();
        // Reset the program counter
        self.pc = PROGRAM_START;
        // Zero the registers
        self.i = 0;
        self.v = [0; 16];
        self.delay = 0;
        self.sound = 0;
        // I/O
        self.keys.release_all();
        // Execution data
        self.cycle = 0;
    }

    /// Set a breakpoint
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// cpu.set_break(0x204).set_break(0x204);
    /// assert_eq!(cpu.breakpoints(), &[0x204]);
    /// ```
    pub fn set_break(&mut self, point: Adr) -> &mut Self {
        if !self.breakpoints.contains(&point) {
            self.breakpoints.push(point)
        }
        self
    }

    /// Unset a breakpoint
    pub fn unset_break(&mut self, point: Adr) -> &mut Self {
        self.breakpoints.retain(|&bp| bp != point);
        self
    }

    /// Gets a slice of breakpoints
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(cpu.breakpoints(), &[]);
    /// ```
    pub fn breakpoints(&self) -> &[Adr] {
        self.breakpoints.as_slice()
    }

    /// Unpauses the emulator for a single tick,
    /// even if cpu.flags.pause is set.
    ///
    /// Like with [CPU::tick], this returns [Error::UnknownOpcode]
    /// if the instruction is unknown.
    ///
    /// NOTE: does not tick the timers
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// let mut screen = Screen::default();
    /// cpu.load_program_bytes(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// cpu.flags.pause = true;
    /// cpu.singlestep(&mut screen).unwrap();
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(1, cpu.cycle());
    /// assert!(cpu.flags.pause);
    /// ```
    pub fn singlestep(&mut self, screen: &mut Screen) -> Result<&mut Self> {
        self.flags.pause = false;
        let result = self.tick(screen).map(|_| ());
        self.flags.pause = true;
        result?;
        Ok(self)
    }

    /// Executes up to `steps` instructions, stopping at the first error
    ///
    /// NOTE: does not tick the timers
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// let mut screen = Screen::default();
    /// cpu.load_program_bytes(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// cpu.multistep(&mut screen, 0x20)
    ///     .expect("The program should only have valid opcodes.");
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(0x20, cpu.cycle());
    /// ```
    pub fn multistep(&mut self, screen: &mut Screen, steps: usize) -> Result<&mut Self> {
        for _ in 0..steps {
            self.tick(screen)?;
        }
        Ok(self)
    }

    /// Counts the delay and sound timers down by one, stopping at zero.
    ///
    /// Call this at 60Hz, independent of how many instructions run in between.
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// cpu.set_delay(2);
    /// cpu.set_sound(1);
    /// cpu.tick_timers();
    /// assert_eq!((1, 0), (cpu.delay(), cpu.sound()));
    /// cpu.tick_timers();
    /// assert_eq!((0, 0), (cpu.delay(), cpu.sound()));
    /// ```
    pub fn tick_timers(&mut self) -> &mut Self {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
        self
    }

    /// Executes a single instruction
    ///
    /// Does nothing if the CPU is paused, waiting for a key, or halted.
    ///
    /// Returns [Error::BreakpointHit] if a breakpoint was hit after the instruction executed.
    /// This result contains information about the breakpoint, but can be safely ignored.
    ///
    /// Returns [Error::UnknownOpcode], [Error::StackOverflow], or [Error::StackUnderflow]
    /// if the instruction at `pc` can't run. The CPU then halts until reset.
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// let mut screen = Screen::default();
    /// cpu.load_program_bytes(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// cpu.tick(&mut screen)
    ///     .expect("0x00e0 (cls) should be a valid opcode.");
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(1, cpu.cycle());
    /// ```
    /// Returns [Error::UnknownOpcode] if the instruction is not implemented.
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// let mut screen = Screen::default();
    /// cpu.load_program_bytes(&[
    ///     0xff, 0xff, // invalid!
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// dbg!(cpu.tick(&mut screen))
    ///     .expect_err("Should return Error::UnknownOpcode { pc: 0x200, word: 0xffff }");
    /// ```
    pub fn tick(&mut self, screen: &mut Screen) -> Result<&mut Self> {
        // Do nothing if paused
        if self.flags.is_paused() {
            return Ok(self);
        }
        self.cycle += 1;
        // fetch opcode
        let (pc, word) = (self.pc, self.mem.read_word(self.pc));
        // decode opcode
        let Some(insn) = Insn::from_word(word) else {
            return Err(self.halt(Error::UnknownOpcode { pc, word }));
        };
        log::trace!("{:6} {pc:03x}: {word:04x} {insn}", self.cycle);

        self.pc = pc.wrapping_add(2);
        if let Err(fault) = self.execute(screen, insn) {
            self.pc = pc;
            return Err(self.halt(match fault {
                StackFault::Overflow => Error::StackOverflow { pc, word },
                StackFault::Underflow => Error::StackUnderflow { pc, word },
            }));
        }

        // process breakpoints, unless Fx0A just rewound onto its own address
        if !self.flags.keypause && self.breakpoints.contains(&self.pc) {
            self.flags.pause = true;
            log::info!("Breakpoint hit at {:03x}", self.pc);
            return Err(Error::BreakpointHit {
                addr: self.pc,
                next: self.mem.read_word(self.pc),
            });
        }
        Ok(self)
    }

    /// Dumps the current state of all CPU registers, and the cycle count
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// cpu.dump();
    /// ```
    /// outputs
    /// ```text
    /// PC: 0200, SP: 00, I: 0000
    /// v0: 00 v1: 00 v2: 00 v3: 00
    /// v4: 00 v5: 00 v6: 00 v7: 00
    /// v8: 00 v9: 00 vA: 00 vB: 00
    /// vC: 00 vD: 00 vE: 00 vF: 00
    /// DLY: 0, SND: 0, CYC:      0
    /// next: inval  0000
    /// ```
    pub fn dump(&self) {
        std::println!(
            "PC: {:04x}, SP: {:02x}, I: {:04x}\n{}DLY: {}, SND: {}, CYC: {:6}\nnext: {}",
            self.pc,
            self.stack.sp(),
            self.i,
            self.v
                .into_iter()
                .enumerate()
                .map(|(i, gpr)| {
                    format!(
                        "v{i:X}: {gpr:02x} {}",
                        match i % 4 {
                            3 => "\n",
                            _ => "",
                        }
                    )
                })
                .collect::<String>(),
            self.delay,
            self.sound,
            self.cycle,
            Dis::default().once(self.mem.read_word(self.pc)),
        );
    }
}

// internals
impl CPU {
    /// Stops execution until the next reset, and passes the error back
    fn halt(&mut self, error: Error) -> Error {
        log::warn!("Halted: {error}");
        self.flags.halted = true;
        error
    }
}

impl Debug for CPU {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CPU")
            .field("flags", &self.flags)
            .field("stack", &self.stack.as_slice())
            .field("pc", &self.pc)
            .field("i", &self.i)
            .field("v", &self.v)
            .field("delay", &self.delay)
            .field("sound", &self.sound)
            .field("keys", &self.keys)
            .field("cycle", &self.cycle)
            .field("breakpoints", &self.breakpoints)
            .finish_non_exhaustive()
    }
}

impl Default for CPU {
    /// Constructs a new CPU with sane defaults
    ///
    /// | value  | default | description
    /// |--------|---------|------------
    /// | font   |`0x0000` | Location of the glyph table.
    /// | pc     |`0x0200` | Start location.
    ///
    /// # Examples
    /// ```rust
    /// use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// ```
    fn default() -> Self {
        Self::new()
    }
}
