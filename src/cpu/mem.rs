// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The Mem represents the CPU's 4K address space
//!
//! Every access is masked to 12 bits, so addresses wrap around at `0x1000`.

use super::Adr;
use crate::error::{Error, Result};
use std::{
    fmt::{Display, Formatter},
    ops::Range,
    path::Path,
};

/// Size of the address space, in bytes
pub const MEM_SIZE: usize = 0x1000;
/// Mask applied to every address before access
pub const ADDR_MASK: Adr = 0xfff;
/// Where programs are loaded, and where execution starts
pub const PROGRAM_START: Adr = 0x200;
/// The largest program that fits between [PROGRAM_START] and the end of memory
pub const PROGRAM_MAX: usize = MEM_SIZE - PROGRAM_START as usize;
/// Where the glyph table is installed
pub const CHARSET_START: Adr = 0x000;
/// Height of each glyph in the charset, in bytes
pub const GLYPH_SIZE: Adr = 5;

/// The built-in hexadecimal glyphs, `0` through `F`, 4x5 pixels each
#[rustfmt::skip]
pub const CHARSET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Represents a named region in memory
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    /// Glyph table (but writable!)
    Charset,
    /// Program memory
    Program,
}

impl Region {
    /// Gets the address range covered by this [Region]
    /// # Examples
    /// ```rust
    /// # use chip8vm::cpu::mem::Region;
    /// assert_eq!(0x200..0x1000, Region::Program.range());
    /// ```
    pub fn range(&self) -> Range<usize> {
        match self {
            Region::Charset => CHARSET_START as usize..CHARSET_START as usize + CHARSET.len(),
            Region::Program => PROGRAM_START as usize..MEM_SIZE,
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Region::Charset => "Charset",
                Region::Program => "Program",
            }
        )
    }
}

/// Reads a ROM from disk, rejecting any that wouldn't fit in program memory
pub fn read_rom(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let rom = std::fs::read(path).map_err(|source| Error::RomReadFailure {
        path: path.to_owned(),
        source,
    })?;
    if rom.len() > PROGRAM_MAX {
        return Err(Error::RomTooLarge {
            size: rom.len(),
            max: PROGRAM_MAX,
        });
    }
    Ok(rom)
}

/// The CPU's 4K of RAM
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Mem {
    memory: Box<[u8; MEM_SIZE]>,
}

impl Mem {
    /// Constructs zeroed memory with the glyph table installed
    /// # Examples
    /// ```rust
    /// # use chip8vm::cpu::mem::*;
    /// let mem = Mem::new();
    /// assert_eq!(&CHARSET, mem.get_region(Region::Charset));
    /// assert!(mem.get_region(Region::Program).iter().all(|&b| b == 0));
    /// ```
    pub fn new() -> Self {
        let mut mem = Mem {
            memory: Box::new([0; MEM_SIZE]),
        };
        mem.load_charset();
        mem
    }

    /// Reads the byte at `addr`, masked to 12 bits
    /// # Examples
    /// ```rust
    /// # use chip8vm::cpu::mem::*;
    /// let mem = Mem::new();
    /// // 0x1000 wraps around to 0x000, the top row of glyph 0
    /// assert_eq!(0xF0, mem.read(0x1000));
    /// ```
    #[inline(always)]
    pub fn read(&self, addr: Adr) -> u8 {
        self.memory[(addr & ADDR_MASK) as usize]
    }

    /// Writes `value` to `addr`, masked to 12 bits
    #[inline(always)]
    pub fn write(&mut self, addr: Adr, value: u8) {
        self.memory[(addr & ADDR_MASK) as usize] = value;
    }

    /// Reads the big-endian word at `addr`
    ///
    /// The second byte wraps around independently of the first.
    #[inline(always)]
    pub fn read_word(&self, addr: Adr) -> u16 {
        u16::from_be_bytes([self.read(addr), self.read(addr.wrapping_add(1))])
    }

    /// Installs the glyph table at [CHARSET_START]
    pub fn load_charset(&mut self) -> &mut Self {
        self.memory[Region::Charset.range()].copy_from_slice(&CHARSET);
        self
    }

    /// Clears program memory, then copies `rom` to [PROGRAM_START]
    ///
    /// Returns [Error::RomTooLarge] without touching memory if `rom` doesn't fit.
    /// # Examples
    /// ```rust
    /// # use chip8vm::cpu::mem::*;
    /// let mut mem = Mem::new();
    /// mem.load_program(&[0x60, 0x0a]).unwrap();
    /// assert_eq!(0x600a, mem.read_word(PROGRAM_START));
    /// assert!(mem.load_program(&[0; PROGRAM_MAX + 1]).is_err());
    /// ```
    pub fn load_program(&mut self, rom: &[u8]) -> Result<&mut Self> {
        if rom.len() > PROGRAM_MAX {
            return Err(Error::RomTooLarge {
                size: rom.len(),
                max: PROGRAM_MAX,
            });
        }
        self.clear_region(Region::Program);
        let start = PROGRAM_START as usize;
        self.memory[start..start + rom.len()].copy_from_slice(rom);
        Ok(self)
    }

    /// Gets a slice of the memory covered by [Region]
    pub fn get_region(&self, region: Region) -> &[u8] {
        &self.memory[region.range()]
    }

    /// Zeroes the memory covered by [Region]
    pub fn clear_region(&mut self, region: Region) -> &mut Self {
        self.memory[region.range()].fill(0);
        self
    }

    /// Gets the entire address space as a slice
    pub fn as_slice(&self) -> &[u8] {
        self.memory.as_slice()
    }
}

impl Default for Mem {
    fn default() -> Self {
        Self::new()
    }
}
