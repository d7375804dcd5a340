// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for chip8vm

use std::path::PathBuf;
use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for chip8vm.
#[derive(Debug, Error)]
pub enum Error {
    /// The ROM doesn't fit in program memory
    #[error("rom is {size} bytes, but program memory only holds {max}")]
    RomTooLarge {
        /// Size of the offending ROM
        size: usize,
        /// Size of program memory
        max: usize,
    },
    /// The ROM file couldn't be read
    #[error("could not read rom {}: {source}", path.display())]
    RomReadFailure {
        /// Path to the offending file
        path: PathBuf,
        /// The underlying [std::io::Error]
        source: std::io::Error,
    },
    /// The fetched word isn't an instruction
    #[error("opcode {word:04x} at {pc:03x} not recognized")]
    UnknownOpcode {
        /// Address of the offending word
        pc: u16,
        /// The offending word
        word: u16,
    },
    /// A call was made with all 16 stack slots in use
    #[error("stack overflow: {word:04x} at {pc:03x} called with a full stack")]
    StackOverflow {
        /// Address of the offending call
        pc: u16,
        /// The offending word
        word: u16,
    },
    /// A return was made with an empty stack
    #[error("stack underflow: {word:04x} at {pc:03x} returned with an empty stack")]
    StackUnderflow {
        /// Address of the offending return
        pc: u16,
        /// The offending word
        word: u16,
    },
    /// Represents a breakpoint being hit
    #[error("breakpoint hit: {addr:03x} ({next:04x})")]
    BreakpointHit {
        /// The address of the breakpoint
        addr: u16,
        /// The instruction after the breakpoint
        next: u16,
    },
    /// Tried to press a key that doesn't exist
    #[error("tried to press key {key:X} which does not exist")]
    InvalidKey {
        /// The offending key
        key: usize,
    },
    /// Tried to get/set an out-of-bounds register
    #[error("tried to access register v{reg:X} which does not exist")]
    InvalidRegister {
        /// The offending register
        reg: usize,
    },
    #[cfg(feature = "minifb")]
    /// Error originated in [minifb]
    #[error(transparent)]
    Minifb(#[from] minifb::Error),
}

impl Error {
    /// Returns true if this error stops the interpreter.
    ///
    /// Breakpoints only pause execution, and can be resumed from.
    /// # Examples
    /// ```rust
    /// # use chip8vm::error::Error;
    /// assert!(Error::UnknownOpcode { pc: 0x200, word: 0xffff }.is_fatal());
    /// assert!(!Error::BreakpointHit { addr: 0x200, next: 0x00e0 }.is_fatal());
    /// ```
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::BreakpointHit { .. } | Error::InvalidKey { .. })
    }
}
