// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)
#![allow(clippy::bad_bit_mask)]
//! Contains the definition of a Chip-8 [Insn]
//!
//! Uppercase letters in an opcode pattern are operand fields, as are `x`, `y`, and `n`.
//! Every other digit must match exactly, so a word which matches no pattern doesn't decode.

pub mod disassembler;

use imperative_rs::InstructionSet;
use std::fmt::Display;

/// The base Chip-8 instruction set
///
/// `0aaa` (call machine code routine) is deliberately absent, and fails to decode.
#[allow(non_snake_case, missing_docs)]
#[derive(Clone, Copy, Debug, InstructionSet, PartialEq, Eq, Hash)]
pub enum Insn {
    /// | 00e0 | Clear the screen
    #[opcode = "0x00e0"]
    Cls,
    /// | 00ee | Return from subroutine
    #[opcode = "0x00ee"]
    Ret,
    /// | 1aaa | Jump to an absolute address
    #[opcode = "0x1AAA"]
    Jump { A: u16 },
    /// | 2aaa | Push pc onto the stack, then jump to a
    #[opcode = "0x2AAA"]
    Call { A: u16 },
    /// | 3xbb | Skip next instruction if vX == b
    #[opcode = "0x3xBB"]
    SkipEqByte { B: u8, x: usize },
    /// | 4xbb | Skip next instruction if vX != b
    #[opcode = "0x4xBB"]
    SkipNeByte { B: u8, x: usize },
    /// | 5xy0 | Skip next instruction if vX == vY
    #[opcode = "0x5xy0"]
    SkipEq { y: usize, x: usize },
    /// | 6xbb | Load immediate byte b into vX
    #[opcode = "0x6xBB"]
    LoadByte { B: u8, x: usize },
    /// | 7xbb | Add immediate byte b to vX, without touching vF
    #[opcode = "0x7xBB"]
    AddByte { B: u8, x: usize },
    /// | 8xy0 | Load vY into vX
    #[opcode = "0x8xy0"]
    Load { y: usize, x: usize },
    /// | 8xy1 | vX |= vY
    #[opcode = "0x8xy1"]
    Or { y: usize, x: usize },
    /// | 8xy2 | vX &= vY
    #[opcode = "0x8xy2"]
    And { y: usize, x: usize },
    /// | 8xy3 | vX ^= vY
    #[opcode = "0x8xy3"]
    Xor { y: usize, x: usize },
    /// | 8xy4 | vX += vY; vF = carry
    #[opcode = "0x8xy4"]
    Add { y: usize, x: usize },
    /// | 8xy5 | vX -= vY; vF = not borrow
    #[opcode = "0x8xy5"]
    Sub { y: usize, x: usize },
    /// | 8xy6 | vX >>= 1; vF = shifted out bit
    #[opcode = "0x8xy6"]
    Shr { y: usize, x: usize },
    /// | 8xy7 | vX = vY - vX; vF = not borrow
    #[opcode = "0x8xy7"]
    SubN { y: usize, x: usize },
    /// | 8xyE | vX <<= 1; vF = shifted out bit
    #[opcode = "0x8xye"]
    Shl { y: usize, x: usize },
    /// | 9xy0 | Skip next instruction if vX != vY
    #[opcode = "0x9xy0"]
    SkipNe { y: usize, x: usize },
    /// | Aaaa | Load address a into I
    #[opcode = "0xaAAA"]
    LoadI { A: u16 },
    /// | Baaa | Jump to a + v0
    #[opcode = "0xbAAA"]
    Branch { A: u16 },
    /// | Cxbb | Load a random byte, masked by b, into vX
    #[opcode = "0xcxBB"]
    Rand { B: u8, x: usize },
    /// | Dxyn | Draw the n-byte sprite at I to (vX, vY); vF = collision
    #[opcode = "0xdxyn"]
    Draw { y: usize, x: usize, n: u8 },
    /// | Ex9E | Skip next instruction if key vX is held
    #[opcode = "0xex9e"]
    SkipKey { x: usize },
    /// | ExA1 | Skip next instruction if key vX isn't held
    #[opcode = "0xexa1"]
    SkipNotKey { x: usize },
    /// | Fx07 | Load the delay timer into vX
    #[opcode = "0xfx07"]
    LoadDelay { x: usize },
    /// | Fx0A | Wait for a keypress, and load the key into vX
    #[opcode = "0xfx0a"]
    WaitKey { x: usize },
    /// | Fx15 | Load vX into the delay timer
    #[opcode = "0xfx15"]
    StoreDelay { x: usize },
    /// | Fx18 | Load vX into the sound timer
    #[opcode = "0xfx18"]
    StoreSound { x: usize },
    /// | Fx1E | I += vX
    #[opcode = "0xfx1e"]
    AddI { x: usize },
    /// | Fx29 | Load the address of glyph vX into I
    #[opcode = "0xfx29"]
    Glyph { x: usize },
    /// | Fx33 | Store the BCD digits of vX at I, I+1, I+2
    #[opcode = "0xfx33"]
    Bcd { x: usize },
    /// | Fx55 | Store v0..=vX at I
    #[opcode = "0xfx55"]
    StoreRegs { x: usize },
    /// | Fx65 | Load v0..=vX from I
    #[opcode = "0xfx65"]
    LoadRegs { x: usize },
}

impl Insn {
    /// Decodes a single big-endian word
    /// # Examples
    /// ```rust
    /// # use chip8vm::cpu::instruction::Insn;
    /// assert_eq!(Some(Insn::LoadByte { B: 0x0a, x: 0 }), Insn::from_word(0x600a));
    /// assert_eq!(None, Insn::from_word(0x5ff1));
    /// ```
    pub fn from_word(word: u16) -> Option<Self> {
        Insn::decode(&word.to_be_bytes())
            .ok()
            .map(|(_, insn)| insn)
    }
}

impl Display for Insn {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Insn::Cls                 => write!(f, "cls"),
            Insn::Ret                 => write!(f, "ret"),
            Insn::Jump { A }          => write!(f, "jp     ${A:03x}"),
            Insn::Call { A }          => write!(f, "call   ${A:03x}"),
            Insn::SkipEqByte { B, x } => write!(f, "se     v{x:X}, #{B:02x}"),
            Insn::SkipNeByte { B, x } => write!(f, "sne    v{x:X}, #{B:02x}"),
            Insn::SkipEq { y, x }     => write!(f, "se     v{x:X}, v{y:X}"),
            Insn::LoadByte { B, x }   => write!(f, "ld     v{x:X}, #{B:02x}"),
            Insn::AddByte { B, x }    => write!(f, "add    v{x:X}, #{B:02x}"),
            Insn::Load { y, x }       => write!(f, "ld     v{x:X}, v{y:X}"),
            Insn::Or { y, x }         => write!(f, "or     v{x:X}, v{y:X}"),
            Insn::And { y, x }        => write!(f, "and    v{x:X}, v{y:X}"),
            Insn::Xor { y, x }        => write!(f, "xor    v{x:X}, v{y:X}"),
            Insn::Add { y, x }        => write!(f, "add    v{x:X}, v{y:X}"),
            Insn::Sub { y, x }        => write!(f, "sub    v{x:X}, v{y:X}"),
            Insn::Shr { x, .. }       => write!(f, "shr    v{x:X}"),
            Insn::SubN { y, x }       => write!(f, "subn   v{x:X}, v{y:X}"),
            Insn::Shl { x, .. }       => write!(f, "shl    v{x:X}"),
            Insn::SkipNe { y, x }     => write!(f, "sne    v{x:X}, v{y:X}"),
            Insn::LoadI { A }         => write!(f, "ld     I, ${A:03x}"),
            Insn::Branch { A }        => write!(f, "jp     v0, ${A:03x}"),
            Insn::Rand { B, x }       => write!(f, "rnd    v{x:X}, #{B:02x}"),
            Insn::Draw { y, x, n }    => write!(f, "drw    v{x:X}, v{y:X}, #{n:x}"),
            Insn::SkipKey { x }       => write!(f, "skp    v{x:X}"),
            Insn::SkipNotKey { x }    => write!(f, "sknp   v{x:X}"),
            Insn::LoadDelay { x }     => write!(f, "ld     v{x:X}, DT"),
            Insn::WaitKey { x }       => write!(f, "ld     v{x:X}, K"),
            Insn::StoreDelay { x }    => write!(f, "ld     DT, v{x:X}"),
            Insn::StoreSound { x }    => write!(f, "ld     ST, v{x:X}"),
            Insn::AddI { x }          => write!(f, "add    I, v{x:X}"),
            Insn::Glyph { x }         => write!(f, "ld     F, v{x:X}"),
            Insn::Bcd { x }           => write!(f, "ld     B, v{x:X}"),
            Insn::StoreRegs { x }     => write!(f, "ld     [I], v{x:X}"),
            Insn::LoadRegs { x }      => write!(f, "ld     v{x:X}, [I]"),
        }
    }
}
