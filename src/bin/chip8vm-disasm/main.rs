// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Prints the disassembly of a Chip-8 ROM, one word per line

use chip8vm::{cpu::mem::read_rom, error::Result, *};
use gumdrop::Options;
use owo_colors::OwoColorize;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Show help text")]
    help: bool,
    #[options(help = "Load a ROM to disassemble", free, required)]
    pub file: PathBuf,
    #[options(help = "Start disassembling at offset...")]
    pub offset: usize,
}

fn main() {
    let options = Arguments::parse_args_default_or_exit();
    if let Err(e) = disassemble(&options) {
        eprintln!("{}", e.bold().red());
        std::process::exit(1);
    }
}

fn disassemble(options: &Arguments) -> Result<()> {
    let contents = read_rom(&options.file)?;
    let disassembler = Dis::default();
    let words = contents.get(options.offset..).unwrap_or_default();
    for (addr, insn) in words.chunks_exact(2).enumerate() {
        let insn = u16::from_be_bytes([insn[0], insn[1]]);
        println!(
            "{}",
            format_args!(
                "{:03x}: {} {:04x}",
                2 * addr + 0x200 + options.offset,
                disassembler.once(insn),
                insn.bright_black(),
            )
        );
    }
    Ok(())
}
