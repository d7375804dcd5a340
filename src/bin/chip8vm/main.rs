// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! chip8vm: A Chip-8 virtual machine, in a window

mod logger;
mod ui;

use chip8vm::prelude::*;
use gumdrop::Options;
use owo_colors::OwoColorize;
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};
use ui::*;

/// ROM to run when none is given
const DEFAULT_ROM: &str = "roms/PONG.ch8";
/// Environment variable which overrides [DEFAULT_ROM]
const ROM_VAR: &str = "CHIP8VM_ROM";

pub fn main() {
    let options = Arguments::parse_args_default_or_exit();
    logger::init(logger::level(options.debug, options.verbose));
    let state = match State::new(options) {
        Ok(state) => state,
        Err(e) => fail(e),
    };
    for result in state {
        if let Err(e) = result {
            fail(e);
        }
    }
}

/// Reports a fatal error, and exits
fn fail(e: Error) -> ! {
    eprintln!("{}", e.bold().red());
    std::process::exit(1)
}

/// Parses a hexadecimal string into a u16
fn parse_hex(value: &str) -> std::result::Result<u16, std::num::ParseIntError> {
    u16::from_str_radix(value.trim_start_matches("0x"), 16)
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Load a ROM to run. Defaults to $CHIP8VM_ROM, then roms/PONG.ch8.", free)]
    pub file: PathBuf,
    #[options(help = "Print this help message.")]
    help: bool,
    #[options(help = "Log every instruction as it runs.")]
    pub debug: bool,
    #[options(help = "Log loads, key waits, and calls.")]
    pub verbose: bool,
    #[options(help = "Enable pause mode at startup.")]
    pub pause: bool,

    #[options(help = "Set the instructions-per-frame rate.", default = "10", meta = "IPF")]
    pub speed: usize,

    #[options(
        long = "break",
        help = "Set breakpoints for the emulator to stop at.",
        parse(try_from_str = "parse_hex"),
        meta = "BP"
    )]
    pub breakpoints: Vec<u16>,

    #[options(help = "Set the target framerate.", default = "60", meta = "FR")]
    pub frame_rate: u64,
}

impl Arguments {
    /// Picks the ROM to load: the free argument, then the environment, then [DEFAULT_ROM]
    fn rom(&self) -> PathBuf {
        if !self.file.as_os_str().is_empty() {
            return self.file.clone();
        }
        std::env::var_os(ROM_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ROM))
    }
}

#[derive(Debug)]
struct State {
    pub speed: usize,
    pub rate: u64,
    pub ch8: Chip8,
    pub ui: UI,
    pub ft: Instant,
    pub beeping: bool,
}

impl State {
    fn new(options: Arguments) -> Result<Self> {
        let rom = options.rom();
        let mut ch8 = Chip8::load(&rom)?;
        ch8.cpu.flags.pause = options.pause;
        for &point in &options.breakpoints {
            ch8.cpu.set_break(point);
        }
        log::info!("Running {} at {} ipf", rom.display(), options.speed);
        Ok(State {
            speed: options.speed,
            rate: options.frame_rate.max(1),
            ch8,
            ui: UIBuilder::new(WIDTH, HEIGHT, &rom).build()?,
            ft: Instant::now(),
            beeping: false,
        })
    }
    fn keys(&mut self) -> Result<bool> {
        self.ui.keys(&mut self.ch8)
    }
    fn frame(&mut self) -> Result<bool> {
        self.ui.frame(&mut self.ch8)
    }
    fn tick_cpu(&mut self) -> Result<()> {
        if !self.ch8.cpu.flags.pause {
            self.ch8.frame(self.speed)?;
        }
        Ok(())
    }
    /// Reports when the tone starts and stops
    fn beep(&mut self) {
        let active = self.ch8.cpu.sound_active();
        if active != self.beeping {
            self.beeping = active;
            log::info!("Beep {}", if active { "on" } else { "off" });
        }
    }
    fn wait_for_next_frame(&mut self) {
        let rate = Duration::from_nanos(1_000_000_000 / self.rate + 1);
        std::thread::sleep(rate.saturating_sub(self.ft.elapsed()));
        self.ft += rate;
    }
}

/// Passes fatal errors on, and reports the rest
fn recoverable(result: Result<()>) -> Result<()> {
    match result {
        Err(Error::BreakpointHit { addr, next }) => {
            eprintln!("Breakpoint hit: {:3x} ({:4x})", addr, next);
            Ok(())
        }
        Err(e) if !e.is_fatal() => {
            log::warn!("{e}");
            Ok(())
        }
        other => other,
    }
}

impl Iterator for State {
    type Item = Result<()>;

    /// Runs one frame: input, then instructions and timers, then sound and video
    fn next(&mut self) -> Option<Self::Item> {
        self.wait_for_next_frame();
        match self.keys() {
            Ok(false) => return None,
            Err(e) => {
                if let Err(e) = recoverable(Err(e)) {
                    return Some(Err(e));
                }
            }
            _ => (),
        }
        if let Err(e) = recoverable(self.tick_cpu()) {
            return Some(Err(e));
        }
        self.beep();
        match self.frame() {
            Ok(false) => return None,
            Err(e) => return Some(Err(e)),
            _ => (),
        }
        Some(Ok(()))
    }
}
