// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE.txt for details)
#![allow(missing_docs)]
//! Platform-specific IO/UI code, and some debug functionality.

use chip8vm::{
    error::Result,
    screen::{Screen, HEIGHT, WIDTH},
    Chip8,
};
use minifb::*;
use std::{
    path::{Path, PathBuf},
    time::Instant,
};

#[derive(Clone, Debug)]
pub struct UIBuilder {
    pub width: usize,
    pub height: usize,
    pub name: Option<&'static str>,
    pub rom: Option<PathBuf>,
    pub window_options: WindowOptions,
}

impl UIBuilder {
    pub fn new(width: usize, height: usize, rom: impl AsRef<Path>) -> Self {
        UIBuilder {
            width,
            height,
            rom: Some(rom.as_ref().to_owned()),
            ..Default::default()
        }
    }
    pub fn build(&self) -> Result<UI> {
        let ui = UI {
            window: Window::new(
                &self.title(),
                self.width,
                self.height,
                self.window_options,
            )?,
            keyboard: Default::default(),
            fb: Default::default(),
            name: self.title(),
            time: Instant::now(),
        };
        Ok(ui)
    }
    /// The window title: the program name, then the ROM's file name
    pub fn title(&self) -> String {
        let name = self.name.unwrap_or_default();
        match self.rom.as_deref().and_then(Path::file_name) {
            Some(rom) => format!("{name} - {}", rom.to_string_lossy()),
            None => name.to_owned(),
        }
    }
}

impl Default for UIBuilder {
    fn default() -> Self {
        UIBuilder {
            width: WIDTH,
            height: HEIGHT,
            name: Some("chip8vm"),
            rom: None,
            window_options: WindowOptions {
                title: true,
                resize: false,
                scale: Scale::X16,
                scale_mode: ScaleMode::AspectRatioStretch,
                none: true,
                ..Default::default()
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameBufferFormat {
    pub fg: u32,
    pub bg: u32,
}

impl Default for FrameBufferFormat {
    fn default() -> Self {
        FrameBufferFormat {
            fg: 0x0011a434,
            bg: 0x001E2431,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameBuffer {
    buffer: Vec<u32>,
    width: usize,
    height: usize,
    format: FrameBufferFormat,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        FrameBuffer {
            buffer: vec![0x00be4d; width * height],
            width,
            height,
            format: Default::default(),
        }
    }
    /// Paints every pixel of the [Screen] into the buffer
    pub fn draw(&mut self, screen: &Screen) -> &mut Self {
        for (x, y, set) in screen.pixels() {
            if let Some(pixel) = self.buffer.get_mut(y * self.width + x) {
                *pixel = if set { self.format.fg } else { self.format.bg };
            }
        }
        self
    }
    pub fn render(&mut self, window: &mut Window, screen: &Screen) -> Result<()> {
        self.draw(screen);
        window.update_with_buffer(&self.buffer, self.width, self.height)?;
        Ok(())
    }
    #[allow(dead_code)] // used in tests
    pub fn as_slice(&self) -> &[u32] {
        &self.buffer
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new(WIDTH, HEIGHT)
    }
}

#[derive(Debug)]
pub struct UI {
    window: Window,
    keyboard: Vec<Key>,
    fb: FrameBuffer,
    name: String,
    time: Instant,
}

impl UI {
    pub fn frame(&mut self, ch8: &mut Chip8) -> Result<bool> {
        if ch8.cpu.flags.is_paused() {
            self.window.set_title(&format!("{} ⏸", self.name))
        } else {
            self.window.set_title(&format!(
                "{}  ▶ {:02.02}",
                self.name,
                (1.0 / self.time.elapsed().as_secs_f64())
            ));
        }
        if !self.window.is_open() {
            return Ok(false);
        }
        self.time = Instant::now();
        // update framebuffer
        self.fb.render(&mut self.window, &ch8.screen)?;
        Ok(true)
    }

    pub fn keys(&mut self, ch8: &mut Chip8) -> Result<bool> {
        // minifb reports held keys, so presses and releases come from the difference
        let held = self.window.get_keys();
        let released: Vec<Key> = self
            .keyboard
            .iter()
            .filter(|key| !held.contains(key))
            .copied()
            .collect();
        let pressed: Vec<Key> = held
            .iter()
            .filter(|key| !self.keyboard.contains(key))
            .copied()
            .collect();
        self.keyboard = held;
        dispatch(ch8, &released, &pressed)
    }
}

/// Delivers one poll's worth of key changes to the [Chip8].
///
/// Every key is handled even if an earlier one fails; the first error is returned.
/// Returns `Ok(false)` when the user asked to quit.
pub fn dispatch(ch8: &mut Chip8, released: &[Key], pressed: &[Key]) -> Result<bool> {
    let mut first_error = None;
    for &key in released {
        if let Err(e) = release_key(ch8, key) {
            first_error.get_or_insert(e);
        }
    }
    // handle keybinds for the UI
    for &key in pressed {
        use Key::*;
        let result = match key {
            F1 | Comma => {
                ch8.cpu.dump();
                Ok(())
            }
            F2 | Period => {
                ch8.screen.print_screen();
                Ok(())
            }
            F5 | Backslash => {
                ch8.cpu.flags.pause();
                eprintln!("{}.", if ch8.cpu.flags.pause { "Paused" } else { "Unpaused" });
                Ok(())
            }
            F6 | Enter => {
                eprintln!("Step");
                ch8.cpu.singlestep(&mut ch8.screen).map(|_| ())
            }
            F7 => {
                let pc = ch8.cpu.pc();
                eprintln!("Set breakpoint {pc:03x}.");
                ch8.cpu.set_break(pc);
                Ok(())
            }
            F8 => {
                let pc = ch8.cpu.pc();
                eprintln!("Unset breakpoint {pc:03x}.");
                ch8.cpu.unset_break(pc);
                Ok(())
            }
            F9 | Delete => {
                eprintln!("Soft reset state.cpu {:03x}", ch8.cpu.pc());
                ch8.cpu.soft_reset();
                ch8.screen.clear();
                Ok(())
            }
            Escape => return Ok(false),
            key => press_key(ch8, key).map(|_| ()),
        };
        if let Err(e) = result {
            first_error.get_or_insert(e);
        }
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(true),
    }
}

/// Presses the keypad digit bound to `key`, and reports whether its state changed.
/// Keys with no binding are logged and otherwise ignored.
pub fn press_key(ch8: &mut Chip8, key: Key) -> Result<bool> {
    match identify_key(key) {
        Some(digit) => ch8.cpu.press(digit),
        None => {
            log::debug!("Unmapped key {key:?} pressed");
            Ok(false)
        }
    }
}

/// Releases the keypad digit bound to `key`, and reports whether its state changed.
/// Keys with no binding are logged and otherwise ignored.
pub fn release_key(ch8: &mut Chip8, key: Key) -> Result<bool> {
    match identify_key(key) {
        Some(digit) => ch8.cpu.release(digit),
        None => {
            log::debug!("Unmapped key {key:?} released");
            Ok(false)
        }
    }
}

/// Maps the left side of a QWERTY keyboard onto the hex keypad
///
/// ```text
/// 1 2 3 4      1 2 3 C
/// Q W E R  ->  4 5 6 D
/// A S D F      7 8 9 E
/// Z X C V      A 0 B F
/// ```
pub fn identify_key(key: Key) -> Option<usize> {
    match key {
        Key::Key1 => Some(0x1),
        Key::Key2 => Some(0x2),
        Key::Key3 => Some(0x3),
        Key::Key4 => Some(0xc),
        Key::Q => Some(0x4),
        Key::W => Some(0x5),
        Key::E => Some(0x6),
        Key::R => Some(0xD),
        Key::A => Some(0x7),
        Key::S => Some(0x8),
        Key::D => Some(0x9),
        Key::F => Some(0xE),
        Key::Z => Some(0xA),
        Key::X => Some(0x0),
        Key::C => Some(0xB),
        Key::V => Some(0xF),
        _ => None,
    }
}
