// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Stores and displays the Chip-8's 64x32 monochrome frame buffer
//!
//! Pixels are packed one bit each, row-major, most significant bit leftmost.

use std::fmt::{Display, Formatter};

/// Width of the screen, in pixels
pub const WIDTH: usize = 64;
/// Height of the screen, in pixels
pub const HEIGHT: usize = 32;
const ROW_BYTES: usize = WIDTH / 8;

/// The frame buffer
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Screen {
    pixels: [u8; WIDTH * HEIGHT / 8],
}

impl Screen {
    /// Constructs a blank screen
    pub fn new() -> Self {
        Screen {
            pixels: [0; WIDTH * HEIGHT / 8],
        }
    }

    #[inline(always)]
    fn locate(x: usize, y: usize) -> (usize, u8) {
        let (x, y) = (x % WIDTH, y % HEIGHT);
        (y * ROW_BYTES + x / 8, 0x80 >> (x % 8))
    }

    /// Clears every pixel
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Toggles the pixel at (`x` mod 64, `y` mod 32).
    ///
    /// Returns true if the pixel went from set to clear (a collision).
    /// # Examples
    /// ```rust
    /// # use chip8vm::screen::Screen;
    /// let mut screen = Screen::new();
    /// assert!(!screen.xor_pixel(3, 4));
    /// assert!(screen.get_pixel(3, 4));
    /// // (67, 36) wraps around to (3, 4)
    /// assert!(screen.xor_pixel(67, 36));
    /// assert!(!screen.get_pixel(3, 4));
    /// ```
    #[inline(always)]
    pub fn xor_pixel(&mut self, x: usize, y: usize) -> bool {
        let (byte, mask) = Self::locate(x, y);
        let collided = self.pixels[byte] & mask != 0;
        self.pixels[byte] ^= mask;
        collided
    }

    /// Gets the pixel at (`x` mod 64, `y` mod 32)
    #[inline(always)]
    pub fn get_pixel(&self, x: usize, y: usize) -> bool {
        let (byte, mask) = Self::locate(x, y);
        self.pixels[byte] & mask != 0
    }

    /// Iterates over every pixel as `(x, y, set)`, row by row
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize, bool)> + '_ {
        (0..HEIGHT).flat_map(move |y| (0..WIDTH).map(move |x| (x, y, self.get_pixel(x, y))))
    }

    /// Gets the packed frame buffer
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Prints the screen to stdout
    ///
    /// With the `drawille` feature, the screen is drawn in braille.
    pub fn print_screen(&self) {
        #[cfg(feature = "drawille")]
        {
            use drawille::Canvas;
            let mut canvas = Canvas::new(WIDTH as u32, HEIGHT as u32);
            self.pixels()
                .filter(|&(_, _, set)| set)
                .for_each(|(x, y, _)| canvas.set(x as u32, y as u32));
            println!("{}", canvas.frame());
        }
        #[cfg(not(feature = "drawille"))]
        println!("{self}");
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Screen {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, row) in self.pixels.chunks_exact(ROW_BYTES).enumerate() {
            write!(f, "{index:02}|")?;
            for byte in row {
                for bit in 0..8 {
                    write!(f, "{}", if byte << bit & 0x80 != 0 { '█' } else { ' ' })?;
                }
            }
            writeln!(f, "|")?;
        }
        Ok(())
    }
}
