//! Interpreter state that sits outside the Chip-8 machine: pause, key wait, and halt

/// Represents flags that aid in operation, but aren't inherent to the CPU
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Flags {
    /// Set when the emulator is paused by the user and should not update
    pub pause: bool,
    /// Set when the emulator is waiting for a keypress
    pub keypause: bool,
    /// Set to the key that was *pressed* to end a keypause
    pub lastkey: Option<usize>,
    /// Set when the emulator has faulted, and won't run until reset
    pub halted: bool,
}

impl Flags {
    /// Toggles pause
    ///
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(false, cpu.flags.pause);
    /// // Pause the cpu
    /// cpu.flags.pause();
    /// assert_eq!(true, cpu.flags.pause);
    /// ```
    pub fn pause(&mut self) {
        self.pause = !self.pause
    }

    /// Returns true if no instruction should execute this tick
    ///
    /// Timers are not affected by any of these states.
    pub fn is_paused(&self) -> bool {
        self.pause || self.keypause || self.halted
    }
}
