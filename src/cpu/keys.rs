// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! State of the 16-key hexadecimal keypad

use crate::error::{Error, Result};

/// Number of keys on the keypad
pub const KEY_COUNT: usize = 16;

/// Tracks which of the keys `0..=F` are held
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Keys {
    keys: [bool; KEY_COUNT],
}

impl Keys {
    /// Constructs a keypad with nothing held
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the state of `key`, and reports whether it changed.
    /// If key does not exist, returns [Error::InvalidKey].
    /// # Examples
    /// ```rust
    /// # use chip8vm::cpu::keys::Keys;
    /// let mut keys = Keys::new();
    /// assert!(keys.set(0x7, true).unwrap());
    /// // already held
    /// assert!(!keys.set(0x7, true).unwrap());
    /// assert!(keys.set(0x10, true).is_err());
    /// ```
    pub fn set(&mut self, key: usize, pressed: bool) -> Result<bool> {
        let keyref = self.keys.get_mut(key).ok_or(Error::InvalidKey { key })?;
        let changed = *keyref != pressed;
        *keyref = pressed;
        Ok(changed)
    }

    /// Reports whether `key` is held.
    /// If key does not exist, returns [Error::InvalidKey].
    pub fn is_pressed(&self, key: usize) -> Result<bool> {
        self.keys
            .get(key)
            .copied()
            .ok_or(Error::InvalidKey { key })
    }

    /// Releases every key
    pub fn release_all(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    /// Gets the state of every key, indexed by digit
    pub fn as_slice(&self) -> &[bool] {
        &self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release() {
        let mut keys = Keys::new();
        for key in 0..KEY_COUNT {
            assert!(!keys.is_pressed(key).unwrap());
            assert!(keys.set(key, true).unwrap());
            assert!(keys.is_pressed(key).unwrap());
            assert!(keys.set(key, false).unwrap());
            assert!(!keys.set(key, false).unwrap());
        }
    }

    #[test]
    fn invalid_key_is_rejected() {
        let mut keys = Keys::new();
        for key in [KEY_COUNT, 0x20, usize::MAX] {
            assert!(matches!(
                keys.set(key, true),
                Err(Error::InvalidKey { key: k }) if k == key
            ));
            assert!(keys.is_pressed(key).is_err());
        }
        // nothing was clamped onto a real key
        assert_eq!(Keys::new(), keys);
    }

    #[test]
    fn release_all() {
        let mut keys = Keys::new();
        keys.set(0x3, true).unwrap();
        keys.set(0xf, true).unwrap();
        keys.release_all();
        assert!(keys.as_slice().iter().all(|&k| !k));
    }
}
