// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The call stack: 16 return addresses and a stack pointer

use super::Adr;
use thiserror::Error;

/// Number of nested calls the stack can hold
pub const STACK_DEPTH: usize = 16;

/// Reasons a [Stack] operation can fail.
///
/// The CPU turns these into an [crate::error::Error] carrying the offending pc.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum StackFault {
    /// Pushed with every slot in use
    #[error("stack is full")]
    Overflow,
    /// Popped with no slot in use
    #[error("stack is empty")]
    Underflow,
}

/// Fixed-depth return address stack
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Stack {
    slots: [Adr; STACK_DEPTH],
    sp: usize,
}

impl Stack {
    /// Constructs an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a return address
    /// # Examples
    /// ```rust
    /// # use chip8vm::cpu::stack::*;
    /// let mut stack = Stack::new();
    /// for addr in 0..STACK_DEPTH as u16 {
    ///     stack.push(addr).unwrap();
    /// }
    /// assert_eq!(Err(StackFault::Overflow), stack.push(0x200));
    /// ```
    pub fn push(&mut self, addr: Adr) -> Result<(), StackFault> {
        let slot = self.slots.get_mut(self.sp).ok_or(StackFault::Overflow)?;
        *slot = addr;
        self.sp += 1;
        Ok(())
    }

    /// Pops the most recent return address
    /// # Examples
    /// ```rust
    /// # use chip8vm::cpu::stack::*;
    /// let mut stack = Stack::new();
    /// stack.push(0x202).unwrap();
    /// assert_eq!(Ok(0x202), stack.pop());
    /// assert_eq!(Err(StackFault::Underflow), stack.pop());
    /// ```
    pub fn pop(&mut self) -> Result<Adr, StackFault> {
        self.sp = self.sp.checked_sub(1).ok_or(StackFault::Underflow)?;
        Ok(self.slots[self.sp])
    }

    /// Gets the stack pointer, which is the number of slots in use
    pub fn sp(&self) -> usize {
        self.sp
    }

    /// Gets the slots currently in use, oldest first
    pub fn as_slice(&self) -> &[Adr] {
        &self.slots[..self.sp]
    }

    /// Empties the stack
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifo() {
        let mut stack = Stack::new();
        stack.push(0x202).unwrap();
        stack.push(0x404).unwrap();
        assert_eq!(&[0x202, 0x404], stack.as_slice());
        assert_eq!(Ok(0x404), stack.pop());
        assert_eq!(Ok(0x202), stack.pop());
    }

    #[test]
    fn sp_tracks_depth() {
        let mut stack = Stack::new();
        for depth in 1..=STACK_DEPTH {
            stack.push(0x200).unwrap();
            assert_eq!(depth, stack.sp());
        }
        assert_eq!(Err(StackFault::Overflow), stack.push(0x200));
        // a failed push leaves the stack alone
        assert_eq!(STACK_DEPTH, stack.sp());
    }

    #[test]
    fn underflow_leaves_sp_at_zero() {
        let mut stack = Stack::new();
        assert_eq!(Err(StackFault::Underflow), stack.pop());
        assert_eq!(0, stack.sp());
    }

    #[test]
    fn clear() {
        let mut stack = Stack::new();
        stack.push(0x300).unwrap();
        stack.clear();
        assert_eq!(Stack::new(), stack);
    }
}
