// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Contains implementations for each Chip-8 [Insn]
//!
//! Instructions that set vF compute the flag first and write vX last,
//! so with x == F the result wins over the flag.

use super::{
    mem::{CHARSET_START, GLYPH_SIZE},
    *,
};
use rand::random;

impl CPU {
    /// Executes a single [Insn]
    ///
    /// The program counter already points past the instruction.
    #[rustfmt::skip]
    #[inline(always)]
    pub(super) fn execute(&mut self, screen: &mut Screen, instruction: Insn) -> std::result::Result<(), StackFault> {
        match instruction {
            Insn::Cls                 => self.clear_screen(screen),
            Insn::Ret                 => self.ret()?,
            Insn::Jump       {    A } => self.jump(A),
            Insn::Call       {    A } => self.call(A)?,
            Insn::SkipEqByte { x, B } => self.skip_equals_immediate(x, B),
            Insn::SkipNeByte { x, B } => self.skip_not_equals_immediate(x, B),
            Insn::SkipEq     { y, x } => self.skip_equals(x, y),
            Insn::LoadByte   { x, B } => self.load_immediate(x, B),
            Insn::AddByte    { x, B } => self.add_immediate(x, B),
            Insn::Load       { y, x } => self.load(x, y),
            Insn::Or         { y, x } => self.or(x, y),
            Insn::And        { y, x } => self.and(x, y),
            Insn::Xor        { y, x } => self.xor(x, y),
            Insn::Add        { y, x } => self.add(x, y),
            Insn::Sub        { y, x } => self.sub(x, y),
            Insn::Shr        { x, .. } => self.shift_right(x),
            Insn::SubN       { y, x } => self.backwards_sub(x, y),
            Insn::Shl        { x, .. } => self.shift_left(x),
            Insn::SkipNe     { y, x } => self.skip_not_equals(x, y),
            Insn::LoadI      {    A } => self.load_i_immediate(A),
            Insn::Branch     {    A } => self.jump_indexed(A),
            Insn::Rand       { x, B } => self.rand(x, B),
            Insn::Draw    { y, x, n } => self.draw(x, y, n, screen),
            Insn::SkipKey    { x    } => self.skip_key_equals(x),
            Insn::SkipNotKey { x    } => self.skip_key_not_equals(x),
            Insn::LoadDelay  { x    } => self.load_delay_timer(x),
            Insn::WaitKey    { x    } => self.wait_for_key(x),
            Insn::StoreDelay { x    } => self.store_delay_timer(x),
            Insn::StoreSound { x    } => self.store_sound_timer(x),
            Insn::AddI       { x    } => self.add_i(x),
            Insn::Glyph      { x    } => self.load_sprite(x),
            Insn::Bcd        { x    } => self.bcd_convert(x),
            Insn::StoreRegs  { x    } => self.store_dma(x),
            Insn::LoadRegs   { x    } => self.load_dma(x),
        }
        Ok(())
    }

    #[inline(always)]
    fn skip(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }
}

/// |`00nn`| Screen and subroutine control
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`00e0`| Clear screen memory to all 0       |
/// |`00ee`| Return from subroutine             |
impl CPU {
    /// |`00e0`| Clears the screen memory to 0
    #[inline(always)]
    pub(super) fn clear_screen(&mut self, screen: &mut Screen) {
        screen.clear();
    }
    /// |`00ee`| Returns from subroutine
    #[inline(always)]
    pub(super) fn ret(&mut self) -> std::result::Result<(), StackFault> {
        self.pc = self.stack.pop()?;
        log::debug!("ret to {:03x}, depth {}", self.pc, self.stack.sp());
        Ok(())
    }
}

/// |`1aaa`| Sets pc to an absolute address
impl CPU {
    /// |`1aaa`| Sets the program counter to an absolute address
    #[inline(always)]
    pub(super) fn jump(&mut self, a: Adr) {
        self.pc = a;
    }
}

/// |`2aaa`| Pushes pc onto the stack, then jumps to a
impl CPU {
    /// |`2aaa`| Pushes pc onto the stack, then jumps to a
    #[inline(always)]
    pub(super) fn call(&mut self, a: Adr) -> std::result::Result<(), StackFault> {
        self.stack.push(self.pc)?;
        log::debug!("call {a:03x} from {:03x}, depth {}", self.pc, self.stack.sp());
        self.pc = a;
        Ok(())
    }
}

/// |`3xbb`| Skips next instruction if register X == b
impl CPU {
    /// |`3xbb`| Skips the next instruction if register X == b
    #[inline(always)]
    pub(super) fn skip_equals_immediate(&mut self, x: Reg, b: u8) {
        if self.v[x] == b {
            self.skip();
        }
    }
}

/// |`4xbb`| Skips next instruction if register X != b
impl CPU {
    /// |`4xbb`| Skips the next instruction if register X != b
    #[inline(always)]
    pub(super) fn skip_not_equals_immediate(&mut self, x: Reg, b: u8) {
        if self.v[x] != b {
            self.skip();
        }
    }
}

/// |`5xy0`| Skip next instruction if vX == vY
impl CPU {
    /// |`5xy0`| Skips the next instruction if register X == register Y
    #[inline(always)]
    pub(super) fn skip_equals(&mut self, x: Reg, y: Reg) {
        if self.v[x] == self.v[y] {
            self.skip();
        }
    }
}

/// |`6xbb`| Loads immediate byte b into register vX
impl CPU {
    /// |`6xbb`| Loads immediate byte b into register vX
    #[inline(always)]
    pub(super) fn load_immediate(&mut self, x: Reg, b: u8) {
        self.v[x] = b;
    }
}

/// |`7xbb`| Adds immediate byte b to register vX
impl CPU {
    /// |`7xbb`| Adds immediate byte b to register vX. vF is untouched.
    #[inline(always)]
    pub(super) fn add_immediate(&mut self, x: Reg, b: u8) {
        self.v[x] = self.v[x].wrapping_add(b);
    }
}

/// |`8xyn`| Performs ALU operation
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`8xy0`| X = Y                              |
/// |`8xy1`| X = X \| Y                         |
/// |`8xy2`| X = X & Y                          |
/// |`8xy3`| X = X ^ Y                          |
/// |`8xy4`| X = X + Y; Set vF=carry            |
/// |`8xy5`| X = X - Y; Set vF=X > Y            |
/// |`8xy6`| X = X >> 1; Set vF=low bit         |
/// |`8xy7`| X = Y - X; Set vF=Y > X            |
/// |`8xyE`| X = X << 1; Set vF=high bit        |
impl CPU {
    /// |`8xy0`| Loads the value of y into x
    #[inline(always)]
    pub(super) fn load(&mut self, x: Reg, y: Reg) {
        self.v[x] = self.v[y];
    }
    /// |`8xy1`| Performs bitwise or of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn or(&mut self, x: Reg, y: Reg) {
        self.v[x] |= self.v[y];
    }
    /// |`8xy2`| Performs bitwise and of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn and(&mut self, x: Reg, y: Reg) {
        self.v[x] &= self.v[y];
    }
    /// |`8xy3`| Performs bitwise xor of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn xor(&mut self, x: Reg, y: Reg) {
        self.v[x] ^= self.v[y];
    }
    /// |`8xy4`| Performs addition of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn add(&mut self, x: Reg, y: Reg) {
        let (sum, carry) = self.v[x].overflowing_add(self.v[y]);
        self.v[0xf] = carry.into();
        self.v[x] = sum;
    }
    /// |`8xy5`| Performs subtraction of vX and vY, and stores the result in vX
    ///
    /// vF is set only when vX is strictly greater than vY.
    #[inline(always)]
    pub(super) fn sub(&mut self, x: Reg, y: Reg) {
        let (vx, vy) = (self.v[x], self.v[y]);
        self.v[0xf] = (vx > vy).into();
        self.v[x] = vx.wrapping_sub(vy);
    }
    /// |`8xy6`| Performs bitwise right shift of vX. vY is ignored.
    #[inline(always)]
    pub(super) fn shift_right(&mut self, x: Reg) {
        let vx = self.v[x];
        self.v[0xf] = vx & 1;
        self.v[x] = vx >> 1;
    }
    /// |`8xy7`| Performs subtraction of vY and vX, and stores the result in vX
    ///
    /// vF is set only when vY is strictly greater than vX.
    #[inline(always)]
    pub(super) fn backwards_sub(&mut self, x: Reg, y: Reg) {
        let (vx, vy) = (self.v[x], self.v[y]);
        self.v[0xf] = (vy > vx).into();
        self.v[x] = vy.wrapping_sub(vx);
    }
    /// |`8xyE`| Performs bitwise left shift of vX. vY is ignored.
    #[inline(always)]
    pub(super) fn shift_left(&mut self, x: Reg) {
        let vx = self.v[x];
        self.v[0xf] = vx >> 7;
        self.v[x] = vx << 1;
    }
}

/// |`9xy0`| Skip next instruction if vX != vY
impl CPU {
    /// |`9xy0`| Skip next instruction if X != y
    #[inline(always)]
    pub(super) fn skip_not_equals(&mut self, x: Reg, y: Reg) {
        if self.v[x] != self.v[y] {
            self.skip();
        }
    }
}

/// |`Aaaa`| Load address #a into register I
impl CPU {
    /// |`Aadr`| Load address #adr into register I
    #[inline(always)]
    pub(super) fn load_i_immediate(&mut self, a: Adr) {
        self.i = a;
    }
}

/// |`Baaa`| Jump to &adr + v0
impl CPU {
    /// |`Badr`| Jump to &adr + v0
    ///
    /// The sum may pass `0xfff`; fetches wrap it back into memory.
    #[inline(always)]
    pub(super) fn jump_indexed(&mut self, a: Adr) {
        self.pc = a.wrapping_add(self.v[0] as Adr);
    }
}

/// |`Cxbb`| Stores a random number & the provided byte into vX
impl CPU {
    /// |`Cxbb`| Stores a random number & the provided byte into vX
    #[inline(always)]
    pub(super) fn rand(&mut self, x: Reg, b: u8) {
        self.v[x] = random::<u8>() & b;
    }
}

/// |`Dxyn`| Draws n-byte sprite to the screen at coordinates (vX, vY)
impl CPU {
    /// |`Dxyn`| Draws n-byte sprite to the screen at coordinates (vX, vY)
    ///
    /// Each sprite row is read from I + row, and XORed onto the screen.
    /// Pixels that fall off an edge wrap around to the other side.
    /// vF is set if any pixel was turned off.
    #[inline(always)]
    pub(super) fn draw(&mut self, x: Reg, y: Reg, n: Nib, screen: &mut Screen) {
        let (x, y) = (self.v[x] as usize, self.v[y] as usize);
        let mut collided = false;
        for row in 0..n as Adr {
            let sprite = self.mem.read(self.i.wrapping_add(row));
            for col in 0..8 {
                if sprite << col & 0x80 != 0 {
                    collided |= screen.xor_pixel(x + col, y + row as usize);
                }
            }
        }
        self.v[0xf] = collided.into();
    }
}

/// |`Exbb`| Skips instruction on value of keypress
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`eX9e`| Skip next instruction if key == vX |
/// |`eXa1`| Skip next instruction if key != vX |
impl CPU {
    /// |`Ex9E`| Skip next instruction if key == vX
    #[inline(always)]
    pub(super) fn skip_key_equals(&mut self, x: Reg) {
        if self.key_held(x) {
            self.skip();
        }
    }
    /// |`ExA1`| Skip next instruction if key != vX
    #[inline(always)]
    pub(super) fn skip_key_not_equals(&mut self, x: Reg) {
        if !self.key_held(x) {
            self.skip();
        }
    }
    /// Reports whether the key named by vX is held. Digits past 0xF are never held.
    fn key_held(&self, x: Reg) -> bool {
        match self.keys.is_pressed(self.v[x] as usize) {
            Ok(held) => held,
            Err(e) => {
                log::warn!("{:03x}: {e}", self.pc.wrapping_sub(2));
                false
            }
        }
    }
}

/// |`Fxbb`| Performs IO
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`fX07`| Set vX to value in delay timer     |
/// |`fX0a`| Wait for input, store key in vX    |
/// |`fX15`| Set delay timer to the value in vX |
/// |`fX18`| Set sound timer to the value in vX |
/// |`fX1e`| Add vX to I                        |
/// |`fX29`| Load sprite for character x into I |
/// |`fX33`| BCD convert X into I[0..3]         |
/// |`fX55`| DMA Stor from I to registers 0..=X |
/// |`fX65`| DMA Load from I to registers 0..=X |
impl CPU {
    /// |`Fx07`| Get the current DT, and put it in vX
    /// ```py
    /// vX = DT
    /// ```
    #[inline(always)]
    pub(super) fn load_delay_timer(&mut self, x: Reg) {
        self.v[x] = self.delay;
    }
    /// |`Fx0A`| Wait for key, then vX = K
    ///
    /// Rewinds pc and sets [Flags::keypause] until [CPU::press] ends it.
    /// The instruction then runs again, and consumes the pressed key.
    #[inline(always)]
    pub(super) fn wait_for_key(&mut self, x: Reg) {
        if let Some(key) = self.flags.lastkey.take() {
            self.v[x] = key as u8;
        } else {
            log::debug!("Waiting for key at {:03x}", self.pc.wrapping_sub(2));
            self.pc = self.pc.wrapping_sub(2);
            self.flags.keypause = true;
        }
    }
    /// |`Fx15`| Load vX into DT
    /// ```py
    /// DT = vX
    /// ```
    #[inline(always)]
    pub(super) fn store_delay_timer(&mut self, x: Reg) {
        self.delay = self.v[x];
    }
    /// |`Fx18`| Load vX into ST
    /// ```py
    /// ST = vX;
    /// ```
    #[inline(always)]
    pub(super) fn store_sound_timer(&mut self, x: Reg) {
        self.sound = self.v[x];
    }
    /// |`Fx1e`| Add vX to I, wrapping within the address space
    /// ```py
    /// I = (I + vX) & 0xfff;
    /// ```
    #[inline(always)]
    pub(super) fn add_i(&mut self, x: Reg) {
        self.i = self.i.wrapping_add(self.v[x] as Adr) & mem::ADDR_MASK;
    }
    /// |`Fx29`| Load sprite for character x into I
    /// ```py
    /// I = sprite(X);
    /// ```
    #[inline(always)]
    pub(super) fn load_sprite(&mut self, x: Reg) {
        self.i = CHARSET_START + GLYPH_SIZE * self.v[x] as Adr;
    }
    /// |`Fx33`| BCD convert X into I`[0..3]`
    #[inline(always)]
    pub(super) fn bcd_convert(&mut self, x: Reg) {
        let x = self.v[x];
        self.mem.write(self.i.wrapping_add(2), x % 10);
        self.mem.write(self.i.wrapping_add(1), x / 10 % 10);
        self.mem.write(self.i, x / 100 % 10);
    }
    /// |`Fx55`| DMA Stor from I to registers 0..=X
    ///
    /// I is left unchanged.
    #[inline(always)]
    pub(super) fn store_dma(&mut self, x: Reg) {
        for reg in 0..=x {
            self.mem.write(self.i.wrapping_add(reg as Adr), self.v[reg]);
        }
    }
    /// |`Fx65`| DMA Load from I to registers 0..=X
    ///
    /// I is left unchanged.
    #[inline(always)]
    pub(super) fn load_dma(&mut self, x: Reg) {
        for reg in 0..=x {
            self.v[reg] = self.mem.read(self.i.wrapping_add(reg as Adr));
        }
    }
}
