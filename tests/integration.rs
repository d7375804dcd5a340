//! Testing methods on chip8vm's public API
use chip8vm::prelude::*;
use std::{collections::hash_map::DefaultHasher, hash::Hash};

/// Runs `rom` for `steps` instructions on a fresh machine
fn run(rom: &[u8], steps: usize) -> Chip8 {
    let mut ch8 = Chip8::new(rom).expect("rom should fit");
    ch8.cpu
        .multistep(&mut ch8.screen, steps)
        .expect("rom should only contain valid instructions");
    ch8
}

#[test]
fn chip8() {
    let ch8 = Chip8::default(); // Default
    let ch82 = ch8.clone(); // Clone
    assert_eq!(ch8, ch82); // PartialEq
    println!("{ch8:?}"); // Debug
}

#[test]
fn load_then_add() {
    // ld v0, #0a ; add v0, #05
    let ch8 = run(b"\x60\x0a\x70\x05", 2);
    assert_eq!(0x0f, ch8.cpu.v()[0]);
    assert_eq!(0x204, ch8.cpu.pc());
}

mod timers {
    use super::*;
    #[test]
    fn unaffected_by_instructions() {
        // ld v1, #78 ; ld DT, v1 ; ld ST, v1 ; jp 206
        let ch8 = run(b"\x61\x78\xf1\x15\xf1\x18\x12\x06", 1000);
        assert_eq!((120, 120), (ch8.cpu.delay(), ch8.cpu.sound()));
    }
    #[test]
    fn one_second_of_frames() {
        let mut ch8 = run(b"\x61\x78\xf1\x15\xf1\x18\x12\x06", 3);
        for _ in 0..60 {
            ch8.frame(10).unwrap();
        }
        assert_eq!((60, 60), (ch8.cpu.delay(), ch8.cpu.sound()));
        assert!(ch8.cpu.sound_active());
    }
    #[test]
    fn stop_at_zero() {
        let mut ch8 = run(b"\x12\x00", 0);
        ch8.cpu.set_delay(1);
        ch8.frame(1).unwrap().frame(1).unwrap();
        assert_eq!(0, ch8.cpu.delay());
        assert!(!ch8.cpu.sound_active());
    }
}

mod stack {
    use super::*;
    #[test]
    fn call_and_return() {
        // 200: call 206 ; 202: jp 202 ; 204: (pad) ; 206: ret
        let mut ch8 = run(b"\x22\x06\x12\x02\x00\x00\x00\xee", 1);
        assert_eq!(0x206, ch8.cpu.pc());
        assert_eq!(&[0x202], ch8.cpu.stack());
        ch8.cpu.multistep(&mut ch8.screen, 1).unwrap();
        assert_eq!(0x202, ch8.cpu.pc());
        assert_eq!(0, ch8.cpu.sp());
    }
    #[test]
    fn sixteen_calls_fit() {
        // call 200, forever
        let ch8 = run(b"\x22\x00", STACK_DEPTH);
        assert_eq!(STACK_DEPTH, ch8.cpu.sp());
    }
    #[test]
    fn seventeenth_call_overflows() {
        let mut ch8 = run(b"\x22\x00", STACK_DEPTH);
        match ch8.frame(1) {
            Err(Error::StackOverflow { pc: 0x200, word: 0x2200 }) => {}
            other => panic!("{other:?}"),
        }
        assert!(ch8.cpu.flags.halted);
    }
    #[test]
    fn return_without_call_underflows() {
        let mut ch8 = Chip8::new(b"\x00\xee").unwrap();
        let err = ch8.frame(1).unwrap_err();
        assert!(matches!(err, Error::StackUnderflow { pc: 0x200, .. }));
        assert!(err.is_fatal());
    }
}

mod alu {
    use super::*;
    #[test]
    fn add_carries() {
        // ld v0, #ff ; ld v1, #01 ; add v0, v1
        let ch8 = run(b"\x60\xff\x61\x01\x80\x14", 3);
        assert_eq!((0x00, 0x01), (ch8.cpu.v()[0], ch8.cpu.v()[0xf]));
    }
    #[test]
    fn sub_borrows() {
        // ld v0, #05 ; ld v1, #0a ; sub v0, v1
        let ch8 = run(b"\x60\x05\x61\x0a\x80\x15", 3);
        assert_eq!((0xfb, 0x00), (ch8.cpu.v()[0], ch8.cpu.v()[0xf]));
    }
    #[test]
    fn shl_shifts_out_high_bit() {
        // ld v2, #81 ; shl v2
        let ch8 = run(b"\x62\x81\x82\x0e", 2);
        assert_eq!((0x02, 0x01), (ch8.cpu.v()[2], ch8.cpu.v()[0xf]));
    }
    #[test]
    fn bcd_of_255() {
        // ld v3, #ff ; ld I, $300 ; ld B, v3
        let ch8 = run(b"\x63\xff\xa3\x00\xf3\x33", 3);
        let mem = ch8.cpu.mem();
        assert_eq!([2, 5, 5], [mem.read(0x300), mem.read(0x301), mem.read(0x302)]);
    }
}

mod display {
    use super::*;
    /// ld I, glyph(v0) ; drw v1, v2, 5
    const DRAW_ZERO: &[u8] = b"\xf0\x29\xd1\x25";

    #[test]
    fn draw_twice_is_blank() {
        let mut ch8 = run(DRAW_ZERO, 2);
        assert!(ch8.screen.pixels().any(|(_, _, set)| set));
        assert_eq!(0, ch8.cpu.v()[0xf]);
        // redraw the same sprite
        ch8.cpu.set_pc(0x202);
        ch8.cpu.multistep(&mut ch8.screen, 1).unwrap();
        assert_eq!(Screen::new(), ch8.screen);
        assert_eq!(1, ch8.cpu.v()[0xf]);
    }
    #[test]
    fn cls_clears() {
        let mut ch8 = run(DRAW_ZERO, 2);
        ch8.cpu.mem_mut().write(0x204, 0x00);
        ch8.cpu.mem_mut().write(0x205, 0xe0);
        ch8.cpu.multistep(&mut ch8.screen, 1).unwrap();
        assert_eq!(Screen::new(), ch8.screen);
    }
    #[test]
    fn screen_dimensions() {
        assert_eq!(WIDTH * HEIGHT, Screen::default().pixels().count());
        assert_eq!(WIDTH * HEIGHT / 8, Screen::default().as_bytes().len());
    }
}

mod keys {
    use super::*;
    #[test]
    fn invalid_key() {
        let mut cpu = CPU::default();
        match cpu.press(KEY_COUNT) {
            Err(Error::InvalidKey { key }) => assert_eq!(KEY_COUNT, key),
            other => panic!("{other:?}"),
        }
    }
    #[test]
    fn set_key() {
        let mut cpu = CPU::default();
        assert!(cpu.set_key(0xa, true).unwrap());
        assert!(cpu.is_pressed(0xa).unwrap());
        assert!(cpu.keys()[0xa]);
        assert!(cpu.set_key(0xa, false).unwrap());
        assert!(!cpu.is_pressed(0xa).unwrap());
    }
    #[test]
    fn wait_for_key_suspends_frames() {
        // ld v4, K ; jp 202
        let mut ch8 = Chip8::new(b"\xf4\x0a\x12\x02").unwrap();
        ch8.cpu.set_delay(10);
        for _ in 0..5 {
            ch8.frame(10).unwrap();
        }
        // Suspended, but timers keep running
        assert!(ch8.cpu.flags.keypause);
        assert_eq!(0x200, ch8.cpu.pc());
        assert_eq!(5, ch8.cpu.delay());
        ch8.cpu.press(0xc).unwrap();
        ch8.frame(10).unwrap();
        assert_eq!(0xc, ch8.cpu.v()[4]);
        assert_eq!(0x202, ch8.cpu.pc());
    }
}

mod rom {
    use super::*;
    use std::path::PathBuf;

    fn scratch(name: &str, bytes: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("chip8vm-{}-{name}", std::process::id()));
        std::fs::write(&path, bytes).expect("temp dir should be writable");
        path
    }

    #[test]
    fn too_large() {
        let rom = vec![0; 0xE01];
        match Chip8::new(&rom) {
            Err(Error::RomTooLarge { size, max }) => assert_eq!((0xE01, 0xE00), (size, max)),
            other => panic!("{other:?}"),
        }
    }
    #[test]
    fn largest_fits() {
        let rom = vec![0x12; 0xE00];
        let ch8 = Chip8::new(&rom).unwrap();
        assert_eq!(0x12, ch8.cpu.mem().read(0xfff));
    }
    #[test]
    fn missing_file() {
        match Chip8::load("this/rom/does/not/exist.ch8") {
            Err(Error::RomReadFailure { path, .. }) => {
                assert!(path.ends_with("exist.ch8"))
            }
            other => panic!("{other:?}"),
        }
    }
    #[test]
    fn load_from_disk() {
        let path = scratch("load.ch8", b"\x60\x0a\x70\x05");
        let mut ch8 = Chip8::load(&path).unwrap();
        ch8.frame(2).unwrap();
        assert_eq!(0x0f, ch8.cpu.v()[0]);
        std::fs::remove_file(path).ok();
    }
    #[test]
    fn too_large_on_disk() {
        let path = scratch("large.ch8", &[0; 0x1000]);
        assert!(matches!(Chip8::load(&path), Err(Error::RomTooLarge { .. })));
        std::fs::remove_file(path).ok();
    }
}

mod faults {
    use super::*;
    #[test]
    fn unknown_opcode_halts() {
        let mut ch8 = Chip8::new(b"\xff\xff").unwrap();
        let err = ch8.frame(10).unwrap_err();
        assert!(matches!(err, Error::UnknownOpcode { pc: 0x200, word: 0xffff }));
        assert!(ch8.cpu.flags.halted);
        assert_eq!(1, ch8.cpu.cycle());
        // The next frame does nothing
        ch8.frame(10).unwrap();
        assert_eq!(1, ch8.cpu.cycle());
    }
    #[test]
    fn reset_recovers() {
        let mut ch8 = Chip8::new(b"\x12\x00").unwrap();
        ch8.cpu.flags.halted = true;
        ch8.reset();
        ch8.frame(4).unwrap();
        assert_eq!(4, ch8.cpu.cycle());
    }
    #[test]
    fn breakpoint_is_not_fatal() {
        let mut ch8 = Chip8::new(b"\x00\xe0\x12\x02").unwrap();
        ch8.cpu.set_break(0x202);
        let err = ch8.frame(10).unwrap_err();
        assert!(!err.is_fatal());
        assert!(ch8.cpu.flags.pause);
        ch8.cpu.unset_break(0x202).flags.pause();
        ch8.frame(3).unwrap();
        assert_eq!(0x202, ch8.cpu.pc());
    }
}

mod flags {
    use super::*;
    #[test]
    fn debug() {
        println!("{:?}", Flags::default());
    }
    #[test]
    fn eq() {
        let flags = Flags::default();
        assert_eq!(flags, flags);
        assert_ne!(flags, Flags { pause: true, ..Default::default() });
    }
    #[test]
    fn hash() {
        let mut hasher = DefaultHasher::new();
        Flags::default().hash(&mut hasher);
        println!("{hasher:?}");
    }
    #[test]
    fn is_paused() {
        assert!(!Flags::default().is_paused());
        assert!(Flags { keypause: true, ..Default::default() }.is_paused());
        assert!(Flags { halted: true, ..Default::default() }.is_paused());
    }
}

mod region {
    use super::*;
    #[test]
    fn display() {
        println!("{}{}", Region::Charset, Region::Program);
    }
    #[test]
    fn program_region() {
        let mut ch8 = Chip8::new(b"\xab\xcd").unwrap();
        assert_eq!(&[0xab, 0xcd], &ch8.cpu.mem().get_region(Region::Program)[..2]);
        ch8.cpu.mem_mut().clear_region(Region::Program);
        assert!(ch8.cpu.mem().get_region(Region::Program).iter().all(|&b| b == 0));
    }
}

#[test]
fn disassemble() {
    let dis = Dis::default();
    assert!(dis.once(0x00e0).contains("cls"));
    assert_eq!(Some(Insn::Cls), Insn::from_word(0x00e0));
}
