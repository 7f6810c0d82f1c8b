//! End-to-end scenarios driven through the reference machine: the CPU only
//! ever sees its pin latch, and the machine services it exactly as the bus
//! would on real hardware.

extern crate phi2_core;

mod util;

use phi2_core::devices::bus::Motherboard;
use phi2_core::devices::cpu::Status;
use phi2_core::devices::machine::Machine;
use util::harness::{boot_with, boot_with_code};

#[test]
fn reset_loads_the_vector_in_seven_cycles() {
    let mut image = vec![0u8; 0x8000];
    image[0x7FFC] = 0x00; // RES vector -> $8000
    image[0x7FFD] = 0x80;
    let mut machine = Machine::new(&image);
    assert_eq!(machine.peek_word(0xFFFC), Some(0x8000));
    machine.reset();

    let cycles = machine.run_instruction();
    assert_eq!(cycles, 7);
    // the handler fetch is overlaid on the final cycle
    assert_eq!(machine.cpu.pins.addr, 0x8000);
    assert_eq!(machine.cpu.state.pc, 0x8001);
    // the whole stack page is untouched; only the pointer moved
    for addr in 0x0100..0x0200 {
        assert_eq!(machine.peek(addr), Some(0x00));
    }
    assert_eq!(machine.cpu.state.stack, 0xFF);
}

#[test]
fn immediate_adc_sets_negative_and_overflow() {
    // LDA #$01 / ADC #$7F
    let mut machine = boot_with_code(0x8000, &[0xA9, 0x01, 0x69, 0x7F]);
    assert_eq!(machine.cpu.state.status.bits(), 0x36);

    machine.run_instruction();
    assert_eq!(machine.cpu.state.acc, 0x01);

    machine.run_instruction();
    assert_eq!(machine.cpu.state.acc, 0x80);
    assert!(machine.cpu.state.status.contains(Status::NEGATIVE));
    assert!(machine.cpu.state.status.contains(Status::OVERFLOW));
    assert!(!machine.cpu.state.status.contains(Status::ZERO));
    assert!(!machine.cpu.state.status.contains(Status::CARRY));
}

#[test]
fn indirect_jmp_reproduces_the_page_bug() {
    // JMP ($30FF) with the pointer straddling a page: the high byte comes
    // from $3000, not $3100
    let mut machine = boot_with(
        0x1000,
        &[0x6C, 0xFF, 0x30],
        &[(0x30FF, 0x40), (0x3000, 0x50), (0x3100, 0x99)],
    );
    let cycles = machine.run_instruction();
    assert_eq!(cycles, 5);
    assert_eq!(machine.cpu.pins.addr, 0x5040);
    assert_eq!(machine.cpu.state.pc, 0x5041);
}

#[test]
fn taken_branch_across_a_page_pays_twice() {
    // LDA #$00 / BEQ +4, branching from $10FF over to $1103
    let mut machine = boot_with_code(0x10FB, &[0xA9, 0x00, 0xF0, 0x04]);
    machine.run_instruction();
    assert!(machine.cpu.state.status.contains(Status::ZERO));

    let cycles = machine.run_instruction();
    assert_eq!(cycles, 4);
    assert_eq!(machine.cpu.pins.addr, 0x1103);
}

#[test]
fn brk_rti_round_trip() {
    // BRK at $8000; the handler at $9000 comes straight back
    let mut machine = boot_with(
        0x8000,
        &[0x00, 0xEA, 0xEA],
        &[(0xFFFE, 0x00), (0xFFFF, 0x90), (0x9000, 0x40)],
    );
    let status_before = machine.cpu.state.status.bits();
    assert_eq!(machine.cpu.state.stack, 0xFF);

    let cycles = machine.run_instruction();
    assert_eq!(cycles, 7);
    assert_eq!(machine.cpu.pins.addr, 0x9000);
    assert!(machine.cpu.state.status.contains(Status::IRQ_DISABLE));
    assert_eq!(machine.cpu.state.stack, 0xFC);
    // BRK skipped its signature byte, and the stacked copy carries B
    assert_eq!(machine.peek(0x01FF), Some(0x80));
    assert_eq!(machine.peek(0x01FE), Some(0x02));
    assert_eq!(machine.peek(0x01FD), Some(status_before | 0x10));

    let cycles = machine.run_instruction();
    assert_eq!(cycles, 6);
    assert_eq!(machine.cpu.pins.addr, 0x8002);
    assert_eq!(machine.cpu.state.stack, 0xFF);
    // everything but B came back
    assert_eq!(machine.cpu.state.status.bits(), (status_before & 0xEF) | 0x20);
}

#[test]
fn stack_pushes_wrap_within_page_one() {
    // LDA #$77 / PHA / PHA with the stack pointer parked at $00
    let mut machine = boot_with_code(0x8000, &[0xA9, 0x77, 0x48, 0x48]);
    machine.cpu.state.stack = 0x00;

    machine.run_instruction();
    machine.run_instruction();
    assert_eq!(machine.peek(0x0100), Some(0x77));
    assert_eq!(machine.cpu.state.stack, 0xFF);

    machine.run_instruction();
    assert_eq!(machine.peek(0x01FF), Some(0x77));
    assert_eq!(machine.cpu.state.stack, 0xFE);
}

#[test]
fn jsr_returns_three_bytes_past_the_call() {
    // JSR $8010 ... RTS lands on the byte after the JSR's operand
    let mut machine = boot_with(0x8000, &[0x20, 0x10, 0x80, 0xEA], &[(0x8010, 0x60)]);
    assert_eq!(machine.run_instruction(), 6);
    assert_eq!(machine.cpu.pins.addr, 0x8010);
    assert_eq!(machine.run_instruction(), 6);
    assert_eq!(machine.cpu.pins.addr, 0x8003);
}

#[test]
fn stored_bytes_read_back() {
    // LDA #$5A / STA $0250 / LDA #$00 / LDA $0250
    let mut machine = boot_with_code(
        0x8000,
        &[0xA9, 0x5A, 0x8D, 0x50, 0x02, 0xA9, 0x00, 0xAD, 0x50, 0x02],
    );
    for _ in 0..4 {
        machine.run_instruction();
    }
    assert_eq!(machine.cpu.state.acc, 0x5A);
    assert_eq!(machine.peek(0x0250), Some(0x5A));
}

#[test]
fn irq_waits_for_the_mask_to_drop() {
    // CLI / NOP; the request only lands once I is clear
    let mut machine = boot_with(
        0x8000,
        &[0x58, 0xEA, 0xEA],
        &[(0xFFFE, 0x00), (0xFFFF, 0x90), (0x9000, 0x40)],
    );
    machine.irq();
    assert!(!machine.cpu.int.pending, "power-on state masks IRQ");

    machine.run_instruction(); // CLI
    machine.irq();
    let cycles = machine.run_instruction();
    assert_eq!(cycles, 7);
    assert_eq!(machine.cpu.pins.addr, 0x9000);
    // hardware entries push the exact interrupted PC: the RTI comes back to
    // the NOP the request pre-empted
    machine.run_instruction();
    assert_eq!(machine.cpu.pins.addr, 0x8001);
}
