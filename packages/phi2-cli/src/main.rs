//! Demo driver for the CPU core: builds a hard-coded memory image, asserts
//! RESET, runs a fixed cycle budget and prints a trace of what happened.

use log::info;
use simple_logger::SimpleLogger;

use phi2_core::devices::bus::Motherboard;
use phi2_core::devices::machine::Machine;

/// How many bus cycles the demo runs before dumping memory. Enough for the
/// reset sequence and the whole counting loop, with some spin at the end.
const CYCLE_BUDGET: u64 = 400;

/// Write a small counting loop at $8000: store $00..$0F to $0200..$020F,
/// then spin. Also plants the reset vector.
fn program_count_up(image: &mut [u8; 0x8000]) {
    #[rustfmt::skip]
    let code: [u8; 14] = [
        0xA2, 0x00,       // 8000  LDX #$00
        0x8A,             // 8002  TXA
        0x9D, 0x00, 0x02, // 8003  STA $0200,X
        0xE8,             // 8006  INX
        0xE0, 0x10,       // 8007  CPX #$10
        0xD0, 0xF7,       // 8009  BNE $8002
        0x4C, 0x0B, 0x80, // 800B  JMP $800B
    ];
    image[..code.len()].copy_from_slice(&code);
    image[0x7FFC] = 0x00; // RES vector -> $8000
    image[0x7FFD] = 0x80;
}

fn main() {
    SimpleLogger::new().init().unwrap();

    let mut image = [0u8; 0x8000];
    program_count_up(&mut image);

    let mut machine = Machine::new(&image);
    machine.reset();

    while machine.cycles() < CYCLE_BUDGET {
        let cycles = machine.run_instruction();
        info!("{}  (+{})", machine.trace(), cycles);
    }

    let row: Vec<String> = (0..16u16)
        .map(|i| format!("{:02X}", machine.peek(0x0200 + i).unwrap_or(0)))
        .collect();
    info!("$0200: {}", row.join(" "));
    info!(
        "ran {} cycles; {} undecodable opcodes, {} decimal-mode faults",
        machine.cycles(),
        machine.cpu.illegal_opcodes,
        machine.cpu.decimal_faults
    );
}
