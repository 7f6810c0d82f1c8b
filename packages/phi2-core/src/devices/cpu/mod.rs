//! The 6502 core: register file, pin latch, micro-sequencers, decoder and
//! interrupt controller.

mod cpu;
mod structs;
mod utils;

pub use self::cpu::Cpu;
pub use self::structs::{
    AddressingMode, Alu, CpuState, Instruction, InterruptLatch, Pins, Status, POWERON_CPU_STATE,
    POWERON_PINS, READ, SOFTWARE_BRK_LATCH, WRITE,
};
pub use self::utils::{decode_instruction, trace_line};
