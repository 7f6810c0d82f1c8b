use super::cpu::Cpu;
use super::structs::{AddressingMode, Instruction, WRITE};

#[macro_export]
macro_rules! bytes_to_addr {
    ($fst: expr, $snd: expr) => {{
        (u16::from($snd) << 8) | u16::from($fst)
    }};
}

// Dispatch tables for the regular part of the opcode space, indexed by the
// cc (low two bits) and aaa (top three bits) / bbb (middle three bits)
// fields of the opcode. None marks a slot with no documented single-byte
// encoding; the decoder reports those and substitutes a NOP.

#[rustfmt::skip]
const INSTRUCTIONS: [[Option<Instruction>; 8]; 3] = [
    [
        None,                         Some(Instruction::BIT),
        Some(Instruction::JMP),       Some(Instruction::JMPI),
        Some(Instruction::STY),       Some(Instruction::LDY),
        Some(Instruction::CPY),       Some(Instruction::CPX),
    ],
    [
        Some(Instruction::ORA),       Some(Instruction::AND),
        Some(Instruction::EOR),       Some(Instruction::ADC),
        Some(Instruction::STA),       Some(Instruction::LDA),
        Some(Instruction::CMP),       Some(Instruction::SBC),
    ],
    [
        Some(Instruction::ASL),       Some(Instruction::ROL),
        Some(Instruction::LSR),       Some(Instruction::ROR),
        Some(Instruction::STX),       Some(Instruction::LDX),
        Some(Instruction::DEC),       Some(Instruction::INC),
    ],
];

#[rustfmt::skip]
const ADDRESSING_MODES: [[Option<AddressingMode>; 8]; 3] = [
    [
        Some(AddressingMode::Imm),    Some(AddressingMode::ZP),
        None,                         Some(AddressingMode::Abs),
        None,                         Some(AddressingMode::ZPX),
        None,                         Some(AddressingMode::AbsX),
    ],
    [
        Some(AddressingMode::IndX),   Some(AddressingMode::ZP),
        Some(AddressingMode::Imm),    Some(AddressingMode::Abs),
        Some(AddressingMode::IndY),   Some(AddressingMode::ZPX),
        Some(AddressingMode::AbsY),   Some(AddressingMode::AbsX),
    ],
    [
        Some(AddressingMode::Imm),    Some(AddressingMode::ZP),
        Some(AddressingMode::Accum),  Some(AddressingMode::Abs),
        None,                         Some(AddressingMode::ZPX),
        None,                         Some(AddressingMode::AbsX),
    ],
];

/// Branch mnemonics indexed by the flag-select and set/clear bits of the
/// opcode. The branch micro-program re-derives its condition from IR; the
/// tag mostly matters for debuggers and traces.
#[rustfmt::skip]
const BRANCHES: [[Instruction; 2]; 4] = [
    [Instruction::BPL, Instruction::BMI],
    [Instruction::BVC, Instruction::BVS],
    [Instruction::BCC, Instruction::BCS],
    [Instruction::BNE, Instruction::BEQ],
];

/// The 00/20/40/60 column.
const STACK_JUMPS: [Instruction; 4] = [
    Instruction::BRK,
    Instruction::JSR,
    Instruction::RTI,
    Instruction::RTS,
];

/// Implied-mode opcodes ending in 8, indexed by the high nibble.
#[rustfmt::skip]
const IMPLIED_X8: [Instruction; 16] = [
    Instruction::PHP, Instruction::CLC, Instruction::PLP, Instruction::SEC,
    Instruction::PHA, Instruction::CLI, Instruction::PLA, Instruction::SEI,
    Instruction::DEY, Instruction::TYA, Instruction::TAY, Instruction::CLV,
    Instruction::INY, Instruction::CLD, Instruction::INX, Instruction::SED,
];

/// Implied-mode opcodes ending in A in the upper half of the opcode space,
/// indexed by the high nibble minus 8.
#[rustfmt::skip]
const IMPLIED_XA: [Option<Instruction>; 8] = [
    Some(Instruction::TXA), Some(Instruction::TXS),
    Some(Instruction::TAX), Some(Instruction::TSX),
    Some(Instruction::DEX), None,
    Some(Instruction::NOP), None,
];

/// Decode an opcode byte into an instruction and (optionally) an addressing
/// mode micro-program.
///
/// `None` as the outer result means the byte has no documented decoding
/// under the dispatch rules. An inner `None` addressing mode means the
/// instruction's own micro-program drives every cycle (branches, the
/// 00/20/40/60 column, and both JMP forms).
pub fn decode_instruction(ir: u8) -> Option<(Instruction, Option<AddressingMode>)> {
    // Branches
    if ir & 0x1F == 0x10 {
        let instr = BRANCHES[usize::from(ir >> 6)][usize::from((ir >> 5) & 1)];
        return Some((instr, None));
    }

    // BRK / JSR / RTI / RTS
    if ir & 0x9F == 0x00 {
        return Some((STACK_JUMPS[usize::from(ir >> 5)], None));
    }

    // Stack, flag and register ops ending in 8
    if ir & 0x0F == 0x08 {
        return Some((IMPLIED_X8[usize::from(ir >> 4)], Some(AddressingMode::Impl)));
    }

    // Transfers and NOP ending in A in the upper half
    if ir & 0x8F == 0x8A {
        let instr = IMPLIED_XA[usize::from((ir >> 4) - 0x8)]?;
        return Some((instr, Some(AddressingMode::Impl)));
    }

    // Literally everything else
    let cc = usize::from(ir & 0b11);
    if cc > 2 {
        return None;
    }
    let instr = INSTRUCTIONS[cc][usize::from(ir >> 5)]?;
    let addr_mode = ADDRESSING_MODES[cc][usize::from((ir >> 2) & 0b111)];

    match instr {
        // JMP runs its own fetch cycles
        Instruction::JMP | Instruction::JMPI => Some((instr, None)),
        // LDX and STX index with Y where the table says X
        Instruction::LDX | Instruction::STX if addr_mode == Some(AddressingMode::ZPX) => {
            Some((instr, Some(AddressingMode::ZPY)))
        }
        Instruction::LDX if addr_mode == Some(AddressingMode::AbsX) => {
            Some((instr, Some(AddressingMode::AbsY)))
        }
        // Stores and read-modify-writes have no immediate form; the grid
        // slot belongs to an undocumented opcode there
        Instruction::STA
        | Instruction::STX
        | Instruction::STY
        | Instruction::ASL
        | Instruction::ROL
        | Instruction::LSR
        | Instruction::ROR
        | Instruction::DEC
        | Instruction::INC
            if addr_mode == Some(AddressingMode::Imm) =>
        {
            None
        }
        _ => match addr_mode {
            Some(mode) => Some((instr, Some(mode))),
            None => None,
        },
    }
}

/// Format a one-line snapshot of the register file, micro-state and pins,
/// for trace logs and the demo driver.
pub fn trace_line(cpu: &Cpu, cycles: u64) -> String {
    let instr = match cpu.instr {
        Some(i) => format!("{:?}", i),
        None => String::from("---"),
    };
    format!(
        "{:04X}  IR:{:02X} {:4} ipc:{} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} {} ${:04X}={:02X} CYC:{}",
        cpu.state.pc,
        cpu.ir,
        instr,
        cpu.ipc,
        cpu.state.acc,
        cpu.state.x,
        cpu.state.y,
        cpu.state.status.bits(),
        cpu.state.stack,
        if cpu.pins.rw == WRITE { "W" } else { "r" },
        cpu.pins.addr,
        cpu.pins.data,
        cycles
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_instruction_correctly() {
        let res = decode_instruction(0xEA).unwrap();
        assert_eq!(res.0, Instruction::NOP);
        assert_eq!(res.1, Some(AddressingMode::Impl));
    }

    #[test]
    fn decodes_branches_from_ir_bits() {
        for (op, instr) in [
            (0x10, Instruction::BPL),
            (0x30, Instruction::BMI),
            (0x50, Instruction::BVC),
            (0x70, Instruction::BVS),
            (0x90, Instruction::BCC),
            (0xB0, Instruction::BCS),
            (0xD0, Instruction::BNE),
            (0xF0, Instruction::BEQ),
        ] {
            let res = decode_instruction(op).unwrap();
            assert_eq!(res.0, instr, "opcode {:02X}", op);
            assert_eq!(res.1, None);
        }
    }

    #[test]
    fn decodes_stack_jump_column() {
        assert_eq!(decode_instruction(0x00), Some((Instruction::BRK, None)));
        assert_eq!(decode_instruction(0x20), Some((Instruction::JSR, None)));
        assert_eq!(decode_instruction(0x40), Some((Instruction::RTI, None)));
        assert_eq!(decode_instruction(0x60), Some((Instruction::RTS, None)));
    }

    #[test]
    fn decodes_regular_grid() {
        assert_eq!(
            decode_instruction(0xA9),
            Some((Instruction::LDA, Some(AddressingMode::Imm)))
        );
        assert_eq!(
            decode_instruction(0x7D),
            Some((Instruction::ADC, Some(AddressingMode::AbsX)))
        );
        assert_eq!(
            decode_instruction(0x91),
            Some((Instruction::STA, Some(AddressingMode::IndY)))
        );
        assert_eq!(
            decode_instruction(0x2C),
            Some((Instruction::BIT, Some(AddressingMode::Abs)))
        );
        assert_eq!(
            decode_instruction(0x4A),
            Some((Instruction::LSR, Some(AddressingMode::Accum)))
        );
        assert_eq!(
            decode_instruction(0xE0),
            Some((Instruction::CPX, Some(AddressingMode::Imm)))
        );
    }

    #[test]
    fn applies_index_register_overrides() {
        // LDX and STX swap the X-indexed modes for their Y twins
        assert_eq!(
            decode_instruction(0xB6),
            Some((Instruction::LDX, Some(AddressingMode::ZPY)))
        );
        assert_eq!(
            decode_instruction(0x96),
            Some((Instruction::STX, Some(AddressingMode::ZPY)))
        );
        assert_eq!(
            decode_instruction(0xBE),
            Some((Instruction::LDX, Some(AddressingMode::AbsY)))
        );
        // LDY keeps the X-indexed modes
        assert_eq!(
            decode_instruction(0xBC),
            Some((Instruction::LDY, Some(AddressingMode::AbsX)))
        );
    }

    #[test]
    fn clears_addressing_for_jumps() {
        assert_eq!(decode_instruction(0x4C), Some((Instruction::JMP, None)));
        assert_eq!(decode_instruction(0x6C), Some((Instruction::JMPI, None)));
    }

    #[test]
    fn rejects_unknown_opcodes() {
        // cc = 3 has no documented opcodes at all
        assert_eq!(decode_instruction(0x03), None);
        assert_eq!(decode_instruction(0xFF), None);
        // documented grid slots with no addressing mode
        assert_eq!(decode_instruction(0x12), None);
        assert_eq!(decode_instruction(0x02), None);
        // holes in the xA implied group
        assert_eq!(decode_instruction(0xDA), None);
        assert_eq!(decode_instruction(0xFA), None);
    }
}
