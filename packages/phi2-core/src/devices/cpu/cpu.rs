//! Cycle-stepped emulator for the MOS 6502
//!
//! This does not include support for Binary Coded Decimal, which was omitted
//! on the 2A03 variant used on the NES and Famicom. Entering ADC/SBC with the
//! D flag set is counted and logged rather than silently computed in binary.
//!
//! The core advances one bus cycle per `step` call and talks to the outside
//! world exclusively through the pin latch: the enclosing system services
//! `pins` between steps the way the address/data/rw lines would be driven on
//! real hardware. Each opcode is an interleaving of addressing-mode cycles
//! with operation cycles; both sequencers are micro-programs indexed by the
//! intra-instruction program counter.

use log::{debug, warn};

use super::structs::{
    AddressingMode, Alu, CpuState, Instruction, InterruptLatch, Pins, Status, POWERON_CPU_STATE,
    POWERON_PINS, READ, SOFTWARE_BRK_LATCH, WRITE,
};
use super::utils::decode_instruction;
use crate::bytes_to_addr;

pub struct Cpu {
    /// The architectural register file
    pub state: CpuState,

    /// The external pin latch
    pub pins: Pins,

    /// ALU staging registers
    pub alu: Alu,

    //region micro-sequencer state
    /// The instruction register holds the opcode of the currently executing
    /// instruction
    pub ir: u8,

    /// The intra-instruction program counter: counts micro-cycles within the
    /// addressing phase, resets, then counts within the instruction phase
    pub ipc: u8,

    /// Scratch address accumulator shared by the multi-cycle sequencers
    pub addr_buf: u16,

    /// The instruction micro-program currently executing
    ///
    /// # Note
    ///
    /// When this is `None` the next cycle is a decode cycle: whatever byte
    /// the environment placed on the data pins is latched into `ir` and
    /// dispatched.
    pub instr: Option<Instruction>,

    /// The addressing mode of the current instruction, kept for the whole
    /// instruction so operation cycles can tell an accumulator target from a
    /// memory target
    pub addr_mode: Option<AddressingMode>,

    /// Whether the addressing sequencer has finished placing the effective
    /// address on the pins
    pub addr_done: bool,
    //endregion
    /// The interrupt controller latch
    pub int: InterruptLatch,

    //region diagnostics
    /// How many times ADC/SBC ran with D=1; those results are undefined
    pub decimal_faults: u64,

    /// How many fetched opcodes had no documented decoding
    pub illegal_opcodes: u64,
    //endregion
}

impl Cpu {
    /// Create a new CPU in the documented reset-prelude state
    ///
    /// # Note
    ///
    /// This is not a usable execution state: raise RES and run the seven
    /// cycle reset sequence before expecting meaningful fetches.
    pub fn new() -> Cpu {
        Cpu {
            state: POWERON_CPU_STATE,
            pins: POWERON_PINS,
            alu: Alu::default(),
            ir: 0,
            ipc: 0,
            addr_buf: 0,
            instr: None,
            addr_mode: None,
            addr_done: false,
            int: SOFTWARE_BRK_LATCH,
            decimal_faults: 0,
            illegal_opcodes: 0,
        }
    }

    /// Latch a nonmaskable interrupt. Its vector is read from $FFFA-$FFFB.
    pub fn raise_nmi(&mut self) {
        debug!("nonmaskable interrupt pending");
        self.int = InterruptLatch {
            pending: true,
            vector: 0xFFFA,
            writes_suppressed: false,
            push_brk: false,
            sets_irq_disable: true,
        };
    }

    /// Latch a reset. Its vector is read from $FFFC-$FFFD and the stack
    /// writes of the entry sequence are suppressed.
    pub fn raise_reset(&mut self) {
        debug!("reset pending");
        self.int = InterruptLatch {
            pending: true,
            vector: 0xFFFC,
            writes_suppressed: true,
            push_brk: false,
            sets_irq_disable: true,
        };
    }

    /// Latch an interrupt request, unless interrupts are masked. Its vector
    /// is read from $FFFE-$FFFF.
    pub fn raise_irq(&mut self) {
        if self.state.status.contains(Status::IRQ_DISABLE) {
            debug!("interrupt request ignored; I is set");
            return;
        }
        debug!("interrupt request pending");
        self.int = InterruptLatch {
            pending: true,
            vector: 0xFFFE,
            writes_suppressed: false,
            push_brk: false,
            sets_irq_disable: true,
        };
    }

    /// Advance one bus cycle.
    ///
    /// If no instruction is active this is a decode cycle (or an interrupt
    /// injection); otherwise one micro-step of the addressing mode runs and,
    /// once addressing has produced the effective address, one micro-step of
    /// the instruction. The final micro-step of every instruction overlays
    /// the next opcode fetch.
    pub fn step(&mut self) {
        // Release the bus; only an explicit store/push cycle drives it
        self.pins.rw = READ;

        if self.instr.is_none() {
            if self.int.pending {
                // Hijack the decode slot: the opcode on the data pins is
                // discarded, the fetch that read it is undone, and the trap
                // sequencer runs with the latched configuration
                self.int.pending = false;
                self.ir = 0x00;
                self.instr = Some(Instruction::BRK);
                self.addr_mode = None;
                self.addr_done = true;
                self.state.pc = self.state.pc.wrapping_sub(1);
                debug!("interrupt delivery through ${:04X}", self.int.vector);
            } else {
                self.decode();
            }
        }

        if !self.addr_done {
            if let Some(mode) = self.addr_mode {
                if self.addr_cycle(mode) {
                    self.addr_done = true;
                    self.ipc = 0;
                } else {
                    self.ipc = self.ipc.wrapping_add(1);
                    return;
                }
            }
        }

        if let Some(instr) = self.instr {
            if self.instr_cycle(instr) {
                self.instr = None;
                self.addr_mode = None;
                self.addr_done = false;
                self.ipc = 0;
                self.fetch();
            } else {
                self.ipc = self.ipc.wrapping_add(1);
            }
        }
    }

    /// Assert an opcode fetch on the pins: READ at PC, post-incrementing.
    /// This happens on the last cycle of every instruction, overlaid on the
    /// instruction's own final micro-step.
    fn fetch(&mut self) {
        self.pins.rw = READ;
        self.pins.addr = self.state.pc;
        self.state.pc = self.state.pc.wrapping_add(1);
    }

    /// Latch the byte on the data pins into IR and dispatch it.
    fn decode(&mut self) {
        self.ir = self.pins.data;
        match decode_instruction(self.ir) {
            Some((instr, addr_mode)) => {
                self.instr = Some(instr);
                self.addr_mode = addr_mode;
                self.addr_done = addr_mode.is_none();
            }
            None => {
                // Report and substitute a NOP so execution continues; an
                // idle re-decode of the same byte would spin forever
                self.illegal_opcodes = self.illegal_opcodes.wrapping_add(1);
                warn!(
                    "no decoding for opcode ${:02X} fetched at ${:04X}; substituting NOP",
                    self.ir,
                    self.state.pc.wrapping_sub(1)
                );
                self.instr = Some(Instruction::NOP);
                self.addr_mode = Some(AddressingMode::Impl);
                self.addr_done = false;
            }
        }
    }

    /// Run one micro-step of the addressing mode. Returns true on the cycle
    /// where the effective address has just been placed on the pins; the
    /// instruction's first operation cycle runs fused into that same cycle.
    fn addr_cycle(&mut self, mode: AddressingMode) -> bool {
        match mode {
            AddressingMode::Impl => {
                self.pins.rw = READ;
                self.pins.addr = self.state.pc;
                true
            }
            AddressingMode::Accum => {
                // Nothing to resolve; the operation targets A
                self.pins.rw = READ;
                true
            }
            AddressingMode::Imm => {
                self.fetch();
                true
            }
            AddressingMode::ZP => match self.ipc {
                // cycle 1 - pointer byte
                0 => {
                    self.fetch();
                    false
                }
                // cycle 2 - addressing (rw is set by the operation)
                _ => {
                    self.pins.addr = u16::from(self.pins.data);
                    true
                }
            },
            AddressingMode::ZPX | AddressingMode::ZPY => match self.ipc {
                // cycle 1 - pointer byte
                0 => {
                    self.fetch();
                    false
                }
                // cycle 2 - index the pointer, wrapping within page zero
                1 => {
                    let index = match mode {
                        AddressingMode::ZPX => self.state.x,
                        _ => self.state.y,
                    };
                    self.addr_buf = u16::from(self.pins.data.wrapping_add(index));
                    false
                }
                // cycle 3 - addressing
                _ => {
                    self.pins.addr = self.addr_buf;
                    true
                }
            },
            AddressingMode::Abs => match self.ipc {
                // cycle 1 - address low
                0 => {
                    self.fetch();
                    false
                }
                // cycle 2 - address high
                1 => {
                    self.addr_buf = u16::from(self.pins.data);
                    self.fetch();
                    false
                }
                // cycle 3 - addressing
                _ => {
                    self.pins.addr = bytes_to_addr!(self.addr_buf, self.pins.data);
                    true
                }
            },
            AddressingMode::AbsX | AddressingMode::AbsY => match self.ipc {
                // cycle 1 - address low
                0 => {
                    self.fetch();
                    false
                }
                // cycle 2 - low + index, address high
                1 => {
                    let index = match mode {
                        AddressingMode::AbsX => self.state.x,
                        _ => self.state.y,
                    };
                    self.addr_buf = u16::from(self.pins.data) + u16::from(index);
                    self.fetch();
                    false
                }
                // cycle 2.5 - carry into the high byte costs a cycle
                2 => {
                    let carried = self.addr_buf & 0x0100 != 0;
                    self.addr_buf = bytes_to_addr!(self.addr_buf & 0x00FF, self.pins.data);
                    if carried {
                        self.addr_buf = self.addr_buf.wrapping_add(0x0100);
                        false
                    } else {
                        self.pins.addr = self.addr_buf;
                        true
                    }
                }
                // cycle 3 - addressing
                _ => {
                    self.pins.addr = self.addr_buf;
                    true
                }
            },
            AddressingMode::IndX => match self.ipc {
                // cycle 1 - pointer byte
                0 => {
                    self.fetch();
                    false
                }
                // cycle 2 - pointer + X, wrapping within page zero
                1 => {
                    self.addr_buf = u16::from(self.pins.data.wrapping_add(self.state.x));
                    false
                }
                // cycle 3 - address low from the pointer
                2 => {
                    self.pins.rw = READ;
                    self.pins.addr = self.addr_buf;
                    false
                }
                // cycle 4 - address high from the pointer's zero-page
                // neighbour ($FF wraps to $00)
                3 => {
                    self.addr_buf = u16::from(self.pins.data);
                    self.pins.rw = READ;
                    self.pins.addr = u16::from((self.pins.addr as u8).wrapping_add(1));
                    false
                }
                // cycle 5 - addressing
                _ => {
                    self.pins.addr = bytes_to_addr!(self.addr_buf, self.pins.data);
                    true
                }
            },
            AddressingMode::IndY => match self.ipc {
                // cycle 1 - pointer byte
                0 => {
                    self.fetch();
                    false
                }
                // cycle 2 - address low from the pointer
                1 => {
                    self.pins.rw = READ;
                    self.pins.addr = u16::from(self.pins.data);
                    false
                }
                // cycle 3 - low + Y, address high from the pointer's
                // zero-page neighbour
                2 => {
                    self.addr_buf = u16::from(self.pins.data) + u16::from(self.state.y);
                    self.pins.rw = READ;
                    self.pins.addr = u16::from((self.pins.addr as u8).wrapping_add(1));
                    false
                }
                // cycle 3.5 - carry into the high byte costs a cycle
                3 => {
                    let carried = self.addr_buf & 0x0100 != 0;
                    self.addr_buf = bytes_to_addr!(self.addr_buf & 0x00FF, self.pins.data);
                    if carried {
                        self.addr_buf = self.addr_buf.wrapping_add(0x0100);
                        false
                    } else {
                        self.pins.addr = self.addr_buf;
                        true
                    }
                }
                // cycle 4 - addressing
                _ => {
                    self.pins.addr = self.addr_buf;
                    true
                }
            },
        }
    }

    /// Run one micro-step of the active instruction. Returns true when the
    /// instruction is done and the CPU is ready to fetch.
    fn instr_cycle(&mut self, instr: Instruction) -> bool {
        use Instruction::*;
        match instr {
            LDA | LDX | LDY => self.exec_load(instr),
            STA | STX | STY => self.exec_store(instr),
            TAX | TXA | TAY | TYA | TSX | TXS => self.exec_transfer(instr),
            ADC | SBC => self.exec_arith(instr),
            AND | ORA | EOR => self.exec_logic(instr),
            CMP | CPX | CPY => self.exec_compare(instr),
            BIT => self.exec_bit(),
            ASL | LSR | ROL | ROR => self.exec_shift(instr),
            INC | DEC => self.exec_crement_mem(instr),
            INX | DEX | INY | DEY => self.exec_crement_reg(instr),
            CLC | SEC | CLI | SEI | CLV | CLD | SED => self.exec_flag(instr),
            PHA | PHP => self.exec_push(instr),
            PLA | PLP => self.exec_pull(instr),
            BPL | BMI | BVC | BVS | BCC | BCS | BNE | BEQ => self.exec_branch(),
            JMP => self.exec_jmp(),
            JMPI => self.exec_jmp_indirect(),
            JSR => self.exec_jsr(),
            RTS => self.exec_rts(),
            RTI => self.exec_rti(),
            BRK => self.exec_brk(),
            NOP => self.exec_nop(),
        }
    }

    fn set_zn(&mut self, val: u8) {
        self.state.status.set(Status::ZERO, val == 0);
        self.state.status.set(Status::NEGATIVE, val & 0x80 != 0);
    }

    // LDA LDX LDY
    fn exec_load(&mut self, instr: Instruction) -> bool {
        match self.ipc {
            // cycle 1 - read value
            0 => {
                self.pins.rw = READ;
                false
            }
            // cycle 2 - store in the register, update flags, fetch
            _ => {
                let val = self.pins.data;
                match instr {
                    Instruction::LDA => self.state.acc = val,
                    Instruction::LDX => self.state.x = val,
                    _ => self.state.y = val,
                }
                self.set_zn(val);
                true
            }
        }
    }

    // STA STX STY
    fn exec_store(&mut self, instr: Instruction) -> bool {
        match self.ipc {
            // cycle 1 - drive the register onto the bus
            0 => {
                self.pins.rw = WRITE;
                self.pins.data = match instr {
                    Instruction::STA => self.state.acc,
                    Instruction::STX => self.state.x,
                    _ => self.state.y,
                };
                false
            }
            // cycle 2 - fetch
            _ => true,
        }
    }

    // TAX TXA TAY TYA TSX TXS
    fn exec_transfer(&mut self, instr: Instruction) -> bool {
        match self.ipc {
            // cycle 1 - the implicit dummy read
            0 => false,
            // cycle 2 - copy and fetch; TXS alone leaves the flags alone
            _ => {
                match instr {
                    Instruction::TAX => {
                        self.state.x = self.state.acc;
                        self.set_zn(self.state.x);
                    }
                    Instruction::TXA => {
                        self.state.acc = self.state.x;
                        self.set_zn(self.state.acc);
                    }
                    Instruction::TAY => {
                        self.state.y = self.state.acc;
                        self.set_zn(self.state.y);
                    }
                    Instruction::TYA => {
                        self.state.acc = self.state.y;
                        self.set_zn(self.state.acc);
                    }
                    Instruction::TSX => {
                        self.state.x = self.state.stack;
                        self.set_zn(self.state.x);
                    }
                    _ => self.state.stack = self.state.x,
                }
                true
            }
        }
    }

    // ADC SBC
    //
    // SBC is ADC of the complemented operand; carry is the canonical 9-bit
    // carry-out and overflow is set when the operands share a sign the
    // result doesn't.
    fn exec_arith(&mut self, instr: Instruction) -> bool {
        match self.ipc {
            // cycle 1 - operand arriving on the data pins
            0 => {
                self.pins.rw = READ;
                false
            }
            // cycle 2 - add, update flags, fetch
            _ => {
                if self.state.status.contains(Status::DECIMAL) {
                    self.decimal_faults = self.decimal_faults.wrapping_add(1);
                    warn!("ADC/SBC in decimal mode is unimplemented; result is undefined");
                }
                self.alu.a = self.state.acc;
                self.alu.b = match instr {
                    Instruction::SBC => !self.pins.data,
                    _ => self.pins.data,
                };
                let carry_in = u16::from(self.state.status.contains(Status::CARRY));
                let sum = u16::from(self.alu.a) + u16::from(self.alu.b) + carry_in;
                self.alu.c = (sum & 0xFF) as u8;
                let (a, b, c) = (self.alu.a, self.alu.b, self.alu.c);
                self.state.status.set(Status::CARRY, sum & 0x0100 != 0);
                self.state
                    .status
                    .set(Status::OVERFLOW, (a ^ c) & (b ^ c) & 0x80 != 0);
                self.state.acc = c;
                self.set_zn(c);
                true
            }
        }
    }

    // AND ORA EOR
    fn exec_logic(&mut self, instr: Instruction) -> bool {
        match self.ipc {
            0 => {
                self.pins.rw = READ;
                false
            }
            _ => {
                match instr {
                    Instruction::AND => self.state.acc &= self.pins.data,
                    Instruction::ORA => self.state.acc |= self.pins.data,
                    _ => self.state.acc ^= self.pins.data,
                }
                self.set_zn(self.state.acc);
                true
            }
        }
    }

    // CMP CPX CPY
    fn exec_compare(&mut self, instr: Instruction) -> bool {
        match self.ipc {
            0 => {
                self.pins.rw = READ;
                false
            }
            _ => {
                let reg = match instr {
                    Instruction::CMP => self.state.acc,
                    Instruction::CPX => self.state.x,
                    _ => self.state.y,
                };
                let data = self.pins.data;
                self.state.status.set(Status::CARRY, reg >= data);
                self.set_zn(reg.wrapping_sub(data));
                true
            }
        }
    }

    // BIT
    fn exec_bit(&mut self) -> bool {
        match self.ipc {
            0 => {
                self.pins.rw = READ;
                false
            }
            _ => {
                let data = self.pins.data;
                self.state.status.set(Status::NEGATIVE, data & 0x80 != 0);
                self.state.status.set(Status::OVERFLOW, data & 0x40 != 0);
                self.state
                    .status
                    .set(Status::ZERO, self.state.acc & data == 0);
                true
            }
        }
    }

    // ASL LSR ROL ROR
    //
    // On the accumulator this is a two-cycle register operation; on memory
    // it is a read-modify-write with the INC/DEC cycle shape.
    fn exec_shift(&mut self, instr: Instruction) -> bool {
        let on_acc = self.addr_mode == Some(AddressingMode::Accum);
        match self.ipc {
            // cycle 1 - operand arriving (or already in A)
            0 => {
                self.pins.rw = READ;
                false
            }
            // cycle 2 - shift, update flags; accumulator targets finish here
            1 => {
                let input = if on_acc { self.state.acc } else { self.pins.data };
                let carry_in = u8::from(self.state.status.contains(Status::CARRY));
                let (res, carry_out) = match instr {
                    Instruction::ASL => (input << 1, input & 0x80 != 0),
                    Instruction::LSR => (input >> 1, input & 0x01 != 0),
                    Instruction::ROL => (input << 1 | carry_in, input & 0x80 != 0),
                    _ => (input >> 1 | carry_in << 7, input & 0x01 != 0),
                };
                self.alu.b = input;
                self.alu.c = res;
                self.state.status.set(Status::CARRY, carry_out);
                self.set_zn(res);
                if on_acc {
                    self.state.acc = res;
                    true
                } else {
                    false
                }
            }
            // cycle 3 - write back
            2 => {
                self.pins.rw = WRITE;
                self.pins.data = self.alu.c;
                false
            }
            // cycle 4 - fetch
            _ => true,
        }
    }

    // INC DEC
    fn exec_crement_mem(&mut self, instr: Instruction) -> bool {
        match self.ipc {
            // cycle 1 - read value
            0 => {
                self.pins.rw = READ;
                false
            }
            // cycle 2 - adjust it
            1 => {
                self.alu.b = self.pins.data;
                self.alu.c = match instr {
                    Instruction::INC => self.alu.b.wrapping_add(1),
                    _ => self.alu.b.wrapping_sub(1),
                };
                self.set_zn(self.alu.c);
                false
            }
            // cycle 3 - write back
            2 => {
                self.pins.rw = WRITE;
                self.pins.data = self.alu.c;
                false
            }
            // cycle 4 - fetch
            _ => true,
        }
    }

    // INX DEX INY DEY
    fn exec_crement_reg(&mut self, instr: Instruction) -> bool {
        match self.ipc {
            0 => false,
            _ => {
                let val = match instr {
                    Instruction::INX => {
                        self.state.x = self.state.x.wrapping_add(1);
                        self.state.x
                    }
                    Instruction::DEX => {
                        self.state.x = self.state.x.wrapping_sub(1);
                        self.state.x
                    }
                    Instruction::INY => {
                        self.state.y = self.state.y.wrapping_add(1);
                        self.state.y
                    }
                    _ => {
                        self.state.y = self.state.y.wrapping_sub(1);
                        self.state.y
                    }
                };
                self.set_zn(val);
                true
            }
        }
    }

    // CLC SEC CLI SEI CLV CLD SED; there is no SEV
    fn exec_flag(&mut self, instr: Instruction) -> bool {
        match self.ipc {
            0 => false,
            _ => {
                match instr {
                    Instruction::CLC => self.state.status.remove(Status::CARRY),
                    Instruction::SEC => self.state.status.insert(Status::CARRY),
                    Instruction::CLI => self.state.status.remove(Status::IRQ_DISABLE),
                    Instruction::SEI => self.state.status.insert(Status::IRQ_DISABLE),
                    Instruction::CLV => self.state.status.remove(Status::OVERFLOW),
                    Instruction::CLD => self.state.status.remove(Status::DECIMAL),
                    _ => self.state.status.insert(Status::DECIMAL),
                }
                true
            }
        }
    }

    // PHA PHP
    fn exec_push(&mut self, instr: Instruction) -> bool {
        match self.ipc {
            // cycle 1 - the implicit dummy read
            0 => false,
            // cycle 2 - write to the top of the stack
            1 => {
                self.pins.rw = WRITE;
                self.pins.addr = bytes_to_addr!(self.state.stack, 0x01u8);
                self.pins.data = match instr {
                    // the pushed copy reads B and bit 5 as set
                    Instruction::PHP => self.state.status.bits() | 0x30,
                    _ => self.state.acc,
                };
                false
            }
            // cycle 3 - decrement the stack pointer and fetch
            _ => {
                self.state.stack = self.state.stack.wrapping_sub(1);
                true
            }
        }
    }

    // PLA PLP
    fn exec_pull(&mut self, instr: Instruction) -> bool {
        match self.ipc {
            // cycle 1 - the implicit dummy read
            0 => false,
            // cycle 2 - increment the stack pointer
            1 => {
                self.state.stack = self.state.stack.wrapping_add(1);
                false
            }
            // cycle 3 - read the top of the stack
            2 => {
                self.pins.rw = READ;
                self.pins.addr = bytes_to_addr!(self.state.stack, 0x01u8);
                false
            }
            // cycle 4 - store and fetch; PLP ignores B and keeps bit 5 high
            _ => {
                match instr {
                    Instruction::PLP => {
                        self.state.status = Status::from_bits_truncate((self.pins.data & 0xEF) | 0x20);
                    }
                    _ => {
                        self.state.acc = self.pins.data;
                        self.set_zn(self.state.acc);
                    }
                }
                true
            }
        }
    }

    // BPL BMI BVC BVS BCC BCS BNE BEQ
    fn exec_branch(&mut self) -> bool {
        // Flag selected by bits 7-6 of the opcode: N, V, C, Z
        const FLAGS: [Status; 4] = [
            Status::NEGATIVE,
            Status::OVERFLOW,
            Status::CARRY,
            Status::ZERO,
        ];

        match self.ipc {
            // cycle 1 - read the offset and test the flag; a failed test
            // skips straight to the exit arm
            0 => {
                self.fetch();
                let flag = FLAGS[usize::from(self.ir >> 6)];
                let wanted = self.ir & 0x20 != 0;
                if self.state.status.contains(flag) != wanted {
                    self.ipc = 2;
                }
                false
            }
            // cycle 2 - add the offset to the program counter
            1 => {
                self.addr_buf = self.state.pc;
                self.state.pc = self.state.pc.wrapping_add((self.pins.data as i8) as u16);
                false
            }
            // cycle 2.5 - a high-byte fixup costs one more cycle
            2 => (self.addr_buf ^ self.state.pc) & 0xFF00 == 0,
            // cycle 3 - fetch
            _ => true,
        }
    }

    // JMP absolute
    fn exec_jmp(&mut self) -> bool {
        match self.ipc {
            // cycle 1 - target low
            0 => {
                self.fetch();
                false
            }
            // cycle 2 - target high
            1 => {
                self.addr_buf = u16::from(self.pins.data);
                self.pins.rw = READ;
                self.pins.addr = self.state.pc;
                false
            }
            // cycle 3 - jump and fetch
            _ => {
                self.state.pc = bytes_to_addr!(self.addr_buf, self.pins.data);
                true
            }
        }
    }

    // JMP (indirect)
    fn exec_jmp_indirect(&mut self) -> bool {
        match self.ipc {
            // cycle 1 - pointer low
            0 => {
                self.fetch();
                false
            }
            // cycle 2 - pointer high
            1 => {
                self.addr_buf = u16::from(self.pins.data);
                self.fetch();
                false
            }
            // cycle 3 - target low through the pointer
            2 => {
                self.pins.rw = READ;
                self.pins.addr = bytes_to_addr!(self.addr_buf, self.pins.data);
                false
            }
            // cycle 4 - target high; the pointer's high byte never carries,
            // so a $xxFF pointer wraps to $xx00
            3 => {
                self.addr_buf = u16::from(self.pins.data);
                self.pins.rw = READ;
                if self.pins.addr & 0x00FF == 0x00FF {
                    self.pins.addr &= 0xFF00;
                } else {
                    self.pins.addr = self.pins.addr.wrapping_add(1);
                }
                false
            }
            // cycle 5 - jump and fetch
            _ => {
                self.state.pc = bytes_to_addr!(self.addr_buf, self.pins.data);
                true
            }
        }
    }

    // JSR
    fn exec_jsr(&mut self) -> bool {
        match self.ipc {
            // cycle 1 - target low
            0 => {
                self.fetch();
                false
            }
            // cycle 2 - target high; PC now points at the JSR's last byte
            1 => {
                self.addr_buf = u16::from(self.pins.data);
                self.pins.rw = READ;
                self.pins.addr = self.state.pc;
                false
            }
            // cycle 3 - push PC high
            2 => {
                self.addr_buf |= u16::from(self.pins.data) << 8;
                self.pins.rw = WRITE;
                self.pins.addr = bytes_to_addr!(self.state.stack, 0x01u8);
                self.pins.data = (self.state.pc >> 8) as u8;
                false
            }
            // cycle 4 - decrement the stack pointer
            3 => {
                self.state.stack = self.state.stack.wrapping_sub(1);
                false
            }
            // cycle 5 - push PC low
            4 => {
                self.pins.rw = WRITE;
                self.pins.addr = bytes_to_addr!(self.state.stack, 0x01u8);
                self.pins.data = (self.state.pc & 0xFF) as u8;
                false
            }
            // cycle 6 - decrement, jump and fetch
            _ => {
                self.state.stack = self.state.stack.wrapping_sub(1);
                self.state.pc = self.addr_buf;
                true
            }
        }
    }

    // RTS
    fn exec_rts(&mut self) -> bool {
        match self.ipc {
            // cycle 1 - the dummy read at PC
            0 => {
                self.pins.rw = READ;
                self.pins.addr = self.state.pc;
                false
            }
            // cycle 2 - increment the stack pointer
            1 => {
                self.state.stack = self.state.stack.wrapping_add(1);
                false
            }
            // cycle 3 - pull PC low
            2 => {
                self.pins.rw = READ;
                self.pins.addr = bytes_to_addr!(self.state.stack, 0x01u8);
                false
            }
            // cycle 4 - increment the stack pointer
            3 => {
                self.addr_buf = u16::from(self.pins.data);
                self.state.stack = self.state.stack.wrapping_add(1);
                false
            }
            // cycle 5 - pull PC high
            4 => {
                self.pins.rw = READ;
                self.pins.addr = bytes_to_addr!(self.state.stack, 0x01u8);
                false
            }
            // cycle 6 - resume past the JSR and fetch
            _ => {
                self.state.pc = bytes_to_addr!(self.addr_buf, self.pins.data).wrapping_add(1);
                true
            }
        }
    }

    // RTI
    fn exec_rti(&mut self) -> bool {
        match self.ipc {
            // cycle 1 - pull the status byte
            0 => {
                self.state.stack = self.state.stack.wrapping_add(1);
                self.pins.rw = READ;
                self.pins.addr = bytes_to_addr!(self.state.stack, 0x01u8);
                false
            }
            // cycle 2 - restore it (B is ignored, bit 5 stays high) and
            // increment the stack pointer
            1 => {
                self.state.status = Status::from_bits_truncate((self.pins.data & 0xEF) | 0x20);
                self.state.stack = self.state.stack.wrapping_add(1);
                false
            }
            // cycle 3 - pull PC low
            2 => {
                self.pins.rw = READ;
                self.pins.addr = bytes_to_addr!(self.state.stack, 0x01u8);
                false
            }
            // cycle 4 - increment the stack pointer
            3 => {
                self.addr_buf = u16::from(self.pins.data);
                self.state.stack = self.state.stack.wrapping_add(1);
                false
            }
            // cycle 5 - pull PC high
            4 => {
                self.pins.rw = READ;
                self.pins.addr = bytes_to_addr!(self.state.stack, 0x01u8);
                false
            }
            // cycle 6 - resume exactly where the trap hit, and fetch
            _ => {
                self.state.pc = bytes_to_addr!(self.addr_buf, self.pins.data);
                true
            }
        }
    }

    // BRK, and every hardware interrupt entry
    fn exec_brk(&mut self) -> bool {
        match self.ipc {
            // cycle 1 - a software BRK skips the signature byte; hardware
            // entries push the exact interrupted PC
            0 => {
                if self.int.push_brk {
                    self.state.pc = self.state.pc.wrapping_add(1);
                }
                false
            }
            // cycle 2 - push PC high (rw stays READ during a reset)
            1 => {
                self.pins.rw = if self.int.writes_suppressed { READ } else { WRITE };
                self.pins.addr = bytes_to_addr!(self.state.stack, 0x01u8);
                self.pins.data = (self.state.pc >> 8) as u8;
                self.state.stack = self.state.stack.wrapping_sub(1);
                false
            }
            // cycle 3 - push PC low
            2 => {
                self.pins.rw = if self.int.writes_suppressed { READ } else { WRITE };
                self.pins.addr = bytes_to_addr!(self.state.stack, 0x01u8);
                self.pins.data = (self.state.pc & 0xFF) as u8;
                self.state.stack = self.state.stack.wrapping_sub(1);
                false
            }
            // cycle 4 - push the status byte, with B reflecting the entry
            // kind
            3 => {
                self.pins.rw = if self.int.writes_suppressed { READ } else { WRITE };
                self.pins.addr = bytes_to_addr!(self.state.stack, 0x01u8);
                self.pins.data = if self.int.push_brk {
                    self.state.status.bits() | 0x10
                } else {
                    self.state.status.bits() & !0x10
                };
                self.state.stack = self.state.stack.wrapping_sub(1);
                false
            }
            // cycle 5 - vector low; the I flag changes once the status byte
            // is on the stack
            4 => {
                self.pins.addr = self.int.vector;
                self.state
                    .status
                    .set(Status::IRQ_DISABLE, self.int.sets_irq_disable);
                false
            }
            // cycle 6 - vector high
            5 => {
                self.addr_buf = u16::from(self.pins.data);
                self.pins.addr = self.pins.addr.wrapping_add(1);
                false
            }
            // cycle 7 - jump through the vector and fetch
            _ => {
                // A signal latched mid-sequence keeps its configuration;
                // otherwise return to the software-BRK defaults
                if !self.int.pending {
                    self.int = SOFTWARE_BRK_LATCH;
                }
                self.state.pc = bytes_to_addr!(self.addr_buf, self.pins.data);
                true
            }
        }
    }

    // NOP
    fn exec_nop(&mut self) -> bool {
        match self.ipc {
            0 => false,
            _ => true,
        }
    }
}
