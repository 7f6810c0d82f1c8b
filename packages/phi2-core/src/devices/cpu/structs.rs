/// Pin read/write line level when the processor is reading from the bus.
pub const READ: bool = true;

/// Pin read/write line level when the processor is driving the bus.
pub const WRITE: bool = false;

/// The external pin latch of the processor.
///
/// This is the entire boundary between the core and the enclosing system.
/// Every cycle the environment looks at `rw`: on READ it must place the byte
/// at `addr` on `data` before the next core step, on WRITE it must commit
/// `data` to `addr`. The core never touches memory any other way.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct Pins {
    /// 16-bit address output, driven from the internal address buffers
    pub addr: u16,

    /// 8-bit data bus, input on READ cycles and output on WRITE cycles
    pub data: u8,

    /// Read/write line; true is READ, false is WRITE
    pub rw: bool,
}

pub const POWERON_PINS: Pins = Pins {
    addr: 0x0000,
    data: 0x00,
    rw: READ,
};

/// A struct holding the architectural registers of a 6502 CPU.
///
/// This is everything a program can observe through instructions; the
/// micro-sequencer bookkeeping lives on the `Cpu` itself.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct CpuState {
    /// The Accumulator register
    pub acc: u8,

    /// X index register
    pub x: u8,

    /// Y index register
    pub y: u8,

    /// The stack pointer
    ///
    /// # Note
    ///
    /// This register is a pointer to a location in memory on the first page
    /// ($01XX) of memory. The 6502 uses a bottom-up stack, so the 'first'
    /// location on the stack is `$01FF` and the 'last' is `$0100`.
    ///
    /// Overflow and underflow are not errors; the pointer wraps modulo 256
    /// exactly as the silicon does.
    pub stack: u8,

    /// The program counter
    ///
    /// # Note
    ///
    /// An opcode fetch places this on the address pins and then
    /// post-increments, so between instructions it refers to the byte after
    /// the opcode currently on the data pins.
    pub pc: u16,

    /// The program status register.
    pub status: Status,
}

bitflags! {
    pub struct Status: u8 {
        const CARRY = 0x01;
        const ZERO = 0x02;
        const IRQ_DISABLE = 0x04;
        const DECIMAL = 0x08;
        const BREAK = 0x10;
        const UNUSED = 0x20;
        const OVERFLOW = 0x40;
        const NEGATIVE = 0x80;
    }
}

/// ALU staging registers.
///
/// `a` and `b` are the operand latches, `c` is the result. These survive
/// between cycles, which is what lets read-modify-write instructions compute
/// on one cycle and drive the bus on the next.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Default)]
pub struct Alu {
    pub a: u8,
    pub b: u8,
    pub c: u8,
}

// The addressing mode for the CPU
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum AddressingMode {
    /// Zero-Page
    ZP,
    /// Zero-Page Indexed, X register
    ZPX,
    /// Zero-Page Indexed, Y register
    ZPY,
    /// Absolute Indexed, plus X register
    AbsX,
    /// Absolute Indexed, plus Y register
    AbsY,
    /// Indexed Indirect (d, x)
    IndX,
    /// Indirect Indexed (d), y
    IndY,
    /// Implicit indexing (assert the program counter, resolve nothing)
    Impl,
    /// Use the Accumulator
    Accum,
    /// Don't fetch anything and use the operand as data
    Imm,
    /// The 16 address is included in the operand
    Abs,
}

/// The CPU opcode mnemonic
///
/// *depends on BCD flag, not currently supported
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum Instruction {
    /// ADd with Carry*
    ADC,
    /// bitwise AND w/ acc
    AND,
    /// Arithmetic Shift Left
    ASL,
    /// test BITs
    BIT,

    //region Branch instructions
    /// Branch on PLus
    BPL,
    /// Branch on MInus
    BMI,
    /// Branch on oVerflow Clear
    BVC,
    /// Branch on oVerflow Set
    BVS,
    /// Branch on Carry Clear
    BCC,
    /// Branch on Carry Set
    BCS,
    /// Branch on Not Equal
    BNE,
    /// Branch on EQual
    BEQ,
    //endregion
    /// BReaK
    ///
    /// Also the entry point for hardware interrupts: the interrupt
    /// controller injects this micro-program with the latched vector
    /// configuration instead of decoding it off the data pins.
    BRK,
    /// CoMPare acc
    CMP,
    /// ComPare X
    CPX,
    /// ComPare Y
    CPY,
    /// DECrement
    DEC,
    /// bitwise Exclusive OR
    EOR,

    //region Flag instructions
    /// CLear Carry
    CLC,
    /// SEt Carry
    SEC,
    /// CLear Interrupt mask
    CLI,
    /// SEt Interrupt mask
    SEI,
    /// CLear oVerflow
    CLV,
    /// CLear Decimal
    CLD,
    /// SEt Decimal
    SED,
    //endregion
    /// INCrement memory
    INC,
    /// JuMP, absolute
    JMP,
    /// JuMP through an indirect vector
    ///
    /// # Note on a major CPU bug
    ///
    /// The 6502 has a serious bug with this instruction: if the vector
    /// straddles a page boundary, the high byte is fetched from the start of
    /// the *same* page rather than the next one. The micro-program here
    /// reproduces that bug faithfully.
    JMPI,
    /// Jump to SubRoutine
    JSR,
    /// LoaD Acc
    LDA,
    /// LoaD X
    LDX,
    /// LoaD Y
    LDY,
    /// Logical Shift Right
    LSR,
    /// No OPeration
    NOP,
    /// bitwise OR with Acc
    ORA,

    //region Register Instructions
    /// Transfer A to X
    TAX,
    /// Transfer X to A
    TXA,
    /// DEcrement X
    DEX,
    /// INcrement X
    INX,
    /// Transfer A to Y
    TAY,
    /// Transfer Y to A
    TYA,
    /// DEcrement Y
    DEY,
    /// INcrement Y
    INY,
    //endregion

    //region Rotation instructions
    // Note: Rotation actually includes the Carry bit in rotation operations.
    // So if you rotate 0b1100_0000 left, and C is not asserted, you will get
    // 0b1000_0000 instead of 0b1000_0001, and Carry will be asserted.
    /// ROtate Left
    ROL,
    /// ROtate Right
    ROR,
    //endregion

    //region Returns
    /// ReTurn from Interrupt
    RTI,
    /// ReTurn from Subroutine
    RTS,
    //endregion
    /// SuBtract with Carry*
    SBC,

    //region Store instructions
    /// STore Acc
    STA,
    /// STore X
    STX,
    /// STore Y
    STY,
    //endregion

    //region Stack instructions
    /// Transfer X to Stack
    TXS,
    /// Transfer Stack to X
    TSX,
    /// PusH Acc
    PHA,
    /// PuLl Acc
    PLA,
    /// PusH Processor status
    PHP,
    /// PuLl Processor status
    PLP,
    //endregion
}

/// Latched configuration for the next pass through the BRK micro-program.
///
/// RES, NMI and IRQ all funnel into the same 7-cycle trap sequence; the only
/// differences between them (and a software BRK) are captured here. After
/// the sequence completes the latch is restored to `SOFTWARE_BRK_LATCH` so
/// that a plain BRK opcode behaves correctly.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct InterruptLatch {
    /// A hardware signal is waiting for the next instruction boundary
    pub pending: bool,

    /// Address of the two-byte handler vector
    pub vector: u16,

    /// Suppress the three stack writes (RES only); the stack pointer still
    /// decrements but the rw pin stays at READ
    pub writes_suppressed: bool,

    /// Push the status byte with B set (software BRK only)
    pub push_brk: bool,

    /// Set IRQ_DISABLE once the status byte has been pushed
    pub sets_irq_disable: bool,
}

pub const SOFTWARE_BRK_LATCH: InterruptLatch = InterruptLatch {
    pending: false,
    vector: 0xFFFE,
    writes_suppressed: false,
    push_brk: true,
    sets_irq_disable: true,
};

/// The documented power-on register file: a reset-prelude state. A RES
/// signal is required before useful execution.
pub const POWERON_CPU_STATE: CpuState = CpuState {
    acc: 0,
    x: 0,
    y: 0,
    stack: 0x02,
    pc: 0,
    //                                NV-BDIZC
    status: Status::from_bits_truncate(0b0011_0110),
};
