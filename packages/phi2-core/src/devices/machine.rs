use super::bus::{system_memory_map, BusDevice, Motherboard};
use super::cpu::{self, Cpu, READ};
use super::mem::{Ram, Rom};

/// A struct representing a whole system built around the CPU: 32 K of RAM
/// in the lower half of the address space and 32 K of ROM in the upper.
///
/// The machine is the party on the other side of the pin latch. Every tick
/// it first honours whatever the core asserted on the previous cycle — a
/// READ loads the data pins from memory, a WRITE commits them — and then
/// steps the core one bus cycle. Interrupt signals raised between ticks are
/// first observed by the core at the start of the following cycle.
pub struct Machine {
    /// The CPU proper; pub so tests and debuggers can reach the register
    /// file and micro-state
    pub cpu: Cpu,
    /// The working RAM
    ram: Ram,
    /// The program ROM, vectors included
    rom: Rom,
    /// The last value on the main address bus
    last_bus_value: u8,
    /// A tracking var for the number of bus cycles executed
    cycles: u64,
}

// If an instruction takes more cycles than this, a sequencer is stuck
const MAX_INSTR_CYCLES: u32 = 16;

impl Motherboard for Machine {
    fn read(&mut self, addr: u16) -> u8 {
        let (device, addr) = system_memory_map::match_addr(addr);
        let res = match device {
            system_memory_map::Device::Ram => self.ram.read(addr, self.last_bus_value),
            system_memory_map::Device::Rom => self.rom.read(addr, self.last_bus_value),
        };
        self.last_bus_value = res;
        res
    }

    fn peek(&self, addr: u16) -> Option<u8> {
        let (device, addr) = system_memory_map::match_addr(addr);
        match device {
            system_memory_map::Device::Ram => self.ram.peek(addr),
            system_memory_map::Device::Rom => self.rom.peek(addr),
        }
    }

    fn write(&mut self, addr: u16, data: u8) {
        let (device, addr) = system_memory_map::match_addr(addr);
        match device {
            system_memory_map::Device::Ram => self.ram.write(addr, data),
            system_memory_map::Device::Rom => self.rom.write(addr, data),
        };
        self.last_bus_value = data;
    }
}

impl Machine {
    /// Build a machine around a ROM image mapped at $8000. The CPU comes up
    /// in its reset-prelude state; call [`Machine::reset`] before running.
    pub fn new(rom_image: &[u8]) -> Machine {
        Machine {
            cpu: Cpu::new(),
            ram: Ram::new(0x8000),
            rom: Rom::new_from_buf(0x8000, rom_image),
            last_bus_value: 0x00,
            cycles: 0,
        }
    }

    /// Advance the system one bus cycle: service the pin latch, then step
    /// the core.
    pub fn tick(&mut self) {
        let addr = self.cpu.pins.addr;
        if self.cpu.pins.rw == READ {
            self.cpu.pins.data = self.read(addr);
        } else {
            let data = self.cpu.pins.data;
            self.write(addr, data);
        }
        self.cpu.step();
        self.cycles += 1;
    }

    /// Run the CPU to the next instruction boundary and return the number
    /// of cycles it took.
    pub fn run_instruction(&mut self) -> u32 {
        let mut cycles = 0;
        loop {
            self.tick();
            cycles += 1;
            if self.cpu.instr.is_none() {
                return cycles;
            }
            if cycles > MAX_INSTR_CYCLES {
                panic!("Simulation error: instruction still live after {} cycles", cycles);
            }
        }
    }

    /// Trigger a hardware reset
    ///
    /// This only latches the signal; the seven-cycle reset sequence runs on
    /// the following ticks, and memory is left alone just like the physical
    /// reset button would leave it.
    pub fn reset(&mut self) {
        self.cpu.raise_reset();
    }

    /// Latch a nonmaskable interrupt.
    pub fn nmi(&mut self) {
        self.cpu.raise_nmi();
    }

    /// Latch an interrupt request (ignored while I is set).
    pub fn irq(&mut self) {
        self.cpu.raise_irq();
    }

    /// Total bus cycles ticked so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// One-line snapshot of the register file and pins, for trace logs.
    pub fn trace(&self) -> String {
        cpu::trace_line(&self.cpu, self.cycles)
    }
}
