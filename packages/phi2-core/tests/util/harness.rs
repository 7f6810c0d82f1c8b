use phi2_core::devices::bus::Motherboard;
use phi2_core::devices::machine::Machine;

/// Build a machine whose reset vector points at `origin`, place `code`
/// there, apply any extra byte patches, and run the seven-cycle reset
/// sequence so the next `run_instruction` executes the first opcode.
///
/// Code and patches land in the ROM image when they sit at $8000 or above,
/// and are written through the bus when they sit in RAM below it.
pub fn boot_with(origin: u16, code: &[u8], patches: &[(u16, u8)]) -> Machine {
    let mut image = vec![0u8; 0x8000];
    image[0x7FFC] = (origin & 0xFF) as u8;
    image[0x7FFD] = (origin >> 8) as u8;
    if origin >= 0x8000 {
        let base = usize::from(origin - 0x8000);
        image[base..base + code.len()].copy_from_slice(code);
    }
    for (addr, byte) in patches {
        if *addr >= 0x8000 {
            image[usize::from(addr - 0x8000)] = *byte;
        }
    }

    let mut machine = Machine::new(&image);
    if origin < 0x8000 {
        for (i, byte) in code.iter().enumerate() {
            machine.write(origin + i as u16, *byte);
        }
    }
    for (addr, byte) in patches {
        if *addr < 0x8000 {
            machine.write(*addr, *byte);
        }
    }

    machine.reset();
    machine.run_instruction();
    machine
}

pub fn boot_with_code(origin: u16, code: &[u8]) -> Machine {
    boot_with(origin, code, &[])
}
