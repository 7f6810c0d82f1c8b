//! A cycle-stepped emulator core for the MOS 6502.
//!
//! The interesting parts live in [`devices::cpu`]: a core that advances one
//! bus cycle per step and talks to the outside world through an
//! address/data/rw pin latch, exactly as the hardware does. [`devices::machine`]
//! wraps it in a small reference system (RAM low, ROM high) for tests and
//! the demo driver.

#[macro_use]
extern crate bitflags;

pub mod devices;
