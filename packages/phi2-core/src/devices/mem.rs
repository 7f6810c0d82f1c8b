//! Module for memory devices, such as RAM and ROM

use log::debug;

use super::bus::BusDevice;

pub struct Ram {
    buf: Vec<u8>,
}

impl BusDevice for Ram {
    fn peek(&self, addr: u16) -> Option<u8> {
        self.buf.get(usize::from(addr)).copied()
    }

    fn write(&mut self, addr: u16, value: u8) {
        if let Some(slot) = self.buf.get_mut(usize::from(addr)) {
            *slot = value;
        }
    }
}

impl Ram {
    pub fn new(size: usize) -> Ram {
        Ram {
            buf: vec![0u8; size],
        }
    }
}

pub struct Rom {
    buf: Vec<u8>,
}

impl BusDevice for Rom {
    fn peek(&self, addr: u16) -> Option<u8> {
        self.buf.get(usize::from(addr)).copied()
    }

    fn write(&mut self, addr: u16, _value: u8) {
        debug!("write to ROM at local ${:04X} ignored", addr);
    }
}

impl Rom {
    /// Build a ROM of the given size from an image, zero-filling any
    /// remainder. Images longer than the size are truncated.
    pub fn new_from_buf(size: usize, image: &[u8]) -> Rom {
        let mut buf = vec![0u8; size];
        let n = image.len().min(size);
        buf[..n].copy_from_slice(&image[..n]);
        Rom { buf }
    }
}
