use crate::error::MachineError;
use crate::instruction::Opcode;

pub const MEMORY_SIZE: usize = 4096;
/// Where program images are loaded and execution starts.
pub const PROGRAM_START: u16 = 0x200;
pub const FONT_START: u16 = 0x050;
pub const GLYPH_HEIGHT: u16 = 5;

const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Address of the built-in sprite for the low nibble of `digit`.
pub fn glyph_address(digit: u8) -> u16 {
    FONT_START + u16::from(digit & 0xF) * GLYPH_HEIGHT
}

pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Default for Memory {
    fn default() -> Self {
        let mut bytes = [0u8; MEMORY_SIZE];
        let font_start = FONT_START as usize;
        bytes[font_start..font_start + FONT.len()].copy_from_slice(&FONT);
        Memory { bytes }
    }
}

impl Memory {
    /// Copies `image` verbatim to `PROGRAM_START`.
    pub fn load_program(&mut self, image: &[u8]) -> Result<(), MachineError> {
        let target = &mut self.bytes[PROGRAM_START as usize..];
        if image.len() > target.len() {
            return Err(MachineError::ProgramTooLarge {
                len: image.len(),
                capacity: target.len(),
            });
        }
        target[..image.len()].copy_from_slice(image);
        Ok(())
    }

    /// Reads the big-endian instruction word at `pc`.
    pub fn fetch(&self, pc: u16) -> Option<Opcode> {
        let index = pc as usize;
        match self.bytes.get(index..index + 2)? {
            [high, low] => Some(Opcode(u16::from(*high) << 8 | u16::from(*low))),
            _ => None,
        }
    }

    pub fn read(&self, address: usize) -> Option<u8> {
        self.bytes.get(address).copied()
    }

    pub fn slice(&self, start: usize, len: usize) -> Option<&[u8]> {
        self.bytes.get(start..start.checked_add(len)?)
    }

    pub fn slice_mut(&mut self, start: usize, len: usize) -> Option<&mut [u8]> {
        self.bytes.get_mut(start..start.checked_add(len)?)
    }

    /// Up to `rows` bytes starting at `start`, cut short at the end of memory.
    pub fn sprite(&self, start: usize, rows: usize) -> &[u8] {
        let start = start.min(MEMORY_SIZE);
        let end = start.saturating_add(rows).min(MEMORY_SIZE);
        &self.bytes[start..end]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
