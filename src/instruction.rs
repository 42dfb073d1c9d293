use std::fmt;

/// A raw 16-bit instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode(pub u16);

impl Opcode {
    pub fn op(self) -> u8 {
        (self.0 >> 12) as u8
    }

    pub fn x(self) -> usize {
        (self.0 >> 8 & 0xF) as usize
    }

    pub fn y(self) -> usize {
        (self.0 >> 4 & 0xF) as usize
    }

    pub fn n(self) -> u8 {
        (self.0 & 0xF) as u8
    }

    pub fn nn(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    pub fn nnn(self) -> u16 {
        self.0 & 0xFFF
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

/// A decoded instruction. `x` and `y` are register indices, always `0..16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1NNN
    Jump(u16),
    /// 2NNN
    Call(u16),
    /// 3XNN
    SkipIfEqual { x: usize, value: u8 },
    /// 4XNN
    SkipIfNotEqual { x: usize, value: u8 },
    /// 5XY0
    SkipIfRegsEqual { x: usize, y: usize },
    /// 6XNN
    SetRegister { x: usize, value: u8 },
    /// 7XNN
    AddToRegister { x: usize, value: u8 },
    /// 8XY0
    Copy { x: usize, y: usize },
    /// 8XY1
    Or { x: usize, y: usize },
    /// 8XY2
    And { x: usize, y: usize },
    /// 8XY3
    Xor { x: usize, y: usize },
    /// 8XY4
    Add { x: usize, y: usize },
    /// 8XY5
    SubFromX { x: usize, y: usize },
    /// 8XY6
    ShiftRight { x: usize, y: usize },
    /// 8XY7
    SubFromY { x: usize, y: usize },
    /// 8XYE
    ShiftLeft { x: usize, y: usize },
    /// 9XY0
    SkipIfRegsNotEqual { x: usize, y: usize },
    /// ANNN
    SetIndex(u16),
    /// BNNN
    JumpOffset(u16),
    /// CXNN
    Random { x: usize, mask: u8 },
    /// DXYN
    Draw { x: usize, y: usize, rows: u8 },
    /// EX9E
    SkipIfPressed { x: usize },
    /// EXA1
    SkipIfNotPressed { x: usize },
    /// FX07
    ReadDelay { x: usize },
    /// FX0A
    WaitForKey { x: usize },
    /// FX15
    SetDelay { x: usize },
    /// FX18
    SetSound { x: usize },
    /// FX1E
    AddToIndex { x: usize },
    /// FX29
    FontAddress { x: usize },
    /// FX33
    StoreDigits { x: usize },
    /// FX55
    StoreRegisters { x: usize },
    /// FX65
    LoadRegisters { x: usize },
    Unknown(Opcode),
}

impl Instruction {
    pub fn decode(opcode: Opcode) -> Self {
        use Instruction::*;

        let x = opcode.x();
        let y = opcode.y();
        match opcode.op() {
            0x0 => match opcode.nnn() {
                0x0E0 => ClearScreen,
                0x0EE => Return,
                _ => Unknown(opcode),
            },
            0x1 => Jump(opcode.nnn()),
            0x2 => Call(opcode.nnn()),
            0x3 => SkipIfEqual { x, value: opcode.nn() },
            0x4 => SkipIfNotEqual { x, value: opcode.nn() },
            0x5 => SkipIfRegsEqual { x, y },
            0x6 => SetRegister { x, value: opcode.nn() },
            0x7 => AddToRegister { x, value: opcode.nn() },
            0x8 => match opcode.n() {
                0x0 => Copy { x, y },
                0x1 => Or { x, y },
                0x2 => And { x, y },
                0x3 => Xor { x, y },
                0x4 => Add { x, y },
                0x5 => SubFromX { x, y },
                0x6 => ShiftRight { x, y },
                0x7 => SubFromY { x, y },
                0xE => ShiftLeft { x, y },
                _ => Unknown(opcode),
            },
            0x9 => SkipIfRegsNotEqual { x, y },
            0xA => SetIndex(opcode.nnn()),
            0xB => JumpOffset(opcode.nnn()),
            0xC => Random { x, mask: opcode.nn() },
            0xD => Draw { x, y, rows: opcode.n() },
            0xE => match opcode.nn() {
                0x9E => SkipIfPressed { x },
                0xA1 => SkipIfNotPressed { x },
                _ => Unknown(opcode),
            },
            0xF => match opcode.nn() {
                0x07 => ReadDelay { x },
                0x0A => WaitForKey { x },
                0x15 => SetDelay { x },
                0x18 => SetSound { x },
                0x1E => AddToIndex { x },
                0x29 => FontAddress { x },
                0x33 => StoreDigits { x },
                0x55 => StoreRegisters { x },
                0x65 => LoadRegisters { x },
                _ => Unknown(opcode),
            },
            _ => Unknown(opcode),
        }
    }
}

/// Trace mnemonics.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            ClearScreen => write!(f, "CLEAR"),
            Return => write!(f, "RETSUB"),
            Jump(a) => write!(f, "JUMP {:03X}", a),
            Call(a) => write!(f, "JUMPSUB {:03X}", a),
            SkipIfEqual { x, value } => write!(f, "SKIPIFREG V{:X} {:02X}", x, value),
            SkipIfNotEqual { x, value } => write!(f, "SKIPIFNOTREG V{:X} {:02X}", x, value),
            SkipIfRegsEqual { x, y } => write!(f, "SKIPIFREGS V{:X} V{:X}", x, y),
            SetRegister { x, value } => write!(f, "SETREG V{:X} {:02X}", x, value),
            AddToRegister { x, value } => write!(f, "ADDREG V{:X} {:02X}", x, value),
            Copy { x, y } => write!(f, "SETREGS V{:X} V{:X}", x, y),
            Or { x, y } => write!(f, "ORREGS V{:X} V{:X}", x, y),
            And { x, y } => write!(f, "ANDREGS V{:X} V{:X}", x, y),
            Xor { x, y } => write!(f, "XORREGS V{:X} V{:X}", x, y),
            Add { x, y } => write!(f, "ADDREGS V{:X} V{:X}", x, y),
            SubFromX { x, y } => write!(f, "SUBFROMX V{:X} V{:X}", x, y),
            ShiftRight { x, y } => write!(f, "SHIFTRIGHT V{:X} V{:X}", x, y),
            SubFromY { x, y } => write!(f, "SUBFROMY V{:X} V{:X}", x, y),
            ShiftLeft { x, y } => write!(f, "SHIFTLEFT V{:X} V{:X}", x, y),
            SkipIfRegsNotEqual { x, y } => write!(f, "SKIPIFNOTREGS V{:X} V{:X}", x, y),
            SetIndex(a) => write!(f, "SETI {:03X}", a),
            JumpOffset(a) => write!(f, "JUMPOFFSET {:03X}", a),
            Random { x, mask } => write!(f, "RANDAND V{:X} {:02X}", x, mask),
            Draw { x, y, rows } => write!(f, "DRAW V{:X} V{:X} {}", x, y, rows),
            SkipIfPressed { x } => write!(f, "SKIPIFPRESSED V{:X}", x),
            SkipIfNotPressed { x } => write!(f, "SKIPIFNOTPRESSED V{:X}", x),
            ReadDelay { x } => write!(f, "READDELAY V{:X}", x),
            WaitForKey { x } => write!(f, "WAITFORKEY V{:X}", x),
            SetDelay { x } => write!(f, "SETDELAY V{:X}", x),
            SetSound { x } => write!(f, "SETSOUNDTIMER V{:X}", x),
            AddToIndex { x } => write!(f, "ADDI V{:X}", x),
            FontAddress { x } => write!(f, "GETFONT V{:X}", x),
            StoreDigits { x } => write!(f, "GETDIGITS V{:X}", x),
            StoreRegisters { x } => write!(f, "STOREREGS V{:X}", x),
            LoadRegisters { x } => write!(f, "LOADREGS V{:X}", x),
            Unknown(opcode) => write!(f, "UNKNOWN {}", opcode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Instruction::*;
    use super::*;

    #[test]
    fn extracts_fields() {
        let opcode = Opcode(0xD7B3);
        assert_eq!(opcode.op(), 0xD);
        assert_eq!(opcode.x(), 0x7);
        assert_eq!(opcode.y(), 0xB);
        assert_eq!(opcode.n(), 0x3);
        assert_eq!(opcode.nn(), 0xB3);
        assert_eq!(opcode.nnn(), 0x7B3);
    }

    #[test]
    fn opcode_translation() {
        let cases = [
            (0x00E0, ClearScreen),
            (0x00EE, Return),
            (0x1234, Jump(0x234)),
            (0x2456, Call(0x456)),
            (0x342A, SkipIfEqual { x: 4, value: 0x2A }),
            (0x4A75, SkipIfNotEqual { x: 0xA, value: 0x75 }),
            (0x5AE0, SkipIfRegsEqual { x: 0xA, y: 0xE }),
            (0x63F5, SetRegister { x: 3, value: 0xF5 }),
            (0x7B12, AddToRegister { x: 0xB, value: 0x12 }),
            (0x8590, Copy { x: 5, y: 9 }),
            (0x8101, Or { x: 1, y: 0 }),
            (0x8642, And { x: 6, y: 4 }),
            (0x87F3, Xor { x: 7, y: 0xF }),
            (0x8264, Add { x: 2, y: 6 }),
            (0x8C45, SubFromX { x: 0xC, y: 4 }),
            (0x8136, ShiftRight { x: 1, y: 3 }),
            (0x86D7, SubFromY { x: 6, y: 0xD }),
            (0x8E0E, ShiftLeft { x: 0xE, y: 0 }),
            (0x9990, SkipIfRegsNotEqual { x: 9, y: 9 }),
            (0xA568, SetIndex(0x568)),
            (0xBABC, JumpOffset(0xABC)),
            (0xC5AF, Random { x: 5, mask: 0xAF }),
            (0xD7B0, Draw { x: 7, y: 0xB, rows: 0 }),
            (0xE49E, SkipIfPressed { x: 4 }),
            (0xECA1, SkipIfNotPressed { x: 0xC }),
            (0xF907, ReadDelay { x: 9 }),
            (0xFD0A, WaitForKey { x: 0xD }),
            (0xF315, SetDelay { x: 3 }),
            (0xF718, SetSound { x: 7 }),
            (0xF91E, AddToIndex { x: 9 }),
            (0xFF29, FontAddress { x: 0xF }),
            (0xF533, StoreDigits { x: 5 }),
            (0xF655, StoreRegisters { x: 6 }),
            (0xF865, LoadRegisters { x: 8 }),
        ];

        for (word, instruction) in cases {
            assert_eq!(Instruction::decode(Opcode(word)), instruction, "{:04X}", word);
        }
    }

    #[test]
    fn unrecognized_words_decode_to_unknown() {
        for word in [0x0000, 0x0123, 0x00E1, 0x8008, 0x800F, 0xE000, 0xF000, 0xF0FF] {
            assert_eq!(Instruction::decode(Opcode(word)), Unknown(Opcode(word)));
        }
    }

    #[test]
    fn every_word_decodes() {
        let known = (0..=u16::MAX)
            .map(|word| Instruction::decode(Opcode(word)))
            .filter(|instruction| !matches!(instruction, Unknown(_)))
            .count();
        assert!(known > 0xB000);
    }

    #[test]
    fn mnemonics() {
        assert_eq!(Instruction::decode(Opcode(0xD124)).to_string(), "DRAW V1 V2 4");
        assert_eq!(Instruction::decode(Opcode(0x120C)).to_string(), "JUMP 20C");
        assert_eq!(Instruction::decode(Opcode(0x0000)).to_string(), "UNKNOWN 0000");
    }
}
