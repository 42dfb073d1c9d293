use crate::keypad::Keypad;
use crate::memory::{Memory, PROGRAM_START};
use crate::screen::Screen;
use crate::stack::CallStack;
use crate::timer::Timers;

/// Index of the flag register.
pub const VF: usize = 0xF;

pub struct State {
    pub memory: Memory,
    pub registers: [u8; 16],
    pub index: u16,
    pub pc: u16,
    pub stack: CallStack,
    pub timers: Timers,
    pub screen: Screen,
    pub keypad: Keypad,
}

impl Default for State {
    fn default() -> Self {
        State {
            memory: Default::default(),
            registers: [0u8; 16],
            index: 0,
            pc: PROGRAM_START,
            stack: Default::default(),
            timers: Default::default(),
            screen: Default::default(),
            keypad: Default::default(),
        }
    }
}

impl State {
    pub fn set_flag(&mut self, flag: bool) {
        self.registers[VF] = flag as u8;
    }
}
