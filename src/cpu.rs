use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::Rng;

use crate::config::{Quirks, ShiftSource};
use crate::error::MachineError;
use crate::instruction::{Instruction, Opcode};
use crate::memory;
use crate::state::State;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    /// Suspended on FX0A until a key goes down; the key lands in `V<register>`.
    AwaitingKey { register: usize },
}

/// Fetches, decodes and executes instructions against a `State`.
pub struct Cpu {
    state: State,
    quirks: Quirks,
    rng: StdRng,
    status: Status,
}

impl Cpu {
    pub fn new(quirks: Quirks, rng: StdRng) -> Self {
        Cpu {
            state: Default::default(),
            quirks,
            rng,
            status: Status::Running,
        }
    }

    pub fn load_program(&mut self, image: &[u8]) -> Result<(), MachineError> {
        self.state.memory.load_program(image)
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Runs one fetch-decode-execute cycle. Does nothing while awaiting a key.
    pub fn step(&mut self) -> Result<(), MachineError> {
        if self.status != Status::Running {
            return Ok(());
        }

        let pc = self.state.pc;
        let opcode = self
            .state
            .memory
            .fetch(pc)
            .ok_or(MachineError::PcOutOfBounds { pc })?;
        self.state.pc = pc + 2;

        let instruction = Instruction::decode(opcode);
        trace!("{:03X}: {} {}", pc, opcode, instruction);
        self.execute(pc, opcode, instruction)
    }

    /// One 60 Hz timer tick.
    pub fn tick_timers(&mut self) {
        self.state.timers.tick();
    }

    pub fn key_down(&mut self, key: u8) -> Result<(), MachineError> {
        let delivered = self.state.keypad.press(key)?;
        if let (Some(key), Status::AwaitingKey { register }) = (delivered, self.status) {
            self.state.registers[register] = key;
            self.status = Status::Running;
        }
        Ok(())
    }

    pub fn key_up(&mut self, key: u8) -> Result<(), MachineError> {
        self.state.keypad.release(key)?;
        Ok(())
    }

    fn execute(
        &mut self,
        pc: u16,
        opcode: Opcode,
        instruction: Instruction,
    ) -> Result<(), MachineError> {
        use Instruction::*;

        let state = &mut self.state;
        let v = &mut state.registers;
        match instruction {
            ClearScreen => state.screen.clear_screen(),
            Return => {
                state.pc = state
                    .stack
                    .pop()
                    .map_err(|source| MachineError::Stack { pc, source })?;
            }
            Jump(address) => state.pc = address,
            Call(address) => {
                state
                    .stack
                    .push(state.pc)
                    .map_err(|source| MachineError::Stack { pc, source })?;
                state.pc = address;
            }
            SkipIfEqual { x, value } => self.skip_if(self.state.registers[x] == value),
            SkipIfNotEqual { x, value } => self.skip_if(self.state.registers[x] != value),
            SkipIfRegsEqual { x, y } => {
                self.skip_if(self.state.registers[x] == self.state.registers[y])
            }
            SkipIfRegsNotEqual { x, y } => {
                self.skip_if(self.state.registers[x] != self.state.registers[y])
            }
            SetRegister { x, value } => v[x] = value,
            AddToRegister { x, value } => v[x] = v[x].wrapping_add(value),
            Copy { x, y } => v[x] = v[y],
            Or { x, y } => v[x] |= v[y],
            And { x, y } => v[x] &= v[y],
            Xor { x, y } => v[x] ^= v[y],
            Add { x, y } => {
                let (sum, carry) = v[x].overflowing_add(v[y]);
                v[x] = sum;
                state.set_flag(carry);
            }
            SubFromX { x, y } => {
                let (difference, borrow) = v[x].overflowing_sub(v[y]);
                v[x] = difference;
                state.set_flag(!borrow);
            }
            SubFromY { x, y } => {
                let (difference, borrow) = v[y].overflowing_sub(v[x]);
                v[x] = difference;
                state.set_flag(!borrow);
            }
            ShiftRight { x, y } => {
                let source = v[self.quirks.shift_source.pick(x, y)];
                v[x] = source >> 1;
                state.set_flag(source & 1 == 1);
            }
            ShiftLeft { x, y } => {
                let source = v[self.quirks.shift_source.pick(x, y)];
                v[x] = source << 1;
                state.set_flag(source >> 7 == 1);
            }
            SetIndex(address) => state.index = address,
            JumpOffset(address) => {
                let target = address + u16::from(v[0]);
                if target as usize >= memory::MEMORY_SIZE {
                    return Err(MachineError::JumpOutOfBounds { pc, target });
                }
                state.pc = target;
            }
            Random { x, mask } => v[x] = self.rng.gen::<u8>() & mask,
            Draw { x, y, rows } => {
                let sprite = state.memory.sprite(state.index as usize, rows as usize);
                let collided =
                    state
                        .screen
                        .render_sprite(v[x] as usize, v[y] as usize, sprite);
                state.set_flag(collided);
            }
            SkipIfPressed { x } => {
                let pressed = self.state.keypad.is_pressed(self.state.registers[x]);
                self.skip_if(pressed)
            }
            SkipIfNotPressed { x } => {
                let pressed = self.state.keypad.is_pressed(self.state.registers[x]);
                self.skip_if(!pressed)
            }
            ReadDelay { x } => v[x] = state.timers.delay,
            WaitForKey { x } => {
                debug!("waiting for key press into V{:X}", x);
                state.keypad.subscribe();
                self.status = Status::AwaitingKey { register: x };
            }
            SetDelay { x } => state.timers.delay = v[x],
            SetSound { x } => state.timers.sound = v[x],
            AddToIndex { x } => {
                let sum = u32::from(state.index) + u32::from(v[x]);
                state.index = sum as u16;
                state.set_flag(sum > 0xFFF);
            }
            FontAddress { x } => state.index = memory::glyph_address(v[x]),
            StoreDigits { x } => {
                let value = v[x];
                let start = state.index as usize;
                let digits = state
                    .memory
                    .slice_mut(start, 3)
                    .ok_or(MachineError::MemoryOutOfBounds {
                        pc,
                        opcode,
                        start,
                        len: 3,
                    })?;
                digits.copy_from_slice(&[value / 100, value / 10 % 10, value % 10]);
            }
            StoreRegisters { x } => {
                let len = x + 1;
                let start = state.index as usize;
                let target = state
                    .memory
                    .slice_mut(start, len)
                    .ok_or(MachineError::MemoryOutOfBounds {
                        pc,
                        opcode,
                        start,
                        len,
                    })?;
                target.copy_from_slice(&v[..len]);
                if self.quirks.increment_index {
                    state.index = state.index.wrapping_add(len as u16);
                }
            }
            LoadRegisters { x } => {
                let len = x + 1;
                let start = state.index as usize;
                let source = state
                    .memory
                    .slice(start, len)
                    .ok_or(MachineError::MemoryOutOfBounds {
                        pc,
                        opcode,
                        start,
                        len,
                    })?;
                v[..len].copy_from_slice(source);
                if self.quirks.increment_index {
                    state.index = state.index.wrapping_add(len as u16);
                }
            }
            Unknown(opcode) => warn!("Unknown instruction: {} at {:03X}", opcode, pc),
        }
        Ok(())
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.state.pc += 2;
        }
    }
}

impl ShiftSource {
    fn pick(self, x: usize, y: usize) -> usize {
        match self {
            ShiftSource::Vy => y,
            ShiftSource::Vx => x,
        }
    }
}
