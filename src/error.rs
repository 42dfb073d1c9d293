use std::io;

use thiserror::Error;

use crate::instruction::Opcode;
use crate::keypad::KeypadError;
use crate::stack::StackError;

/// Conditions that halt the machine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("call stack {source} at {pc:#05x}")]
    Stack {
        pc: u16,
        #[source]
        source: StackError,
    },
    #[error("program counter {pc:#06x} is outside of memory")]
    PcOutOfBounds { pc: u16 },
    #[error("jump at {pc:#05x} targets {target:#06x}, outside of memory")]
    JumpOutOfBounds { pc: u16, target: u16 },
    #[error("{opcode} at {pc:#05x} accesses {len} bytes at {start:#06x}, outside of memory")]
    MemoryOutOfBounds {
        pc: u16,
        opcode: Opcode,
        start: usize,
        len: usize,
    },
    #[error(transparent)]
    Keypad(#[from] KeypadError),
    #[error("program image of {len} bytes does not fit in {capacity} bytes")]
    ProgramTooLarge { len: usize, capacity: usize },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Machine(#[from] MachineError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("cant decode program: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("cant set up logger: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error("execution thread panicked")]
    EnginePanicked,
}

pub type Result<T> = std::result::Result<T, Error>;
