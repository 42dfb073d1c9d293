//! A CHIP-8 virtual machine: 4KB of memory, sixteen 8-bit registers, a
//! 64x32 monochrome display, a hex keypad and two 60 Hz timers.
//!
//! [`cpu::Cpu`] executes instructions one cycle at a time; [`machine::Machine`]
//! runs it on its own thread and takes keys and timer ticks as messages.

pub mod config;
pub mod cpu;
pub mod error;
pub mod instruction;
pub mod keypad;
pub mod logger;
pub mod machine;
pub mod memory;
pub mod program;
pub mod screen;
pub mod stack;
pub mod state;
pub mod timer;

pub use config::{Config, Quirks, ShiftSource};
pub use cpu::{Cpu, Status};
pub use error::{Error, MachineError, Result};
pub use machine::{Event, Machine};
pub use screen::Frame;
