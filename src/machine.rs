use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::{Duration, Instant};

use log::info;

use crate::cpu::{Cpu, Status};
use crate::error::MachineError;
use crate::screen::Frame;

/// Everything that reaches the engine from the outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    KeyDown(u8),
    KeyUp(u8),
    /// One tick of the 60 Hz timer clock.
    Tick,
    Quit,
}

enum Flow {
    Continue,
    Stop,
}

/// Owns the `Cpu` and drives it at a fixed rate.
///
/// Timer ticks and key events are applied between cycles, so nothing else
/// ever touches machine state. Frames go out whenever the display changed.
pub struct Machine {
    cpu: Cpu,
    events: Receiver<Event>,
    frames: Sender<Frame>,
    cycle: Duration,
}

impl Machine {
    pub fn new(cpu: Cpu, events: Receiver<Event>, frames: Sender<Frame>, cycle: Duration) -> Self {
        Machine {
            cpu,
            events,
            frames,
            cycle,
        }
    }

    /// Runs until `Event::Quit`, until every event sender is gone, or until a
    /// fatal condition. Returns the machine in the state it stopped in.
    pub fn run(mut self) -> Result<Cpu, MachineError> {
        info!("starting execution at {:03X}", self.cpu.state().pc);
        let mut next_cycle = Instant::now();
        loop {
            loop {
                match self.events.try_recv() {
                    Ok(event) => {
                        if let Flow::Stop = self.apply(event)? {
                            return Ok(self.stop());
                        }
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => return Ok(self.stop()),
                }
            }

            let event = match self.cpu.status() {
                Status::Running => {
                    let now = Instant::now();
                    if now < next_cycle {
                        match self.events.recv_timeout(next_cycle - now) {
                            Ok(event) => Some(event),
                            Err(RecvTimeoutError::Timeout) => None,
                            Err(RecvTimeoutError::Disconnected) => return Ok(self.stop()),
                        }
                    } else {
                        self.cpu.step()?;
                        self.publish_frame();
                        next_cycle += self.cycle;
                        // don't try to catch up after a stall
                        if next_cycle < now {
                            next_cycle = now + self.cycle;
                        }
                        None
                    }
                }
                Status::AwaitingKey { .. } => {
                    match self.events.recv() {
                        Ok(event) => Some(event),
                        Err(_) => return Ok(self.stop()),
                    }
                }
            };

            if let Some(event) = event {
                if let Flow::Stop = self.apply(event)? {
                    return Ok(self.stop());
                }
            }
        }
    }

    fn stop(self) -> Cpu {
        info!("stopped at {:03X}", self.cpu.state().pc);
        self.cpu
    }

    fn apply(&mut self, event: Event) -> Result<Flow, MachineError> {
        match event {
            Event::KeyDown(key) => self.cpu.key_down(key)?,
            Event::KeyUp(key) => self.cpu.key_up(key)?,
            Event::Tick => self.cpu.tick_timers(),
            Event::Quit => return Ok(Flow::Stop),
        }
        Ok(Flow::Continue)
    }

    fn publish_frame(&mut self) {
        let state = self.cpu.state_mut();
        if state.screen.take_changed() {
            // the renderer may already be gone while shutting down
            let _ = self.frames.send(state.screen.snapshot());
        }
    }
}
