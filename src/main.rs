mod terminal;

use std::process::ExitCode;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use clap::Parser;
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use ch8_vm::config::{Args, Config};
use ch8_vm::error::{Error, Result};
use ch8_vm::{logger, program, timer, Cpu, Event, Frame, Machine};

use terminal::Terminal;

/// How often the terminal is polled and redrawn.
const REFRESH: Duration = Duration::from_millis(16);

/// Runs when no program is given: shows the glyph of each key pressed.
fn demo_program() -> Result<Vec<u8>> {
    let mut code = String::new();
    code.push_str("00E0"); // clear screen        . 512
    code.push_str("F00A"); // wait for key in v0  . 514
    code.push_str("F029"); // i = glyph of v0     . 516
    code.push_str("6A1C"); // v10 = 28            . 518
    code.push_str("6B0D"); // v11 = 13            . 520
    code.push_str("DAB5"); // draw x = v10, y = v11, 5 rows . 522
    code.push_str("1200"); // jump to 512         . 524
    program::decode_hex(&code)
}

fn main() -> ExitCode {
    let config = match Args::parse().into_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("ch8-vm: {}", err);
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = logger::init(&config.log_file, config.verbose) {
        eprintln!("ch8-vm: {}", err);
        return ExitCode::FAILURE;
    }

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            eprintln!("ch8-vm: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(config: Config) -> Result<()> {
    let image = match &config.program {
        Some(path) => program::read_image(path)?,
        None => {
            info!("no program given, running demo");
            demo_program()?
        }
    };
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut cpu = Cpu::new(config.quirks, rng);
    cpu.load_program(&image)?;

    let (events_tx, events_rx) = mpsc::channel();
    let (frames_tx, frames_rx) = mpsc::channel();

    let ticks = events_tx.clone();
    timer::spawn_clock(timer::timer_period(), move || ticks.send(Event::Tick).is_ok());

    let cycle = config.cycle;
    let engine = thread::Builder::new()
        .name("engine".into())
        .spawn(move || Machine::new(cpu, events_rx, frames_tx, cycle).run())?;

    let presented = present(&config, &events_tx, &frames_rx);
    // the engine may still be running if the terminal failed
    let _ = events_tx.send(Event::Quit);
    engine.join().map_err(|_| Error::EnginePanicked)??;
    presented
}

/// Forwards input to the engine and draws its frames until either side stops.
fn present(config: &Config, events: &Sender<Event>, frames: &Receiver<Frame>) -> Result<()> {
    let mut terminal = Terminal::open(config.scale, config.pad)?;
    loop {
        for event in terminal.poll_input(REFRESH)? {
            if events.send(event).is_err() || event == Event::Quit {
                return Ok(());
            }
        }

        let mut latest = None;
        loop {
            match frames.try_recv() {
                Ok(frame) => latest = Some(frame),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Ok(()),
            }
        }
        if let Some(frame) = latest {
            terminal.render(&frame)?;
        }
    }
}
