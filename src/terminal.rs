use std::io::{self, stdout, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};
use log::{info, warn};

use ch8_vm::keypad::KEY_COUNT;
use ch8_vm::screen::{HEIGHT, WIDTH};
use ch8_vm::{Event, Frame};

/// Physical keys for hex keys 0 through F.
//  1 2 3 C      1 2 3 4
//  4 5 6 D  ==  Q W E R
//  7 8 9 E  ==  A S D F
//  A 0 B F      Z X C V
const KEY_MAP: [char; KEY_COUNT] = [
    'x', '1', '2', '3', 'q', 'w', 'e', 'a', 's', 'd', 'z', 'c', '4', 'r', 'f', 'v',
];

/// Without release events a key counts as released this long after the
/// terminal last reported it.
const KEY_HOLD: Duration = Duration::from_millis(300);

const LIT: char = '█';

/// Draws frames and reads the keypad. Restores the terminal when dropped.
pub struct Terminal {
    stdout: Stdout,
    scale: u16,
    pad: u16,
    drawn: Option<Frame>,
    release_events: bool,
    held: [Option<Instant>; KEY_COUNT],
}

impl Terminal {
    pub fn open(scale: u16, pad: u16) -> io::Result<Self> {
        let mut stdout = stdout();
        terminal::enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, cursor::Hide, Clear(ClearType::All))?;

        let release_events = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if release_events {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        } else {
            warn!("terminal does not report key releases, releasing keys after {:?}", KEY_HOLD);
        }
        info!("terminal opened, scale {} pad {}", scale, pad);

        Ok(Terminal {
            stdout,
            scale,
            pad,
            drawn: None,
            release_events,
            held: [None; KEY_COUNT],
        })
    }

    /// Redraws the pixels that differ from the last rendered frame.
    pub fn render(&mut self, frame: &Frame) -> io::Result<()> {
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                let lit = frame.pixel(x, y);
                if self.drawn.as_ref().map_or(false, |drawn| drawn.pixel(x, y) == lit) {
                    continue;
                }
                self.queue_pixel(x as u16, y as u16, lit)?;
            }
        }
        self.stdout.flush()?;
        self.drawn = Some(*frame);
        Ok(())
    }

    fn queue_pixel(&mut self, x: u16, y: u16, lit: bool) -> io::Result<()> {
        let width = self.scale * 2;
        let pad_x = self.pad * 2;
        for row in 0..self.scale {
            let inside = lit && row >= self.pad && row < self.scale - self.pad;
            let line: String = (0..width)
                .map(|col| {
                    if inside && col >= pad_x && col < width - pad_x {
                        LIT
                    } else {
                        ' '
                    }
                })
                .collect();
            queue!(
                self.stdout,
                cursor::MoveTo(x * width, y * self.scale + row),
                Print(line)
            )?;
        }
        Ok(())
    }

    /// Waits up to `timeout` for input and translates it into keypad events.
    pub fn poll_input(&mut self, timeout: Duration) -> io::Result<Vec<Event>> {
        let mut events = Vec::new();
        let mut ready = event::poll(timeout)?;
        while ready {
            match event::read()? {
                TermEvent::Key(key) => self.translate(key, &mut events),
                TermEvent::Resize(..) => {
                    execute!(self.stdout, Clear(ClearType::All))?;
                    self.drawn = None;
                }
                _ => {}
            }
            ready = event::poll(Duration::ZERO)?;
        }

        if !self.release_events {
            let now = Instant::now();
            for (key, held) in self.held.iter_mut().enumerate() {
                if held.map_or(false, |since| now.duration_since(since) >= KEY_HOLD) {
                    *held = None;
                    events.push(Event::KeyUp(key as u8));
                }
            }
        }
        Ok(events)
    }

    fn translate(&mut self, key: KeyEvent, events: &mut Vec<Event>) {
        let quit = key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL));
        if quit {
            events.push(Event::Quit);
            return;
        }

        let hex = match key.code {
            KeyCode::Char(c) => KEY_MAP
                .iter()
                .position(|&mapped| mapped == c.to_ascii_lowercase()),
            _ => None,
        };
        let Some(hex) = hex else {
            return;
        };

        // only pass on transitions so the keypad sees a consistent stream
        let held = &mut self.held[hex];
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if held.is_none() {
                    events.push(Event::KeyDown(hex as u8));
                }
                *held = Some(Instant::now());
            }
            KeyEventKind::Release => {
                if held.take().is_some() {
                    events.push(Event::KeyUp(hex as u8));
                }
            }
        }
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.release_events {
            let _ = execute!(self.stdout, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(self.stdout, cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn closed_terminal(release_events: bool) -> Terminal {
        Terminal {
            stdout: stdout(),
            scale: 1,
            pad: 0,
            drawn: None,
            release_events,
            held: [None; KEY_COUNT],
        }
    }

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn key_map_covers_the_keypad() {
        let mut sorted = KEY_MAP;
        sorted.sort_unstable();
        assert!(sorted.windows(2).all(|pair| pair[0] != pair[1]));
        assert_eq!(KEY_MAP[0x0], 'x');
        assert_eq!(KEY_MAP[0xC], '4');
        assert_eq!(KEY_MAP[0xF], 'v');
    }

    #[test]
    fn passes_on_transitions_only() {
        let mut terminal = closed_terminal(true);
        let mut events = Vec::new();
        terminal.translate(key(KeyCode::Char('W'), KeyEventKind::Press), &mut events);
        terminal.translate(key(KeyCode::Char('w'), KeyEventKind::Repeat), &mut events);
        terminal.translate(key(KeyCode::Char('w'), KeyEventKind::Release), &mut events);
        terminal.translate(key(KeyCode::Char('w'), KeyEventKind::Release), &mut events);
        terminal.translate(key(KeyCode::Char('p'), KeyEventKind::Press), &mut events);
        terminal.translate(key(KeyCode::Esc, KeyEventKind::Press), &mut events);
        assert_eq!(events, vec![Event::KeyDown(0x5), Event::KeyUp(0x5), Event::Quit]);
        std::mem::forget(terminal);
    }
}
