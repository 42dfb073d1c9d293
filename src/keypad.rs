use thiserror::Error;

pub const KEY_COUNT: usize = 16;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum KeypadError {
    #[error("key {key:X} released while no keys were pressed")]
    NegativeCount { key: u8 },
    #[error("no such key: {key:#04x}")]
    InvalidKey { key: u8 },
}

/// The hex keypad as seen by the program.
///
/// `pressed_count` follows the raw event stream, so a release without a
/// matching press means the event source is broken.
#[derive(Debug, Clone, Default)]
pub struct Keypad {
    pressed: [bool; KEY_COUNT],
    pressed_count: usize,
    waiting: bool,
}

impl Keypad {
    /// Keys outside of `0x0..=0xF` are never pressed.
    pub fn is_pressed(&self, key: u8) -> bool {
        self.pressed.get(key as usize).copied().unwrap_or(false)
    }

    pub fn pressed_count(&self) -> usize {
        self.pressed_count
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    /// Registers interest in the next key press.
    pub fn subscribe(&mut self) {
        self.waiting = true;
    }

    /// Records a press. Returns the key if a subscriber was waiting for it,
    /// which also retracts the subscription.
    pub fn press(&mut self, key: u8) -> Result<Option<u8>, KeypadError> {
        let state = self
            .pressed
            .get_mut(key as usize)
            .ok_or(KeypadError::InvalidKey { key })?;
        *state = true;
        self.pressed_count += 1;

        if self.waiting {
            self.waiting = false;
            return Ok(Some(key));
        }
        Ok(None)
    }

    pub fn release(&mut self, key: u8) -> Result<(), KeypadError> {
        let state = self
            .pressed
            .get_mut(key as usize)
            .ok_or(KeypadError::InvalidKey { key })?;
        self.pressed_count = self
            .pressed_count
            .checked_sub(1)
            .ok_or(KeypadError::NegativeCount { key })?;
        *state = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_presses_and_releases() {
        let mut keypad = Keypad::default();
        assert_eq!(keypad.press(0xA), Ok(None));
        assert!(keypad.is_pressed(0xA));
        assert!(!keypad.is_pressed(0xB));
        assert_eq!(keypad.pressed_count(), 1);

        keypad.release(0xA).unwrap();
        assert!(!keypad.is_pressed(0xA));
        assert_eq!(keypad.pressed_count(), 0);
    }

    #[test]
    fn release_without_press_is_rejected() {
        let mut keypad = Keypad::default();
        assert_eq!(keypad.release(3), Err(KeypadError::NegativeCount { key: 3 }));
    }

    #[test]
    fn out_of_range_keys() {
        let mut keypad = Keypad::default();
        assert!(!keypad.is_pressed(0x10));
        assert_eq!(keypad.press(0x10), Err(KeypadError::InvalidKey { key: 0x10 }));
        assert_eq!(keypad.pressed_count(), 0);
    }

    #[test]
    fn subscription_delivers_one_press() {
        let mut keypad = Keypad::default();
        keypad.subscribe();
        keypad.release(0).unwrap_err();
        assert!(keypad.is_waiting());

        assert_eq!(keypad.press(7), Ok(Some(7)));
        assert!(!keypad.is_waiting());
        assert_eq!(keypad.press(8), Ok(None));
    }
}
