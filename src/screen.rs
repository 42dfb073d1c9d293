pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// Pixels indexed as `[x][y]`.
pub type PixelArray = [[bool; HEIGHT]; WIDTH];

/// A copy of the display handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pixels: PixelArray,
}

impl Default for Frame {
    fn default() -> Self {
        Frame {
            pixels: [[false; HEIGHT]; WIDTH],
        }
    }
}

impl Frame {
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[x][y]
    }

    pub fn lit_count(&self) -> usize {
        self.pixels.iter().flatten().filter(|&&lit| lit).count()
    }
}

#[derive(Default)]
pub struct Screen {
    frame: Frame,
    changed: bool,
}

impl Screen {
    /// XORs an 8-pixel wide sprite onto the display, one row per byte of
    /// `source`. The start position wraps around the display, but rows and
    /// columns that run past the edge are clipped. Returns whether any lit
    /// pixel was turned off.
    pub fn render_sprite(&mut self, x: usize, y: usize, source: &[u8]) -> bool {
        let x = x % WIDTH;
        let y = y % HEIGHT;
        let mut collided = false;
        for (i, row) in source.iter().enumerate() {
            let target_y = y + i;
            if target_y >= HEIGHT {
                break;
            }
            for j in 0..8 {
                let target_x = x + j;
                if target_x >= WIDTH {
                    break;
                }
                if get_bit(*row, 7 - j) {
                    collided |= self.xor_pixel(target_x, target_y);
                }
            }
        }

        collided
    }

    pub fn clear_screen(&mut self) {
        self.frame = Frame::default();
        self.changed = true;
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.frame.pixel(x, y)
    }

    pub fn snapshot(&self) -> Frame {
        self.frame
    }

    /// Returns whether the display changed since the last call.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    fn xor_pixel(&mut self, x: usize, y: usize) -> bool {
        let pixel = &mut self.frame.pixels[x][y];
        let collided = *pixel;
        *pixel = !*pixel;
        self.changed = true;

        collided
    }
}

fn get_bit(byte: u8, bit: usize) -> bool {
    (byte >> bit) & 1 == 1
}
