use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::error::{Error, Result};

/// Largest `--scale` whose terminal coordinates still fit a `u16`.
pub const MAX_SCALE: u16 = 500;

/// Which register the shift instructions read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShiftSource {
    /// `Vx = Vy >> 1`, as on the original interpreter.
    #[default]
    Vy,
    /// `Vx = Vx >> 1`, as on later interpreters.
    Vx,
}

/// Behaviors that differ between interpreters and that programs rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Quirks {
    pub shift_source: ShiftSource,
    /// FX55/FX65 leave I pointing past the last transferred byte.
    pub increment_index: bool,
}

#[derive(Parser, Debug)]
#[command(version, about = "Runs CHIP-8 programs in the terminal")]
pub struct Args {
    /// Program image; `.hex` files are read as hex text. Runs a demo when omitted.
    pub file: Option<PathBuf>,

    /// Rough CPU speed in Hz
    #[arg(short, long, default_value_t = 800)]
    pub speed: u32,

    /// Fixed delay between instructions, in microseconds
    #[arg(long, conflicts_with = "speed")]
    pub cycle_delay_us: Option<u64>,

    /// Scale pixels by n terminal rows (2n columns)
    #[arg(long, default_value_t = 1)]
    pub scale: u16,

    /// Pad lit pixels with n cells on each side
    #[arg(long, default_value_t = 0)]
    pub pad: u16,

    /// Trace every executed instruction to the log
    #[arg(short, long)]
    pub verbose: bool,

    /// Let FX55/FX65 increment I per transferred byte
    #[arg(long)]
    pub increment_index: bool,

    /// Shift Vx in place instead of reading Vy
    #[arg(long)]
    pub shift_in_place: bool,

    /// Seed for the random number generator
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value = "log.txt")]
    pub log_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub program: Option<PathBuf>,
    pub cycle: Duration,
    pub scale: u16,
    pub pad: u16,
    pub verbose: bool,
    pub seed: Option<u64>,
    pub log_file: PathBuf,
    pub quirks: Quirks,
}

impl Args {
    pub fn into_config(self) -> Result<Config> {
        let cycle = match self.cycle_delay_us {
            Some(us) => Duration::from_micros(us),
            None if self.speed == 0 => {
                return Err(Error::Config("speed must be at least 1 Hz".into()))
            }
            None => Duration::from_secs(1) / self.speed,
        };
        if self.scale == 0 {
            return Err(Error::Config("scale must be at least 1".into()));
        }
        if self.scale > MAX_SCALE {
            return Err(Error::Config(format!("scale must be at most {}", MAX_SCALE)));
        }
        if self.pad > 0 && u32::from(self.pad) * 2 >= u32::from(self.scale) {
            return Err(Error::Config(format!(
                "padding {} leaves nothing of a pixel scaled by {}",
                self.pad, self.scale
            )));
        }
        let shift_source = if self.shift_in_place {
            ShiftSource::Vx
        } else {
            ShiftSource::Vy
        };

        Ok(Config {
            program: self.file,
            cycle,
            scale: self.scale,
            pad: self.pad,
            verbose: self.verbose,
            seed: self.seed,
            log_file: self.log_file,
            quirks: Quirks {
                shift_source,
                increment_index: self.increment_index,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config> {
        let args = Args::try_parse_from(std::iter::once("ch8-vm").chain(args.iter().copied()))
            .map_err(|e| Error::Config(e.to_string()))?;
        args.into_config()
    }

    #[test]
    fn defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.program, None);
        assert_eq!(config.cycle, Duration::from_secs(1) / 800);
        assert_eq!(config.scale, 1);
        assert_eq!(config.pad, 0);
        assert_eq!(config.quirks, Quirks::default());
        assert_eq!(config.quirks.shift_source, ShiftSource::Vy);
        assert_eq!(config.log_file, PathBuf::from("log.txt"));
    }

    #[test]
    fn quirk_flags() {
        let config = parse(&["--increment-index", "--shift-in-place", "game.ch8"]).unwrap();
        assert_eq!(
            config.quirks,
            Quirks {
                shift_source: ShiftSource::Vx,
                increment_index: true,
            }
        );
        assert_eq!(config.program, Some(PathBuf::from("game.ch8")));
    }

    #[test]
    fn cycle_delay_overrides_speed() {
        let config = parse(&["--cycle-delay-us", "250"]).unwrap();
        assert_eq!(config.cycle, Duration::from_micros(250));
        assert!(parse(&["--speed", "10", "--cycle-delay-us", "250"]).is_err());
    }

    #[test]
    fn rejects_bad_geometry() {
        assert!(matches!(parse(&["--scale", "0"]), Err(Error::Config(_))));
        assert!(matches!(parse(&["--scale", "4", "--pad", "2"]), Err(Error::Config(_))));
        assert!(parse(&["--scale", "5", "--pad", "2"]).is_ok());
        assert!(matches!(parse(&["--speed", "0"]), Err(Error::Config(_))));
    }

    #[test]
    fn caps_scale() {
        assert!(matches!(parse(&["--scale", "600"]), Err(Error::Config(_))));
        assert!(matches!(parse(&["--scale", "65535"]), Err(Error::Config(_))));
        let config = parse(&["--scale", "500"]).unwrap();
        assert_eq!(config.scale, MAX_SCALE);
        // far corner of the widest pixel grid
        let column = u32::from(MAX_SCALE) * 2 * (crate::screen::WIDTH as u32 - 1);
        let row = u32::from(MAX_SCALE) * crate::screen::HEIGHT as u32 - 1;
        assert!(column <= u32::from(u16::MAX));
        assert!(row <= u32::from(u16::MAX));
    }
}
