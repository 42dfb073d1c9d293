use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use env_logger::{Builder, Env, Target};

use crate::error::Result;

/// Sends log records to `path`, since the terminal belongs to the renderer.
/// `RUST_LOG` takes precedence over `verbose`.
pub fn init(path: &Path, verbose: bool) -> Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    let level = if verbose { "trace" } else { "info" };

    Builder::from_env(Env::default().default_filter_or(level))
        .target(Target::Pipe(Box::new(file)))
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .try_init()?;
    Ok(())
}
