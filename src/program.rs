use std::fs;
use std::path::Path;

use log::info;

use crate::error::Result;

/// Reads a program image. Files with a `.hex` extension hold the image as hex
/// text and may contain whitespace and `#` comments.
pub fn read_image(path: &Path) -> Result<Vec<u8>> {
    let is_hex = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("hex"));
    let image = if is_hex {
        decode_hex(&fs::read_to_string(path)?)?
    } else {
        fs::read(path)?
    };
    info!("read {} bytes from {}", image.len(), path.display());
    Ok(image)
}

pub fn decode_hex(text: &str) -> Result<Vec<u8>> {
    let digits: String = text
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default())
        .flat_map(|line| line.chars().filter(|c| !c.is_whitespace()))
        .collect();
    Ok(hex::decode(digits)?)
}
