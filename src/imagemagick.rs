use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::CompileError;

const MONTAGE_TILE: &str = "3x3";
const MONTAGE_SPACING: (u32, u32) = (8, 8);

/// Rewrite the image in place to exactly `width`x`height`. The trailing
/// `!` tells ImageMagick to ignore the aspect ratio.
pub fn resize(image: &Path, width: u32, height: u32) -> Result<(), CompileError> {
    let geometry = format!("{}x{}!", width, height);
    let mut command = Command::new("convert");
    command.arg(image).arg("-resize").arg(geometry).arg(image);
    run("convert", command)
}

/// Tile up to nine images into one 3x3 page image.
pub fn montage3x3(
    images: &[PathBuf],
    card_size: (u32, u32),
    output: &Path,
) -> Result<(), CompileError> {
    let (width, height) = card_size;
    let (offset_x, offset_y) = MONTAGE_SPACING;
    let geometry = format!("{}x{}+{}+{}", width, height, offset_x, offset_y);
    let mut command = Command::new("montage");
    command
        .arg("-tile")
        .arg(MONTAGE_TILE)
        .arg("-geometry")
        .arg(geometry);
    for image in images {
        command.arg(image);
    }
    command.arg(output);
    run("montage", command)
}

/// Merge the page images into one paginated document.
pub fn merge_to_pdf(pages: &[PathBuf], output: &Path) -> Result<(), CompileError> {
    let mut command = Command::new("convert");
    for page in pages {
        command.arg(page);
    }
    command.arg(output);
    run("convert", command)
}

fn run(tool: &'static str, mut command: Command) -> Result<(), CompileError> {
    let output = command.output().map_err(|err| CompileError::Tool {
        tool,
        detail: err.to_string(),
    })?;
    if output.status.success() {
        return Ok(());
    }
    Err(CompileError::Tool {
        tool,
        detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}
