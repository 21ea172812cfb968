use anyhow::{Context, Result};
use std::io::{BufRead, Write};

/// Ask for a folder path on `output` and read one line from `input`.
///
/// Only the line ending is stripped; spaces are legal in folder names.
pub fn ask_folder<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<String> {
    write!(output, "Enter the path of the folder: ").context("Failed to write prompt")?;
    output.flush().context("Failed to flush prompt")?;

    let mut line = String::new();
    let read = input.read_line(&mut line).context("Failed to read folder path")?;
    if read == 0 {
        anyhow::bail!("No folder path given (stdin closed)");
    }

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
