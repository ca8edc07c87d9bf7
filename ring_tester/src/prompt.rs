use anyhow::{bail, Context, Result};
use ring_vision::RingColor;
use std::io::{BufRead, Write};

/// Asks which ring color to track. `1` is red, `2` is blue.
pub fn choose_color<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<RingColor> {
    writeln!(output, "Select the ring color to detect:")?;
    writeln!(output, "1: Red")?;
    writeln!(output, "2: Blue")?;
    write!(output, "Enter your choice: ")?;
    output.flush()?;

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .context("reading color choice")?;

    match answer.trim() {
        "1" => Ok(RingColor::Red),
        "2" => Ok(RingColor::Blue),
        other => bail!("invalid option {other:?}, expected 1 or 2"),
    }
}
