//! Stream loop: stdin lines in, transformed lines out.

use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::pipeline::Pipeline;

/// Read lines from stdin until EOF, feeding each through the pipeline.
///
/// Lines are handled as raw bytes so binary junk in a log stream passes
/// through untouched; each output line keeps the terminator the input line
/// had (the final line of input may have none).
pub async fn run(pipeline: &mut Pipeline) -> Result<()> {
    let mut reader = BufReader::new(tokio::io::stdin());
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut buf = Vec::with_capacity(1024);

    loop {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf).await?;
        if n == 0 {
            break;
        }

        let terminated = buf.last() == Some(&b'\n');
        let line = if terminated { &buf[..buf.len() - 1] } else { &buf[..] };

        if let Some(rendered) = pipeline.process(line) {
            out.write_all(&rendered)?;
            if terminated {
                out.write_all(b"\n")?;
            }
            out.flush()?;
        }
    }

    Ok(())
}
