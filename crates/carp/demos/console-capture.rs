//! Emit a few frames the way a device would over a serial console.
//!
//! Frames go to stdout (or the file named by the first argument), each
//! followed by a newline so a line-buffered capture tool can split them.
//!
//! ```text
//! cargo run -p carp --example console-capture -- /tmp/frames.bin
//! ```

use std::fs::File;
use std::io::Write;

use carp::frame::{setup_logging, Counter, IoSink, Logger, UptimeMillis};
use carp::{carp_emit, carp_log, carp_write};

fn run<W: Write + Send + 'static>(out: W) -> carp::frame::Result<()> {
    let mut logger = Logger::new(IoSink::new(out).with_terminator(&b"\n"[..]))
        .with_timestamp_provider(Counter::new());

    carp_write!(logger, 1, 6, 10, "foo", 47.1f32)?;
    carp_write!(logger, 1, 7, -3i16, 250u8, 0.125f64)?;
    carp_log!(logger, "unresolved {} {}", 1u32, "two")?;

    let sink = logger.into_inner();
    eprintln!(
        "logger: {} frames, {} bytes",
        sink.frames_written(),
        sink.bytes_written()
    );

    // The same stream, continued through the process-wide sink.
    setup_logging(sink)?;
    carp::frame::set_timestamp_provider(UptimeMillis::new());
    carp_emit!(2, 0, "global", 99u16)?;
    Ok(())
}

fn main() {
    let result = match std::env::args().nth(1) {
        Some(path) => match File::create(&path) {
            Ok(file) => run(file),
            Err(err) => {
                eprintln!("error: cannot create {path}: {err}");
                std::process::exit(1);
            }
        },
        None => run(std::io::stdout()),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
