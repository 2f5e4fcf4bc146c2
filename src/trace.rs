use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::TbResult;
use crate::signal::{Signal, SignalSnapshot};
use crate::testbench::SimTime;

/// Sink for per-tick signal values.
pub trait WaveformRecorder {
    fn record(&mut self, time: SimTime, snap: &SignalSnapshot) -> TbResult<()>;
    fn finish(&mut self) -> TbResult<()>;
}

/// Value Change Dump writer. Only changed signals are written after the
/// first sample.
pub struct VcdRecorder<W: Write> {
    out: W,
    last: Option<SignalSnapshot>,
    header_written: bool,
}

impl VcdRecorder<BufWriter<File>> {
    pub fn create<P: AsRef<Path>>(path: P) -> TbResult<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> VcdRecorder<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last: None,
            header_written: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_header(&mut self) -> TbResult<()> {
        writeln!(self.out, "$version {} {} $end", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))?;
        writeln!(self.out, "$timescale 1ns $end")?;
        writeln!(self.out, "$scope module dut $end")?;
        for (idx, sig) in Signal::ALL.iter().enumerate() {
            writeln!(self.out, "$var wire {} {} {} $end", sig.width(), ident(idx), sig.name())?;
        }
        writeln!(self.out, "$upscope $end")?;
        writeln!(self.out, "$enddefinitions $end")?;
        self.header_written = true;
        Ok(())
    }

    fn write_value(&mut self, idx: usize, sig: Signal, value: u32) -> TbResult<()> {
        if sig.width() == 1 {
            writeln!(self.out, "{}{}", value & 1, ident(idx))?;
        } else {
            writeln!(self.out, "b{:b} {}", value, ident(idx))?;
        }
        Ok(())
    }
}

impl<W: Write> WaveformRecorder for VcdRecorder<W> {
    fn record(&mut self, time: SimTime, snap: &SignalSnapshot) -> TbResult<()> {
        if !self.header_written {
            self.write_header()?;
        }
        match self.last {
            None => {
                writeln!(self.out, "#{}", time)?;
                writeln!(self.out, "$dumpvars")?;
                for (idx, sig) in Signal::ALL.iter().enumerate() {
                    self.write_value(idx, *sig, snap.get(*sig))?;
                }
                writeln!(self.out, "$end")?;
            }
            Some(prev) => {
                let changed: Vec<_> = Signal::ALL
                    .iter()
                    .enumerate()
                    .filter(|(_, sig)| prev.get(**sig) != snap.get(**sig))
                    .map(|(idx, sig)| (idx, *sig))
                    .collect();
                if !changed.is_empty() {
                    writeln!(self.out, "#{}", time)?;
                    for (idx, sig) in changed {
                        self.write_value(idx, sig, snap.get(sig))?;
                    }
                }
            }
        }
        self.last = Some(*snap);
        Ok(())
    }

    fn finish(&mut self) -> TbResult<()> {
        if !self.header_written {
            self.write_header()?;
        }
        self.out.flush()?;
        Ok(())
    }
}

// printable identifier codes start at '!'
fn ident(idx: usize) -> char {
    (b'!' + idx as u8) as char
}
