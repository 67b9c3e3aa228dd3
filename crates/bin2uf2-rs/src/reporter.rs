use std::io::{self, Stdout, Write};

use log::{max_level, LevelFilter};
use pbr::{ProgressBar, Units};

/// Forwards writes to `inner`, advancing a byte progress bar when info
/// logging is on.
pub struct ProgressWriter<T> {
    pb: Option<ProgressBar<Stdout>>,
    inner: T,
}

impl<T: Write> ProgressWriter<T> {
    pub fn new(total_bytes: u64, inner: T) -> Self {
        let pb = (max_level() >= LevelFilter::Info).then(|| {
            let mut pb = ProgressBar::new(total_bytes);
            pb.set_units(Units::Bytes);
            pb
        });

        Self { pb, inner }
    }

    pub fn finish(mut self) -> io::Result<T> {
        self.inner.flush()?;
        if let Some(pb) = self.pb.as_mut() {
            pb.finish();
            // New line after progress bar
            println!();
        }
        Ok(self.inner)
    }
}

impl<T: Write> Write for ProgressWriter<T> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        if let Some(pb) = self.pb.as_mut() {
            pb.add(written as u64);
        }
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
