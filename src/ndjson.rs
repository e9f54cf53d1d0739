use std::io::{self, BufRead};

/// Minimal NDJSON line reader over any buffered source.
/// Tracks the current line number for diagnostics.
pub struct NdjsonReader<R> {
    rdr: R,
    line_no: u64,
}

impl<R: BufRead> NdjsonReader<R> {
    pub fn new(rdr: R) -> Self {
        Self { rdr, line_no: 0 }
    }

    /// Read the next line into `buf`. Returns the number of bytes read (0 on EOF).
    /// Strips trailing `\r?\n`. Blank lines come back as empty strings.
    pub fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        buf.clear();
        let n = self.rdr.read_line(buf)?;
        if n == 0 { return Ok(0); }
        self.line_no += 1;
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') { buf.pop(); }
        }
        Ok(n)
    }

    /// 1-based number of the line last returned by `read_line`.
    #[inline]
    pub fn line_no(&self) -> u64 {
        self.line_no
    }
}
