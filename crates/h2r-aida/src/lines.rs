//! Line source: numbered, non-blank lines from a file or standard input.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Lazily yields `(line_number, text)` for every non-blank line.
///
/// Line numbers are 1-based and count blank lines too. Trailing `\n` /
/// `\r\n` is stripped; a line is blank only if nothing else remains.
/// Bytes that are not valid UTF-8 are replaced with `U+FFFD`.
pub struct LineSource<R> {
    reader: R,
    line_number: usize,
    buf: Vec<u8>,
}

impl<R: BufRead> LineSource<R> {
    /// Wrap a buffered reader.
    pub fn new(reader: R) -> Self {
        Self { reader, line_number: 0, buf: Vec::new() }
    }

    /// Number of physical lines read so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl LineSource<Box<dyn BufRead>> {
    /// Open `path`, or standard input when `path` is `None` or `-`.
    pub fn open(path: Option<&Path>) -> io::Result<Self> {
        let reader: Box<dyn BufRead> = match path {
            Some(p) if p != Path::new("-") => Box::new(BufReader::new(File::open(p)?)),
            _ => Box::new(BufReader::new(io::stdin())),
        };
        Ok(Self::new(reader))
    }
}

impl<R: BufRead> Iterator for LineSource<R> {
    type Item = io::Result<(usize, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e)),
            }
            self.line_number += 1;
            let text = self.buf.strip_suffix(b"\n").unwrap_or(&self.buf);
            let text = text.strip_suffix(b"\r").unwrap_or(text);
            if !text.is_empty() {
                return Some(Ok((self.line_number, String::from_utf8_lossy(text).into_owned())));
            }
        }
    }
}
