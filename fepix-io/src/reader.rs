//! Buffered raw-log line reading.

use crate::Result;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

/// Reader for the front-end's raw log files.
///
/// The file carries every readout word as a *pair* of lines: the undecoded
/// word followed by its decoded form. Only the decoded line is of interest
/// downstream, so the reader yields the second line of each pair. A
/// `CHANNEL` marker occasionally displaces the pairing by one line; the
/// reader surfaces the marker (the segmenter uses it as a
/// desynchronization signal) and picks the pairing back up one line down.
pub struct RawLogReader<R> {
    lines: Lines<R>,
}

impl RawLogReader<BufReader<File>> {
    /// Opens a raw log file for reading.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> RawLogReader<R> {
    /// Wraps any buffered reader of raw log text.
    pub fn new(inner: R) -> Self {
        Self {
            lines: inner.lines(),
        }
    }
}

impl<R: BufRead> Iterator for RawLogReader<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = match self.lines.next()? {
            Ok(line) => line,
            Err(e) => return Some(Err(e.into())),
        };

        if first.starts_with("CHANNEL") {
            return Some(Ok(first));
        }

        // A trailing undecoded word without its partner ends the stream.
        match self.lines.next() {
            Some(Ok(line)) => Some(Ok(line)),
            Some(Err(e)) => Some(Err(e.into())),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn collect(input: &str) -> Vec<String> {
        RawLogReader::new(Cursor::new(input.to_string()))
            .map(|line| line.unwrap())
            .collect()
    }

    #[test]
    fn test_yields_decoded_line_of_each_pair() {
        let input = "0x00ea\nDH 0 15\n0x1234\nDR 3 5 2 15\n";
        assert_eq!(collect(input), vec!["DH 0 15", "DR 3 5 2 15"]);
    }

    #[test]
    fn test_channel_marker_shifts_pairing() {
        // CHANNEL displaces the pair: the line after it becomes the raw
        // word of the next pair.
        let input = "CHANNEL 1\n0x00ea\nDH 0 15\n0x1234\nDR 3 5 2 15\n";
        assert_eq!(collect(input), vec!["CHANNEL 1", "DH 0 15", "DR 3 5 2 15"]);
    }

    #[test]
    fn test_trailing_unpaired_line_dropped() {
        let input = "0x00ea\nDH 0 15\n0xdead\n";
        assert_eq!(collect(input), vec!["DH 0 15"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(collect("").is_empty());
    }
}
