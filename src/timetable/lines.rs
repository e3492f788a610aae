//! Turns arbitrarily chunked input into whole lines.
//!
//! Every yielded line keeps its `\n` terminator, except the final line of an
//! input that does not end with one. Lines are never split across items and a
//! trailing partial line is never dropped.

use std::io::{self, ErrorKind, Read};

const CHUNK_SIZE: usize = 64 * 1024;

/// Lazy line iterator over a sequence of byte chunks.
pub struct ChunkLines<I> {
    chunks: I,
    buffer: Vec<u8>,
    start: usize,
    searched: usize,
    exhausted: bool,
}

impl<I, C> ChunkLines<I>
where
    I: Iterator<Item = io::Result<C>>,
    C: AsRef<[u8]>,
{
    pub fn new(chunks: I) -> Self {
        Self {
            chunks,
            buffer: Vec::new(),
            start: 0,
            searched: 0,
            exhausted: false,
        }
    }

    fn take_line(&mut self, end: usize) -> String {
        let line = decode_line(&self.buffer[self.start..end]);
        self.start = end;
        self.searched = end;
        line
    }
}

impl<I, C> Iterator for ChunkLines<I>
where
    I: Iterator<Item = io::Result<C>>,
    C: AsRef<[u8]>,
{
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(pos) = self.buffer[self.searched..]
                .iter()
                .position(|b| *b == b'\n')
            {
                let end = self.searched + pos + 1;
                return Some(Ok(self.take_line(end)));
            }
            self.searched = self.buffer.len();

            if self.exhausted {
                if self.start < self.buffer.len() {
                    let end = self.buffer.len();
                    return Some(Ok(self.take_line(end)));
                }
                return None;
            }

            // Drop consumed bytes before growing the buffer
            self.buffer.drain(..self.start);
            self.searched -= self.start;
            self.start = 0;

            match self.chunks.next() {
                Some(Ok(chunk)) => self.buffer.extend_from_slice(chunk.as_ref()),
                Some(Err(e)) => {
                    self.exhausted = true;
                    self.buffer.clear();
                    self.searched = 0;
                    return Some(Err(e));
                }
                None => self.exhausted = true,
            }
        }
    }
}

/// A line as text with the same byte length as the input, so fixed-width
/// offsets still hold. Lines that are not UTF-8 have every non-ASCII byte
/// replaced by `?`.
fn decode_line(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(line) => line.to_owned(),
        Err(_) => bytes
            .iter()
            .map(|b| if b.is_ascii() { *b as char } else { '?' })
            .collect(),
    }
}

/// Fixed-size chunks pulled from a reader.
pub struct ReaderChunks<R> {
    reader: R,
    done: bool,
}

impl<R: Read> ReaderChunks<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            done: false,
        }
    }
}

impl<R: Read> Iterator for ReaderChunks<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut chunk = vec![0; CHUNK_SIZE];
        loop {
            match self.reader.read(&mut chunk) {
                Ok(0) => {
                    self.done = true;
                    return None;
                }
                Ok(n) => {
                    chunk.truncate(n);
                    return Some(Ok(chunk));
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Lines of everything `reader` produces.
pub fn read_lines<R: Read>(reader: R) -> ChunkLines<ReaderChunks<R>> {
    ChunkLines::new(ReaderChunks::new(reader))
}

/// Lines of in-memory text chunks.
pub fn text_lines<I, S>(chunks: I) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    ChunkLines::new(chunks.into_iter().map(Ok::<S, io::Error>)).map_while(Result::ok)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_utf8_keeps_byte_offsets() {
        let line: &[u8] = b"A    CAF\xc9 ROYAL                     CAFROYLCFR\n";
        let lines: Vec<_> = text_lines([line]).collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len(), line.len());
        assert_eq!(&lines[0][36..43], "CAFROYL");
        assert_eq!(&lines[0][43..46], "CFR");
        assert!(lines[0].starts_with("A    CAF? ROYAL"));
    }

    #[test]
    fn keeps_terminators() {
        let lines: Vec<_> = text_lines(["ab\ncd\n"]).collect();
        assert_eq!(lines, vec!["ab\n", "cd\n"]);
    }

    #[test]
    fn yields_trailing_partial_line() {
        let lines: Vec<_> = text_lines(["ab\nc", "d"]).collect();
        assert_eq!(lines, vec!["ab\n", "cd"]);
    }

    #[test]
    fn joins_line_split_across_chunks() {
        let lines: Vec<_> = text_lines(["a", "b", "\n", "", "c\n"]).collect();
        assert_eq!(lines, vec!["ab\n", "c\n"]);
    }

    #[test]
    fn empty_input_has_no_lines() {
        assert_eq!(text_lines(Vec::<&str>::new()).count(), 0);
        assert_eq!(text_lines([""]).count(), 0);
    }

    #[test]
    fn blank_lines_survive() {
        let lines: Vec<_> = text_lines(["\n\nx"]).collect();
        assert_eq!(lines, vec!["\n", "\n", "x"]);
    }

    #[test]
    fn reads_from_reader() {
        let data = b"BSNC123451\nLOWATRLOO\n".to_vec();
        let lines: Vec<_> = read_lines(data.as_slice())
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(lines, vec!["BSNC123451\n", "LOWATRLOO\n"]);
    }

    #[test]
    fn surfaces_read_errors() {
        let chunks = vec![
            Ok(b"ok\npart".to_vec()),
            Err(io::Error::other("boom")),
        ];
        let mut lines = ChunkLines::new(chunks.into_iter());
        assert_eq!(lines.next().unwrap().unwrap(), "ok\n");
        assert!(lines.next().unwrap().is_err());
        assert!(lines.next().is_none());
    }
}
