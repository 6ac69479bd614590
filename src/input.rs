use std::io::{self, BufRead, ErrorKind, Read};

/// Reads command lines of bounded length from a buffered source.
///
/// At most `max_line_len - 1` bytes of a line are kept, the newline included.
/// Whatever is left of an overlong line is consumed and thrown away, so it is
/// never mistaken for the next command.
pub(crate) struct LineReader<R> {
    reader: R,
    limit: usize,
}

impl<R: BufRead> LineReader<R> {
    pub(crate) fn new(reader: R, max_line_len: usize) -> Self {
        Self {
            reader,
            limit: max_line_len.saturating_sub(1).max(1),
        }
    }

    /// Read the next line, or `None` at end of input.
    pub(crate) fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = Vec::with_capacity(self.limit);
        let read = (&mut self.reader)
            .take(self.limit as u64)
            .read_until(b'\n', &mut buf)?;
        if read == 0 {
            return Ok(None);
        }
        if read == self.limit && buf.last() != Some(&b'\n') {
            self.discard_rest_of_line()?;
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }

    fn discard_rest_of_line(&mut self) -> io::Result<()> {
        loop {
            let available = match self.reader.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                return Ok(());
            }
            match available.iter().position(|&b| b == b'\n') {
                Some(newline) => {
                    self.reader.consume(newline + 1);
                    return Ok(());
                }
                None => {
                    let len = available.len();
                    self.reader.consume(len);
                }
            }
        }
    }
}
