use std::io::{self, BufRead, Read};

use crate::error::{Result, ShellError};

/// Reads one line at a time, refusing lines longer than `limit` bytes.
pub struct LineReader<R> {
	inner: R,
	limit: usize,
}

impl<R: BufRead> LineReader<R> {
	pub fn new(inner: R, limit: usize) -> LineReader<R> {
		LineReader { inner: inner, limit: limit }
	}

	fn discard_line(&mut self) -> io::Result<()> {
		loop {
			let (done, used) = {
				let buf = self.inner.fill_buf()?;
				if buf.is_empty() {
					return Ok(());
				}
				match buf.iter().position(|&c| c == b'\n') {
					Some(i) => (true, i + 1),
					None => (false, buf.len()),
				}
			};
			self.inner.consume(used);
			if done {
				return Ok(());
			}
		}
	}

	pub fn read_line(&mut self) -> Result<Option<String>> {
		let mut line = Vec::new();
		let limit = self.limit as u64;
		let n = (&mut self.inner).take(limit + 1).read_until(b'\n', &mut line)?;
		if n == 0 {
			return Ok(None);
		}
		if line.last() == Some(&b'\n') {
			line.pop();
		} else if n as u64 > limit {
			self.discard_line()?;
			return Err(ShellError::LineTooLong { limit: self.limit });
		}
		Ok(Some(String::from_utf8_lossy(&line).into_owned()))
	}
}
