//! Append-only HTML log linking every rendered dump.

use std::fmt;
use std::io::{self, Write};

use crate::domain::graph::LINE_END;

/// Running document with one heading and one image reference per dump.
pub struct VisualLog {
    sink: Box<dyn Write + Send>,
    entries: usize,
}

impl fmt::Debug for VisualLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisualLog")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl VisualLog {
    pub fn new(sink: Box<dyn Write + Send>) -> Self {
        Self { sink, entries: 0 }
    }

    /// Append the entry for dump `index` and flush it.
    ///
    /// The entry goes out in a single write; the count only advances once
    /// it is flushed.
    pub fn append(&mut self, index: usize, image_ref: &str) -> io::Result<()> {
        let entry =
            format!("<h2>Dump {index}</h2>{LINE_END}<img src = \"{image_ref}\">{LINE_END}");
        self.sink.write_all(entry.as_bytes())?;
        self.sink.flush()?;
        self.entries += 1;
        Ok(())
    }

    /// Entries written and flushed so far.
    pub fn entries(&self) -> usize {
        self.entries
    }

    pub fn close(mut self) -> io::Result<()> {
        self.sink.flush()
    }
}
