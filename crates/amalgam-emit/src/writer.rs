//! Amalgamation stream writer
//!
//! Drains the emission queues into the header and source sinks. Each file
//! is wrapped in begin/end markers and its include directives are dropped.

use amalgam_core::{EmissionQueues, Error, FileCategory, Result};
use amalgam_scan::{source_lines, IncludeMatcher};
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Writes queued files into a header sink and a source sink
pub struct AmalgamationWriter<H: Write, S: Write> {
    header: H,
    source: S,
    matcher: IncludeMatcher,
    headers_written: usize,
    sources_written: usize,
}

impl<H: Write, S: Write> AmalgamationWriter<H, S> {
    /// Create a writer; the source sink is seeded with an include of the header output
    pub fn new(header: H, mut source: S, header_name: &str) -> Result<Self> {
        writeln!(source, "#include\"{}\"", header_name)?;

        Ok(Self {
            header,
            source,
            matcher: IncludeMatcher::new(),
            headers_written: 0,
            sources_written: 0,
        })
    }

    /// Write all headers, then all sources, in queue order
    pub fn write_queues(&mut self, queues: &EmissionQueues) -> Result<()> {
        for category in [FileCategory::Header, FileCategory::Source] {
            for path in queues.queue(category) {
                self.write_file(category, path)?;
            }
        }
        Ok(())
    }

    /// Append one file to the sink for `category`
    pub fn write_file(&mut self, category: FileCategory, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Write file: {}", path.display());

        let (stream, count) = match category {
            FileCategory::Header => (&mut self.header as &mut dyn Write, &mut self.headers_written),
            FileCategory::Source => (&mut self.source as &mut dyn Write, &mut self.sources_written),
        };
        write_wrapped(stream, &self.matcher, path, &content)?;
        *count += 1;
        Ok(())
    }

    pub fn headers_written(&self) -> usize {
        self.headers_written
    }

    pub fn sources_written(&self) -> usize {
        self.sources_written
    }

    /// Flush both sinks and hand them back
    pub fn finish(mut self) -> Result<(H, S)> {
        self.header.flush()?;
        self.source.flush()?;
        Ok((self.header, self.source))
    }
}

fn write_wrapped(
    stream: &mut dyn Write,
    matcher: &IncludeMatcher,
    path: &Path,
    content: &str,
) -> std::io::Result<()> {
    write!(stream, "//Begin File: {}\n\n", path.display())?;

    for line in source_lines(content) {
        if matcher.is_include(line) {
            continue;
        }
        stream.write_all(line.as_bytes())?;
    }

    write!(stream, "\n\n\n//End File: {}\n\n\n", path.display())
}
