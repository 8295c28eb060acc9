use std::io::BufRead;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use crate::cache::AccessKind;

lazy_static! {
    static ref TRACE_LINE: Regex = Regex::new(
        r"^\s*(?P<kind>[rRwW01])\s+(?:0[xX])?(?P<address>[0-9a-fA-F]{1,8})\s+(?P<length>[0-9]+)\s*$"
    ).unwrap();
}

/// A single memory access from a trace
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    pub kind: AccessKind,
    pub address: u32,
    pub length: u32,
}

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("couldn't read the trace: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed trace line {line}: `{content}`")]
    Malformed { line: usize, content: String },
}

/// Parses one trace line. Blank lines and `#` comments give `None`
///
/// `line_number` is only used to report a malformed line
///
/// # Examples
///
/// ```
/// use cachelib::cache::AccessKind;
/// use cachelib::trace::parse_line;
/// let event = parse_line(1, "w 0x7ff0001c 4").unwrap().unwrap();
/// assert_eq!((event.kind, event.address, event.length), (AccessKind::Write, 0x7ff0_001c, 4));
/// assert!(parse_line(2, "# comment").unwrap().is_none());
/// ```
pub fn parse_line(line_number: usize, line: &str) -> Result<Option<TraceEvent>, TraceError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let malformed = || TraceError::Malformed { line: line_number, content: trimmed.to_string() };
    let captures = TRACE_LINE.captures(trimmed).ok_or_else(malformed)?;
    let kind = match &captures["kind"] {
        "r" | "R" => AccessKind::Read,
        "w" | "W" => AccessKind::Write,
        numeric => numeric.parse::<u32>().ok().and_then(|v| AccessKind::try_from(v).ok()).ok_or_else(malformed)?,
    };
    // The pattern already limits the address to 8 hex digits
    let address = u32::from_str_radix(&captures["address"], 16).map_err(|_| malformed())?;
    let length = captures["length"].parse::<u32>().map_err(|_| malformed())?;
    Ok(Some(TraceEvent { kind, address, length }))
}

/// Iterates over the events of a textual trace, one `<kind> <address> <length>` per line
pub struct TraceReader<B: BufRead> {
    reader: B,
    line_number: usize,
    buffer: Vec<u8>,
}

impl<B: BufRead> TraceReader<B> {
    pub fn new(reader: B) -> Self {
        Self {
            reader,
            line_number: 0,
            buffer: Vec::new(),
        }
    }
}

impl<B: BufRead> Iterator for TraceReader<B> {
    type Item = Result<TraceEvent, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buffer.clear();
            match self.reader.read_until(b'\n', &mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line_number += 1;
            let line = match std::str::from_utf8(&self.buffer) {
                Ok(line) => line,
                Err(_) => return Some(Err(TraceError::Malformed {
                    line: self.line_number,
                    content: String::from_utf8_lossy(&self.buffer).trim().to_string(),
                })),
            };
            match parse_line(self.line_number, line) {
                Ok(Some(event)) => return Some(Ok(event)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
