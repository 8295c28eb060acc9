use std::fs::File;
use std::io::BufRead;
use std::path::Path;
use crate::trace::TraceError;

/// Opens a trace file for sequential reading
///
/// On unix the file is memory mapped and the OS is told the reads are sequential, elsewhere it is
/// read through a large buffer
pub fn open_trace(path: impl AsRef<Path>) -> Result<impl BufRead, TraceError> {
    let file = File::open(path)?;
    #[cfg(not(unix))]
    {
        use std::io::BufReader;
        const BUFFER_SIZE: usize = 16 * 4096;
        Ok(BufReader::with_capacity(BUFFER_SIZE, file))
    }
    #[cfg(unix)]
    {
        use std::io::Cursor;
        use memmap2::{Advice, Mmap};
        // Safety: the trace is only read, and isn't expected to change underneath us
        let map = unsafe { Mmap::map(&file)? };
        map.advise(Advice::Sequential)?;
        Ok(Cursor::new(map))
    }
}
