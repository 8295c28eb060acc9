/// One way of a set
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub valid: bool,
    pub tag: u32,
    /// Logical time of the last fill or hit
    pub last_access: u64,
}

/// A row of the cache, selected by the index bits of an address
#[derive(Debug, Clone)]
pub struct Set {
    lines: Vec<Line>,
    valid_lines: u32,
    round_robin: u32,
}

impl Set {
    pub fn new(ways: u32) -> Self {
        Self {
            lines: vec![Line::default(); ways as usize],
            valid_lines: 0,
            round_robin: 0,
        }
    }

    pub fn ways(&self) -> u32 {
        self.lines.len() as u32
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn valid_lines(&self) -> u32 {
        self.valid_lines
    }

    /// The next way to fill under round robin
    pub fn round_robin(&self) -> u32 {
        self.round_robin
    }

    pub fn is_full(&self) -> bool {
        self.valid_lines == self.ways()
    }

    /// Finds the way holding a valid copy of `tag`
    #[inline(always)]
    pub fn find(&self, tag: u32) -> Option<usize> {
        self.lines.iter().position(|line| line.valid && line.tag == tag)
    }

    /// Refreshes the timestamp of a way which was hit
    pub fn touch(&mut self, way: usize, time: u64) {
        self.lines[way].last_access = time;
    }

    /// Places a block in `way`, returning true if that displaced a block (the set was already full)
    ///
    /// The round robin cursor moves on after every fill, whichever policy picked the way
    pub fn fill(&mut self, way: usize, tag: u32, time: u64) -> bool {
        let was_full = self.is_full();
        self.lines[way] = Line { valid: true, tag, last_access: time };
        if !was_full {
            self.valid_lines += 1;
        }
        self.round_robin = (self.round_robin + 1) % self.ways();
        was_full
    }
}
