use std::collections::{BTreeMap, HashMap};

const MINIMUM_LENGTH: usize = 3;
const MAXIMUM_BYTE_SIZE: usize = 20 * 1024 * 1024;

/// How a cached string was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// The raw UTF-8 bytes.
    Standalone,
    /// A varint of the byte length plus one, followed by the raw bytes.
    PrefixLengthVarintPlusOne,
}

impl Kind {
    fn index(self) -> usize {
        match self {
            Kind::Standalone => 0,
            Kind::PrefixLengthVarintPlusOne => 1,
        }
    }
}

/// The strings written so far by one encode call, along with the offsets they were written at.
pub struct Context {
    strings: [HashMap<String, usize>; 2],
    offsets: BTreeMap<usize, (String, Kind)>,
    byte_size: usize,
}

impl Context {
    pub fn new() -> Self {
        Context {
            strings: [HashMap::new(), HashMap::new()],
            offsets: BTreeMap::new(),
            byte_size: 0,
        }
    }

    pub fn find(&self, value: &str, kind: Kind) -> Option<usize> {
        self.strings[kind.index()].get(value).copied()
    }

    /// Records that `value` was written at `offset`.
    ///
    /// An entry that already exists is only moved forward.
    pub fn record(&mut self, value: &str, offset: usize, kind: Kind) {
        let len = value.len();
        if len < MINIMUM_LENGTH || len >= MAXIMUM_BYTE_SIZE {
            return;
        }

        if let Some(previous) = self.find(value, kind) {
            if offset > previous {
                let entry = self.offsets.remove(&previous);
                self.strings[kind.index()].insert(value.to_string(), offset);
                if let Some(entry) = entry {
                    if let Some((string, kind)) = self.offsets.insert(offset, entry) {
                        self.forget(&string, kind);
                    }
                }
            }
            return;
        }

        while !self.offsets.is_empty() && self.byte_size + len >= MAXIMUM_BYTE_SIZE {
            self.evict_oldest();
        }

        if let Some((string, kind)) = self.offsets.insert(offset, (value.to_string(), kind)) {
            self.forget(&string, kind);
        }
        self.strings[kind.index()].insert(value.to_string(), offset);
        self.byte_size += len;
    }

    fn evict_oldest(&mut self) {
        let oldest = match self.offsets.keys().next() {
            Some(oldest) => *oldest,
            None => return,
        };
        if let Some((string, kind)) = self.offsets.remove(&oldest) {
            self.forget(&string, kind);
        }
    }

    fn forget(&mut self, value: &str, kind: Kind) {
        if self.strings[kind.index()].remove(value).is_some() {
            self.byte_size -= value.len();
        }
    }

    #[cfg(test)]
    pub fn byte_size(&self) -> usize {
        self.byte_size
    }
}
