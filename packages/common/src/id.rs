use std::collections::HashSet;

use crc32fast::Hasher;

/// Derive a stable session seed from a content path using CRC32
pub fn content_seed(path: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(path.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator for blocks and repeater items within a session
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String, // Content path hash (CRC32)
    count: u32,   // Sequential counter
}

impl IdGenerator {
    pub fn new(content_path: &str) -> Self {
        Self {
            seed: content_seed(content_path),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential ID with the given prefix ("block", "item")
    pub fn next_id(&mut self, prefix: &str) -> String {
        self.count += 1;
        format!("{}-{}-{}", prefix, self.seed, self.count)
    }

    /// Generate an ID that does not collide with any ID in `taken`.
    ///
    /// Loaded content may already carry IDs minted by earlier sessions, so
    /// sequential generation alone cannot guarantee uniqueness among
    /// siblings.
    pub fn fresh_id<'a, I>(&mut self, prefix: &str, taken: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        let taken: HashSet<&str> = taken.into_iter().collect();
        loop {
            let id = self.next_id(prefix);
            if !taken.contains(id.as_str()) {
                return id;
            }
        }
    }

    /// Get the session seed
    pub fn seed(&self) -> &str {
        &self.seed
    }
}
