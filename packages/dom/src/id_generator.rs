use crc32fast::Hasher;

/// Generate a stable surface ID from its name using CRC32
pub fn get_surface_id(name: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(name.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator for nodes within a surface
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String, // Surface ID (CRC32)
    count: u32,   // Sequential counter
}

impl IdGenerator {
    pub fn new(name: &str) -> Self {
        Self {
            seed: get_surface_id(name),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    /// Get surface ID seed
    pub fn seed(&self) -> &str {
        &self.seed
    }
}
