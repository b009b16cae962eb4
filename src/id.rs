//! Workout identifiers.
//!
//! Ids are formatted as grouped lowercase hex: `8-4-4-4-12`.

use chrono::Utc;
use uuid::Uuid;

pub trait IdGenerator {
    fn generate(&mut self) -> String;
}

/// Random v4 UUIDs. The default generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&mut self) -> String {
        Uuid::new_v4().hyphenated().to_string()
    }
}

/// Fallback for environments without a usable entropy source.
///
/// Combines a start timestamp with a monotonically increasing counter, so ids
/// are unique within one generator's lifetime.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    seed: u64,
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        let seed = Utc::now()
            .timestamp_nanos_opt()
            .map_or(0, i64::unsigned_abs);
        Self::with_seed(seed)
    }

    pub const fn with_seed(seed: u64) -> Self {
        Self { seed, next: 0 }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn generate(&mut self) -> String {
        let n = self.next;
        self.next = self.next.wrapping_add(1);
        let hi = self.seed;
        format!(
            "{:08x}-{:04x}-{:04x}-{:04x}-{:012x}",
            (hi >> 32) as u32,
            (hi >> 16) & 0xffff,
            hi & 0xffff,
            (n >> 48) & 0xffff,
            n & 0xffff_ffff_ffff
        )
    }
}

/// True when `s` has the `8-4-4-4-12` lowercase hex shape.
pub fn is_well_formed(s: &str) -> bool {
    let groups: Vec<&str> = s.split('-').collect();
    groups.len() == 5
        && groups
            .iter()
            .zip([8, 4, 4, 4, 12])
            .all(|(g, len)| g.len() == len && g.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')))
}
