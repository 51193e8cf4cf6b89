use xxhash_rust::xxh3::Xxh3;

use crate::resolve::timeline::{EntryKind, ResolvedTimeline};

const XXH3_SEED: u64 = 0x6c1d_2f0a_93e4_b857;

/// 128-bit content hash of a resolved timeline.
///
/// Floats are hashed by bit pattern, so two timelines share a fingerprint only when they
/// are byte-identical.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct TimelineFingerprint {
    /// High 64 bits.
    pub hi: u64,
    /// Low 64 bits.
    pub lo: u64,
}

impl std::fmt::Display for TimelineFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

pub(crate) fn fingerprint_timeline(tl: &ResolvedTimeline) -> TimelineFingerprint {
    let mut h = StableHasher::new();
    h.write_u32(tl.fps().num);
    h.write_u32(tl.fps().den);
    h.write_u32(tl.seed());
    h.write_u32(tl.entries().len() as u32);
    for e in tl.entries() {
        h.write_u8(match e.kind {
            EntryKind::Scene => 0,
            EntryKind::Cue => 1,
            EntryKind::Mark => 2,
            EntryKind::Transition => 3,
        });
        h.write_str(&e.id);
        h.write_f64(e.start_sec);
        h.write_f64(e.end_sec);
        match &e.parent {
            Some(p) => {
                h.write_bool(true);
                h.write_str(p);
            }
            None => h.write_bool(false),
        }
    }
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    // Length prefix keeps ("ab", "c") and ("a", "bc") apart.
    fn write_str(&mut self, s: &str) {
        self.write_u64(s.len() as u64);
        self.write_bytes(s.as_bytes());
    }

    fn finish(self) -> TimelineFingerprint {
        let v = self.inner.digest128();
        TimelineFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/fingerprint.rs"]
mod tests;
