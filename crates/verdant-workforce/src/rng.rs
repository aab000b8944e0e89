//! Seeded, stream-keyed random number generation.
//!
//! A stream is identified by `(seed, stream_id)`. The pair is hashed with an
//! xmur3-style avalanche over the UTF-16 code units of `"<seed>:<stream_id>"`
//! and the result seeds a mulberry32 counter generator. Each [`RngStream`]
//! owns its state; two streams never share anything, so the order in which
//! subsystems draw numbers cannot leak between them.
//!
//! Stream ids must be built from stable identifiers (structure ids, scan
//! counters, employee seeds), never from wall-clock time or iteration order.

use rand::RngCore;

/// `2^32` as a float, the divisor that maps a `u32` into `[0, 1)`.
const TWO_POW_32: f64 = 4_294_967_296.0;

/// A private, reproducible sequence of pseudo-random numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RngStream {
    state: u32,
}

/// Create the stream for `(seed, stream_id)`.
pub fn create_stream(seed: &str, stream_id: &str) -> RngStream {
    RngStream::new(seed, stream_id)
}

impl RngStream {
    /// Create the stream for `(seed, stream_id)`.
    pub fn new(seed: &str, stream_id: &str) -> Self {
        let key = format!("{seed}:{stream_id}");
        Self {
            state: xmur3(&key),
        }
    }

    /// Next raw 32-bit output of the generator.
    pub const fn next_raw(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let a = self.state;
        let mut t = (a ^ (a >> 15)).wrapping_mul(1 | a);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(61 | t)) ^ t;
        t ^ (t >> 14)
    }

    /// Next float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_raw()) / TWO_POW_32
    }

    /// Next float in `[min, max)`. Returns `min` when the range is empty.
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        (max - min).mul_add(self.next_f64(), min)
    }

    /// Next index in `0..len`. Returns 0 for an empty range.
    pub fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let index = (self.next_f64() * len as f64).floor() as usize;
        index.min(len.saturating_sub(1))
    }

    /// Pick an element of `items`, `None` when it is empty.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.next_index(items.len());
        items.get(index)
    }
}

impl RngCore for RngStream {
    fn next_u32(&mut self) -> u32 {
        self.next_raw()
    }

    fn next_u64(&mut self) -> u64 {
        let high = u64::from(self.next_raw());
        let low = u64::from(self.next_raw());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.next_raw().to_le_bytes();
            for (slot, byte) in chunk.iter_mut().zip(bytes) {
                *slot = byte;
            }
        }
    }
}

/// xmur3 string hash over UTF-16 code units, finalised once.
fn xmur3(key: &str) -> u32 {
    let units: Vec<u16> = key.encode_utf16().collect();
    #[allow(clippy::cast_possible_truncation)]
    let mut h: u32 = 1_779_033_703 ^ (units.len() as u32);
    for unit in units {
        h = (h ^ u32::from(unit)).wrapping_mul(3_432_918_353);
        h = h.rotate_left(13);
    }
    h = (h ^ (h >> 16)).wrapping_mul(2_246_822_507);
    h = (h ^ (h >> 13)).wrapping_mul(3_266_489_909);
    h ^ (h >> 16)
}
