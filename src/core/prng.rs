// Minimal PRNG (no external crates).
//
// This is NOT cryptographically secure.
// It only produces the illustrative "random" vectors and token ids. A fixed
// seed keeps every panel reproducible between runs.

#[derive(Debug, Clone)]
pub struct Prng {
    state: u64,
}

impl Prng {
    pub fn new(seed: u64) -> Self {
        // Avoid a zero state.
        let seed = if seed == 0 { 0x9E3779B97F4A7C15 } else { seed };
        Self { state: seed }
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        // xorshift64*
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    #[inline]
    pub fn next_f32_01(&mut self) -> f32 {
        // Convert to [0,1).
        let x = self.next_u32();
        (x as f32) / (u32::MAX as f32 + 1.0)
    }

    #[inline]
    pub fn gen_range_f32(&mut self, low: f32, high: f32) -> f32 {
        low + (high - low) * self.next_f32_01()
    }

    #[inline]
    pub fn gen_range_u32(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        low + self.next_u32() % (high - low)
    }

    /// `len` values drawn from `[low, high)`, rounded for display.
    pub fn vector(&mut self, len: usize, low: f32, high: f32, decimals: u32) -> Vec<f32> {
        (0..len)
            .map(|_| round_to(self.gen_range_f32(low, high), decimals))
            .map(|v| v.clamp(low, high))
            .collect()
    }
}

/// Round to a fixed number of decimal places.
pub fn round_to(v: f32, decimals: u32) -> f32 {
    let scale = 10f32.powi(decimals as i32);
    (v * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = Prng::new(7);
        let mut b = Prng::new(7);
        for _ in 0..32 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn zero_seed_is_not_stuck() {
        let mut p = Prng::new(0);
        let first = p.next_u32();
        let second = p.next_u32();
        assert_ne!(first, second);
    }

    #[test]
    fn vector_stays_in_range() {
        let mut p = Prng::new(42);
        let v = p.vector(50, -1.0, 1.0, 3);
        assert_eq!(v.len(), 50);
        for x in v {
            assert!((-1.0..=1.0).contains(&x));
            assert!((x * 1000.0 - (x * 1000.0).round()).abs() < 1e-3);
        }
    }

    #[test]
    fn gen_range_u32_bounds() {
        let mut p = Prng::new(3);
        for _ in 0..200 {
            let id = p.gen_range_u32(0, 5000);
            assert!(id < 5000);
        }
        assert_eq!(p.gen_range_u32(9, 9), 9);
    }
}
