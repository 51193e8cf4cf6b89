/// Mulberry32: a tiny 32-bit PRNG with bit-identical output on every platform.
///
/// Instances are constructed fresh from an explicit seed wherever randomness is needed
/// (stagger shuffles, pause sampling); nothing shares generator state.
#[derive(Clone, Copy, Debug)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    /// Create a generator from `seed`.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next raw 32-bit output.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let a = self.state;
        let mut t = (a ^ (a >> 15)).wrapping_mul(a | 1);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61)) ^ t;
        t ^ (t >> 14)
    }

    /// Uniform sample in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }

    /// Uniform index in `[0, n)`. `n` must be non-zero.
    pub fn next_index(&mut self, n: usize) -> usize {
        ((self.next_f64() * n as f64).floor() as usize).min(n - 1)
    }

    /// Standard normal sample via Box-Muller (consumes two uniforms).
    pub fn next_gaussian(&mut self) -> f64 {
        // 1 - u keeps the log argument in (0, 1].
        let u1 = 1.0 - self.next_f64();
        let u2 = self.next_f64();
        (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }
}

/// Deterministic Fisher-Yates permutation of `0..n`.
pub(crate) fn shuffled_indices(n: usize, seed: u32) -> Vec<usize> {
    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = Mulberry32::new(seed);
    for i in (1..n).rev() {
        let j = rng.next_index(i + 1);
        order.swap(i, j);
    }
    order
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/rng.rs"]
mod tests;
