//! Deterministic random numbers for scenario simulation
//!
//! [`SimpleRng`] is a xorshift64 generator that plugs into the `rand`
//! ecosystem through [`rand::RngCore`], so `rand_distr` distributions can
//! sample from it. Same seed, same trajectory, on every platform.

/// Xorshift64 generator
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    /// Seed 0 would lock xorshift at zero forever, so it maps to 1
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    #[inline]
    fn step(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl rand::RngCore for SimpleRng {
    fn next_u32(&mut self) -> u32 {
        (self.step() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.step()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, RngCore};
    use rand_distr::{Distribution, StandardNormal};

    #[test]
    fn test_seed_zero() {
        let mut rng = SimpleRng::new(0);
        assert_eq!(rng.state, 1);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn test_xorshift_sequence() {
        let mut rng = SimpleRng::new(42);
        rng.next_u64();
        assert_eq!(rng.state, 45454805674);
        rng.next_u64();
        assert_eq!(rng.state, 11532217803599905471_u64);
    }

    #[test]
    fn test_deterministic() {
        let mut a = SimpleRng::new(42);
        let mut b = SimpleRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_uniform_range() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..1000 {
            let v: f64 = rng.gen();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_fill_bytes_partial_chunk() {
        let mut a = SimpleRng::new(9);
        let mut b = SimpleRng::new(9);
        let mut bytes = [0u8; 11];
        a.fill_bytes(&mut bytes);

        let first = b.next_u64().to_le_bytes();
        let second = b.next_u64().to_le_bytes();
        assert_eq!(&bytes[..8], &first);
        assert_eq!(&bytes[8..], &second[..3]);
    }

    #[test]
    fn test_standard_normal_moments() {
        let mut rng = SimpleRng::new(42);
        let n = 20_000;
        let samples: Vec<f64> = (0..n).map(|_| StandardNormal.sample(&mut rng)).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>() / n as f64;
        assert!(mean.abs() < 0.05, "mean {mean}");
        assert!((var - 1.0).abs() < 0.05, "variance {var}");
    }

    #[test]
    fn test_gen_bool_edges() {
        let mut rng = SimpleRng::new(3);
        for _ in 0..100 {
            assert!(!rng.gen_bool(0.0));
            assert!(rng.gen_bool(1.0));
        }
    }
}
