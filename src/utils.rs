use num_format::{Locale, ToFormattedString};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Reproducible generator for one run.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// A seed drawn from OS entropy.
pub fn fresh_seed() -> u64 {
    rand::random()
}

/// `true` with probability `p`. `p` must lie in [0, 1].
#[inline]
pub fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.gen_bool(p)
}

#[inline]
pub fn rand_byte<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen()
}

pub fn fmt_count(n: u64) -> String {
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = seeded_rng(7);
        let mut b = seeded_rng(7);
        let xs: Vec<u8> = (0..32).map(|_| rand_byte(&mut a)).collect();
        let ys: Vec<u8> = (0..32).map(|_| rand_byte(&mut b)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn chance_extremes() {
        let mut rng = seeded_rng(1);
        assert!((0..100).all(|_| chance(&mut rng, 1.0)));
        assert!((0..100).all(|_| !chance(&mut rng, 0.0)));
    }

    #[test]
    fn formats_with_separators() {
        assert_eq!(fmt_count(1_000_000), "1,000,000");
    }
}
