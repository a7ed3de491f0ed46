//! # Sieve — Prime Generation
//!
//! Produces the ordered prime sequence every search runs over. Two generators
//! with identical output are provided:
//!
//! 1. **Trial division** (`generate_primes`), the default. Each candidate n is
//!    tested against every divisor in [2, floor(sqrt(n))], O(sqrt(n)) per
//!    candidate. Adequate for the few-hundred-thousand ranges the service
//!    accepts by default.
//! 2. **Sieve of Eratosthenes** (`sieve_primes`), odd-only. O(n log log n)
//!    time and (n/2) bytes of memory, selectable via `[search] generator =
//!    "sieve"` for deployments that raise `limits.max_end`.
//!
//! Both return a strictly ascending `Vec<u64>` covering [max(2, lower), upper]
//! and an empty vector when the range is empty.

use serde::{Deserialize, Serialize};

/// Which prime generator a search uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PrimeGenerator {
    #[default]
    TrialDivision,
    Sieve,
}

impl PrimeGenerator {
    /// All primes in [max(2, lower), upper], ascending.
    pub fn generate(self, lower: u64, upper: u64) -> Vec<u64> {
        match self {
            PrimeGenerator::TrialDivision => generate_primes(lower, upper),
            PrimeGenerator::Sieve => sieve_primes(lower, upper),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PrimeGenerator::TrialDivision => "trial-division",
            PrimeGenerator::Sieve => "sieve",
        }
    }
}

impl std::fmt::Display for PrimeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Trial-division primality test.
///
/// `i <= n / i` is the overflow-free form of `i * i <= n`.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut i = 2u64;
    while i <= n / i {
        if n % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}

/// Generate all primes in [max(2, lower), upper] by trial division.
pub fn generate_primes(lower: u64, upper: u64) -> Vec<u64> {
    (lower.max(2)..=upper).filter(|&n| is_prime(n)).collect()
}

/// Generate all primes in [max(2, lower), upper] with an odd-only sieve.
///
/// Index i of the sieve represents the odd number 2i + 1, so index 0 (the
/// number 1) is cleared up front and 2 is emitted separately.
pub fn sieve_primes(lower: u64, upper: u64) -> Vec<u64> {
    let lower = lower.max(2);
    if upper < lower {
        return vec![];
    }

    let half = (upper as usize - 1) / 2 + 1;
    let mut is_odd_prime = vec![true; half];
    is_odd_prime[0] = false;

    let mut i = 1usize;
    loop {
        let p = 2 * i + 1;
        if p > upper as usize / p {
            break;
        }
        if is_odd_prime[i] {
            // Start crossing off at p^2; smaller odd multiples were crossed by smaller primes.
            let mut j = p * p / 2;
            while j < half {
                is_odd_prime[j] = false;
                j += p;
            }
        }
        i += 1;
    }

    let mut primes = Vec::with_capacity(estimate_prime_count(upper));
    if lower <= 2 {
        primes.push(2);
    }
    let first = (lower as usize / 2).max(1);
    primes.extend(
        (first..half)
            .filter(|&idx| is_odd_prime[idx])
            .map(|idx| (2 * idx + 1) as u64)
            .filter(|&n| n >= lower),
    );
    primes
}

/// Upper-biased estimate of pi(n) for pre-allocation (Rosser–Schoenfeld bound).
fn estimate_prime_count(n: u64) -> usize {
    if n < 17 {
        return 7;
    }
    let nf = n as f64;
    (1.26 * nf / nf.ln()) as usize
}
