//! # Consecutive — Sliding-Window Consecutive-Prime Sums
//!
//! Finds every contiguous run of an ascending prime sequence whose elements sum
//! to a target value.
//!
//! ## Algorithm
//!
//! For each window length L in [min_len, min(max_len, n)], the window sum is
//! initialized from the first L primes and then slid one position at a time:
//! subtract the prime leaving on the left, add the prime entering on the right.
//! That is O(n) per length instead of O(n·L) for resumming each window.
//!
//! Two early exits rely on the input being **strictly ascending and positive**
//! (which `sieve::generate_primes` guarantees):
//!
//! - Within a length, once the window sum exceeds the target every later
//!   window of the same length is larger, so the scan stops.
//! - If the first window of length L already exceeds the target, the first
//!   window of length L + 1 is larger still, so no longer length can match.
//!
//! Generalizing this to signed or unsorted input requires dropping both exits
//! and scanning every window.

use std::cmp::Ordering;

/// A contiguous slice of a prime sequence, by start index and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsecutiveRun {
    pub start: usize,
    pub len: usize,
}

impl ConsecutiveRun {
    /// The primes this run covers. Panics if the run lies outside `primes`.
    pub fn primes<'a>(&self, primes: &'a [u64]) -> &'a [u64] {
        &primes[self.start..self.start + self.len]
    }

    pub fn sum(&self, primes: &[u64]) -> u64 {
        self.primes(primes).iter().sum()
    }
}

/// Find every run of `primes` with length in [min_len, max_len] summing to `target`.
///
/// Runs are returned by ascending length, then ascending start index. A
/// `min_len` of 0 behaves as 1: an empty window sums to 0, which never equals a
/// prime target. Sums that overflow `u64` are treated as exceeding the target.
pub fn find_consecutive_sums(
    primes: &[u64],
    target: u64,
    min_len: usize,
    max_len: usize,
) -> Vec<ConsecutiveRun> {
    debug_assert!(
        primes.windows(2).all(|w| w[0] < w[1]),
        "consecutive sum search requires a strictly ascending sequence"
    );

    let n = primes.len();
    let min_len = min_len.max(1);
    let max_len = max_len.min(n);
    let mut runs = Vec::new();

    for len in min_len..=max_len {
        let mut sum = match primes[..len]
            .iter()
            .try_fold(0u64, |acc, &p| acc.checked_add(p))
        {
            Some(s) if s <= target => s,
            // Shortest window of this length already too large; longer lengths only grow.
            _ => break,
        };

        for start in 0..=n - len {
            if start > 0 {
                // The outgoing prime is part of `sum`, so the subtraction cannot underflow.
                match (sum - primes[start - 1]).checked_add(primes[start + len - 1]) {
                    Some(s) => sum = s,
                    None => break,
                }
            }
            match sum.cmp(&target) {
                Ordering::Equal => runs.push(ConsecutiveRun { start, len }),
                Ordering::Greater => break,
                Ordering::Less => {}
            }
        }
    }

    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn materialize(primes: &[u64], runs: &[ConsecutiveRun]) -> Vec<Vec<u64>> {
        runs.iter().map(|r| r.primes(primes).to_vec()).collect()
    }

    #[test]
    fn finds_run_summing_to_ten() {
        let primes = [2, 3, 5, 7, 11, 13];
        let runs = find_consecutive_sums(&primes, 10, 1, 6);
        // 3 + 7 = 10 as well, but 3 and 7 are not adjacent (5 sits between them).
        assert_eq!(materialize(&primes, &runs), vec![vec![2, 3, 5]]);
    }

    #[test]
    fn single_prime_is_a_length_one_run() {
        let primes = [2, 3, 5, 7, 11, 13];
        let runs = find_consecutive_sums(&primes, 11, 1, 1);
        assert_eq!(runs, vec![ConsecutiveRun { start: 4, len: 1 }]);
    }

    /// 41 = 11 + 13 + 17 = 2 + 3 + 5 + 7 + 11 + 13. Results come out by
    /// ascending length, so the three-term run precedes the six-term one.
    #[test]
    fn multiple_runs_ordered_by_length() {
        let primes = crate::sieve::generate_primes(2, 50);
        let runs = find_consecutive_sums(&primes, 41, 2, 6);
        assert_eq!(
            materialize(&primes, &runs),
            vec![vec![11, 13, 17], vec![2, 3, 5, 7, 11, 13]]
        );
    }

    /// Length 1 yields the target itself; lengths 4 to 6 are excluded here.
    #[test]
    fn allowed_lengths_bound_the_runs() {
        let primes = crate::sieve::generate_primes(2, 50);
        let runs = find_consecutive_sums(&primes, 41, 1, 3);
        assert_eq!(materialize(&primes, &runs), vec![vec![41], vec![11, 13, 17]]);
    }

    #[test]
    fn min_len_above_sequence_length_is_empty() {
        let primes = [2, 3, 5];
        assert!(find_consecutive_sums(&primes, 5, 4, 10).is_empty());
    }

    #[test]
    fn empty_sequence_is_empty() {
        assert!(find_consecutive_sums(&[], 5, 1, 10).is_empty());
    }

    #[test]
    fn inverted_length_range_is_empty() {
        let primes = [2, 3, 5, 7];
        assert!(find_consecutive_sums(&primes, 5, 3, 2).is_empty());
    }

    #[test]
    fn min_len_zero_behaves_as_one() {
        let primes = [2, 3, 5, 7];
        assert_eq!(
            find_consecutive_sums(&primes, 5, 0, 2),
            find_consecutive_sums(&primes, 5, 1, 2)
        );
    }

    #[test]
    fn max_len_is_clamped_to_sequence_length() {
        let primes = [2, 3, 5, 7];
        let runs = find_consecutive_sums(&primes, 17, 1, 1_000);
        assert_eq!(runs, vec![ConsecutiveRun { start: 0, len: 4 }]);
    }

    #[test]
    fn target_smaller_than_every_prime_is_empty() {
        let primes = [3, 5, 7];
        assert!(find_consecutive_sums(&primes, 2, 1, 3).is_empty());
    }

    #[test]
    fn run_at_end_of_sequence_is_found() {
        let primes = [2, 3, 5, 7, 11, 13];
        let runs = find_consecutive_sums(&primes, 24, 2, 2);
        assert_eq!(runs, vec![ConsecutiveRun { start: 4, len: 2 }]);
        assert_eq!(runs[0].sum(&primes), 24);
    }

    #[test]
    fn overflowing_sums_are_treated_as_too_large() {
        let big = u64::MAX - 58; // largest prime below 2^64
        let primes = [big - 28, big];
        let runs = find_consecutive_sums(&primes, big, 1, 2);
        assert_eq!(runs, vec![ConsecutiveRun { start: 1, len: 1 }]);
    }

    #[test]
    fn input_sequence_is_not_mutated() {
        let primes = vec![2, 3, 5, 7, 11];
        let before = primes.clone();
        let _ = find_consecutive_sums(&primes, 10, 1, 5);
        assert_eq!(primes, before);
    }
}
