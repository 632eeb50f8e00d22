//! Bucket-count selection for automatic rehashing.
//!
//! Known limitation: `is_probable_prime` only trial-divides by the odd
//! numbers 3 through 49, so any odd candidate whose smallest prime factor is
//! above 49 (2809 = 53 * 53 is the first) is accepted as prime. For spreading
//! hash codes over buckets this is good enough, and changing the bound
//! changes which bucket counts existing tables grow to.

use crate::config::MIN_BUCKET_COUNT;

/// Largest trial divisor used by `is_probable_prime`.
pub const PRIME_TRIAL_LIMIT: usize = 49;

/// Cheap primality heuristic for odd candidates.
pub fn is_probable_prime(odd: usize) -> bool {
    for d in (3..=PRIME_TRIAL_LIMIT).step_by(2) {
        if odd == d {
            return true;
        }
        if odd % d == 0 {
            return false;
        }
    }
    true
}

/// Bucket count that brings `len / buckets` close to `ideal_ratio`.
///
/// Truncates `len / ideal_ratio`, clamps it to `MIN_BUCKET_COUNT`, forces it
/// odd and then steps by two until `is_probable_prime` accepts it.
pub fn ideal_bucket_count(len: usize, ideal_ratio: f64) -> usize {
    let raw = (len as f64 / ideal_ratio) as usize;
    let mut n = if raw < MIN_BUCKET_COUNT {
        MIN_BUCKET_COUNT
    } else {
        raw | 1
    };
    while !is_probable_prime(n) {
        n += 2;
    }
    n
}
