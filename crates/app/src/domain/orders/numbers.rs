//! Order numbers
//!
//! Human readable order numbers look like `ORD-20260301-7KQ2M9XA`: the UTC
//! date followed by eight random upper-case alphanumerics. Uniqueness is
//! enforced by the database; callers retry on collision.

use jiff::Timestamp;
use mockall::automock;
use rand::{Rng, distributions::Uniform};

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const SUFFIX_LEN: usize = 8;

/// Insert attempts before giving up on a unique order number.
pub const MAX_ORDER_NUMBER_ATTEMPTS: usize = 5;

#[automock]
pub trait OrderNumberGenerator: Send + Sync {
    /// Produce a candidate order number for an order placed at `at`.
    fn generate(&self, at: Timestamp) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomOrderNumbers;

impl OrderNumberGenerator for RandomOrderNumbers {
    fn generate(&self, at: Timestamp) -> String {
        let indices = Uniform::new(0, ALPHABET.len());

        let suffix: String = rand::thread_rng()
            .sample_iter(indices)
            .take(SUFFIX_LEN)
            .filter_map(|index| ALPHABET.get(index).copied().map(char::from))
            .collect();

        format!("ORD-{}-{suffix}", at.strftime("%Y%m%d"))
    }
}
