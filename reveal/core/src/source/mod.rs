//! Quote Sources
//!
//! Where quotes come from. A source returns a batch of candidates; the
//! sequencer picks one of them uniformly at random.

mod fixed;
mod http;
mod traits;

pub use fixed::FixedQuoteSource;
pub use http::HttpQuoteSource;
pub use traits::{FetchError, QuoteSource};

use rand::Rng;

use crate::quote::Quote;

/// Pick one candidate uniformly at random
///
/// # Errors
///
/// Returns [`FetchError::Empty`] when there is nothing to choose from.
pub fn choose_candidate<R: Rng + ?Sized>(
    mut candidates: Vec<Quote>,
    rng: &mut R,
) -> Result<Quote, FetchError> {
    if candidates.is_empty() {
        return Err(FetchError::Empty);
    }
    let index = rng.gen_range(0..candidates.len());
    Ok(candidates.swap_remove(index))
}
