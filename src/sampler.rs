//! Stateless sampling and batching helpers.

use rand::seq::SliceRandom;
use rand::Rng;
use std::future::Future;

/// Draw up to `n` elements from `items` without replacement.
///
/// Returns fewer than `n` elements when the input is smaller; a partial
/// result is valid, not an error. The input is never mutated and the output
/// carries no order guarantee.
pub fn pick_unique<T, R>(rng: &mut R, items: &[T], n: usize) -> Vec<T>
where
    T: Clone,
    R: Rng + ?Sized,
{
    items.choose_multiple(rng, n).cloned().collect()
}

/// Run `action` over consecutive chunks of at most `size` items.
///
/// Chunks are awaited strictly one at a time so the destination never sees
/// more than one outstanding write, and the first failing chunk halts the
/// remainder.
pub async fn for_each_chunk<T, F, Fut, E>(
    items: Vec<T>,
    size: usize,
    mut action: F,
) -> Result<(), E>
where
    F: FnMut(Vec<T>) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    let size = size.max(1);
    let mut remaining = items;
    while !remaining.is_empty() {
        let rest = remaining.split_off(size.min(remaining.len()));
        action(remaining).await?;
        remaining = rest;
    }
    Ok(())
}
