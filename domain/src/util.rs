//! Shared utility functions.

use rand::seq::SliceRandom;

/// Uniformly pick one item. `None` on an empty slice.
pub fn choose_uniform<T: Clone>(items: &[T]) -> Option<T> {
    items.choose(&mut rand::thread_rng()).cloned()
}

/// Uniformly sample `count` distinct items, in arbitrary order.
///
/// Returns fewer than `count` items when the slice is shorter than that.
pub fn sample_uniform<T: Clone>(items: &[T], count: usize) -> Vec<T> {
    items
        .choose_multiple(&mut rand::thread_rng(), count)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choose_uniform_empty() {
        let items: Vec<u32> = vec![];
        assert_eq!(choose_uniform(&items), None);
    }

    #[test]
    fn test_choose_uniform_member() {
        let items = vec![1, 2, 3];
        let picked = choose_uniform(&items).unwrap();
        assert!(items.contains(&picked));
    }

    #[test]
    fn test_choose_uniform_single() {
        assert_eq!(choose_uniform(&["only"]), Some("only"));
    }

    #[test]
    fn test_sample_uniform_distinct() {
        let items = vec![1, 2, 3, 4, 5];
        let mut sample = sample_uniform(&items, 3);
        sample.sort();
        sample.dedup();
        assert_eq!(sample.len(), 3);
        assert!(sample.iter().all(|s| items.contains(s)));
    }

    #[test]
    fn test_sample_uniform_short_slice() {
        let items = vec![1, 2];
        assert_eq!(sample_uniform(&items, 5).len(), 2);
    }
}
