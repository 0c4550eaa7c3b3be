//! Item batching for bulk CRUD operations.

/// Splits `items` into `ceil(N / limit)` ordered batches of at most
/// `limit` items. Concatenating the batches in order reproduces the input
/// exactly; an empty input yields no batches.
pub fn chunk_items<T>(items: Vec<T>, limit: usize) -> Vec<Vec<T>> {
    let limit = limit.max(1);
    let mut chunks = Vec::with_capacity(items.len().div_ceil(limit));
    let mut iter = items.into_iter();
    loop {
        let chunk: Vec<T> = iter.by_ref().take(limit).collect();
        if chunk.is_empty() {
            return chunks;
        }
        chunks.push(chunk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_count_is_ceil() {
        assert_eq!(1, chunk_items((0..10).collect(), 10).len());
        assert_eq!(2, chunk_items((0..11).collect(), 10).len());
        assert_eq!(4, chunk_items((0..10).collect(), 3).len());
        assert!(chunk_items(Vec::<i32>::new(), 10).is_empty());
    }

    #[test]
    fn test_chunks_preserve_order() {
        let chunks = chunk_items((0..10).collect::<Vec<_>>(), 4);
        assert_eq!(vec![vec![0, 1, 2, 3], vec![4, 5, 6, 7], vec![8, 9]], chunks);
        let rejoined: Vec<i32> = chunks.into_iter().flatten().collect();
        assert_eq!((0..10).collect::<Vec<_>>(), rejoined);
    }

    #[test]
    fn test_zero_limit_treated_as_one() {
        assert_eq!(3, chunk_items(vec![1, 2, 3], 0).len());
    }
}
