//! Small arithmetic helpers for buffer layouts.

/// Rounds `value` up to the next multiple of `alignment` (a power of two).
pub(crate) fn align_up(value: usize, alignment: usize) -> Option<usize> {
    debug_assert!(alignment.is_power_of_two());
    value
        .checked_add(alignment - 1)
        .map(|v| v & !(alignment - 1))
}

/// Number of elements a strided layout touches: `(h-1)*stride + (w-1)*step + 1`.
pub(crate) fn strided_len(
    width: usize,
    height: usize,
    step: usize,
    stride: usize,
) -> Option<usize> {
    (height - 1)
        .checked_mul(stride)?
        .checked_add((width - 1).checked_mul(step)?)?
        .checked_add(1)
}

#[cfg(test)]
mod tests {
    use super::{align_up, strided_len};

    #[test]
    fn align_up_rounds_to_multiple() {
        assert_eq!(align_up(0, 64), Some(0));
        assert_eq!(align_up(1, 64), Some(64));
        assert_eq!(align_up(64, 64), Some(64));
        assert_eq!(align_up(65, 16), Some(80));
        assert_eq!(align_up(usize::MAX, 64), None);
    }

    #[test]
    fn strided_len_counts_last_sample() {
        assert_eq!(strided_len(4, 3, 1, 4), Some(12));
        assert_eq!(strided_len(4, 3, 3, 16), Some(42));
        assert_eq!(strided_len(1, 1, 1, 1), Some(1));
    }
}
