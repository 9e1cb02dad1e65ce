/// Expand keyword-hit sentence indices into context windows and merge
/// them into non-overlapping spans.
///
/// Each hit becomes an inclusive `(start, end)` range of `hit - window`
/// to `hit + window`, clipped to `0..len`. Overlapping ranges always
/// merge; abutting ranges (`end + 1 == start`) merge only when
/// `join_adjacent` is set. A window greater than zero always implies
/// `join_adjacent`: context sentences would otherwise get split apart.
pub fn keyword_windows(
    hits: &[usize],
    window: usize,
    len: usize,
    join_adjacent: bool,
) -> Vec<(usize, usize)> {
    if len == 0 {
        return Vec::new();
    }
    let join = join_adjacent || window > 0;

    let mut spans: Vec<(usize, usize)> = hits
        .iter()
        .filter(|&&h| h < len)
        .map(|&h| (h.saturating_sub(window), (h + window).min(len - 1)))
        .collect();
    spans.sort_unstable();

    merge_spans(&spans, join)
}

/// Interval-merge over sorted inclusive spans
fn merge_spans(spans: &[(usize, usize)], join_adjacent: bool) -> Vec<(usize, usize)> {
    let mut merged: Vec<(usize, usize)> = Vec::new();
    for &(start, end) in spans {
        match merged.last_mut() {
            Some((_, last_end))
                if start <= *last_end || (join_adjacent && start == *last_end + 1) =>
            {
                *last_end = (*last_end).max(end);
            }
            _ => merged.push((start, end)),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_hit_window_clipped() {
        // 10 sentences, hit at index 4 (5th sentence), window 1 -> 3..=5
        assert_eq!(keyword_windows(&[4], 1, 10, true), vec![(3, 5)]);
        // Clipping at both bounds
        assert_eq!(keyword_windows(&[0], 2, 10, true), vec![(0, 2)]);
        assert_eq!(keyword_windows(&[9], 2, 10, true), vec![(7, 9)]);
    }

    #[test]
    fn test_far_hits_stay_separate() {
        // N far-apart hits with window W produce N spans
        assert_eq!(
            keyword_windows(&[1, 5, 9], 1, 12, true),
            vec![(0, 2), (4, 6), (8, 10)]
        );
    }

    #[test]
    fn test_overlapping_windows_merge() {
        // Hits 3 and 5 with window 1: 2..=4 and 4..=6 overlap -> union
        assert_eq!(keyword_windows(&[3, 5], 1, 10, false), vec![(2, 6)]);
    }

    #[test]
    fn test_adjacent_spans_join_only_when_asked() {
        // Window 0, hits 3 and 4: abutting spans
        assert_eq!(keyword_windows(&[3, 4], 0, 10, true), vec![(3, 4)]);
        assert_eq!(keyword_windows(&[3, 4], 0, 10, false), vec![(3, 3), (4, 4)]);
    }

    #[test]
    fn test_window_forces_join() {
        // join_adjacent=false is overridden by window > 0: 2..=4 and 5..=7 abut
        assert_eq!(keyword_windows(&[3, 6], 1, 10, false), vec![(2, 7)]);
    }

    #[test]
    fn test_out_of_range_hits_dropped() {
        assert_eq!(keyword_windows(&[11], 1, 10, true), Vec::<(usize, usize)>::new());
        assert!(keyword_windows(&[0], 1, 0, true).is_empty());
    }

    #[test]
    fn test_duplicate_hits_single_span() {
        // A sentence matching several keywords reports one index per keyword
        assert_eq!(keyword_windows(&[4, 4], 1, 10, true), vec![(3, 5)]);
    }
}
