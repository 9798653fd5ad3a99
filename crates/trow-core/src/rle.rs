//! Run-length-encoded attribute storage.
//!
//! ## Design
//!
//! Terminal rows usually carry very few distinct attributes (a prompt color,
//! a text color, maybe a highlight), so per-column storage is wasteful. The
//! container stores `(value, length)` runs whose lengths sum to the row
//! width. A single run — the overwhelmingly common case after a reset — is
//! stored inline without a heap allocation.
//!
//! The container is kept in canonical form: no run is empty and no two
//! adjacent runs hold equal values. Every mutating operation restores this.

use smallvec::SmallVec;

/// One run: `length` consecutive positions holding `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run<T> {
    /// The value shared by every position in the run.
    pub value: T,
    /// Number of positions covered. Always greater than zero.
    pub length: u16,
}

/// A run-length-encoded sequence of values.
///
/// Total length is tracked explicitly so callers never have to sum runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rle<T> {
    runs: SmallVec<[Run<T>; 1]>,
    total: u16,
}

impl<T: Copy + Eq> Rle<T> {
    /// Create a sequence of `length` positions all holding `value`.
    ///
    /// A zero `length` produces an empty sequence.
    #[must_use]
    pub fn new(length: u16, value: T) -> Self {
        let mut runs = SmallVec::new();
        if length > 0 {
            runs.push(Run { value, length });
        }
        Self {
            runs,
            total: length,
        }
    }

    /// Total number of positions covered.
    #[must_use]
    #[inline]
    pub fn len(&self) -> u16 {
        self.total
    }

    /// Check if the sequence covers no positions.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of runs.
    #[must_use]
    #[inline]
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// The runs, in order.
    #[must_use]
    #[inline]
    pub fn runs(&self) -> &[Run<T>] {
        &self.runs
    }

    /// Get the value at `pos`, or `None` past the end.
    ///
    /// Linear in the number of runs, which is small in practice.
    #[must_use]
    pub fn at(&self, pos: u16) -> Option<T> {
        if pos >= self.total {
            return None;
        }
        let mut cursor = 0u16;
        for run in &self.runs {
            cursor += run.length;
            if pos < cursor {
                return Some(run.value);
            }
        }
        None
    }

    /// Append `length` positions of `value`, coalescing with the last run.
    pub fn extend_with(&mut self, value: T, length: u16) {
        if length == 0 {
            return;
        }
        push_coalesced(&mut self.runs, value, length);
        self.total += length;
    }

    /// Overwrite positions `[begin, end)` with `value`.
    ///
    /// `end` is clamped to the total length; a degenerate range is a no-op.
    /// Adjacent equal runs are merged.
    pub fn replace(&mut self, begin: u16, end: u16, value: T) {
        let end = end.min(self.total);
        if begin >= end {
            return;
        }

        let mut out: SmallVec<[Run<T>; 1]> = SmallVec::new();
        let mut pos = 0u16;
        let mut inserted = false;
        for run in self.runs.drain(..) {
            let run_end = pos + run.length;
            if run_end <= begin || pos >= end {
                push_coalesced(&mut out, run.value, run.length);
            } else {
                if pos < begin {
                    push_coalesced(&mut out, run.value, begin - pos);
                }
                if !inserted {
                    push_coalesced(&mut out, value, end - begin);
                    inserted = true;
                }
                if run_end > end {
                    push_coalesced(&mut out, run.value, run_end - end);
                }
            }
            pos = run_end;
        }
        self.runs = out;
    }

    /// Rewrite every run holding `old` to hold `new` instead.
    ///
    /// Run lengths are unchanged; neighbors that become equal are merged to
    /// restore canonical form.
    pub fn replace_values(&mut self, old: T, new: T) {
        let mut changed = false;
        for run in &mut self.runs {
            if run.value == old {
                run.value = new;
                changed = true;
            }
        }
        if changed {
            self.coalesce();
        }
    }

    /// Grow or shrink the sequence to `new_total` positions.
    ///
    /// Growth extends the last run; shrinking truncates runs from the end,
    /// dropping any that fall entirely past the new length.
    pub fn resize_trailing_extent(&mut self, new_total: u16) {
        if new_total == self.total {
            return;
        }
        if new_total > self.total {
            let grown = new_total - self.total;
            match self.runs.last_mut() {
                Some(last) => last.length += grown,
                // An empty sequence has no value to extend with; leave it
                // empty rather than invent one.
                None => return,
            }
        } else {
            let mut pos = 0u16;
            let mut keep = 0usize;
            for (i, run) in self.runs.iter_mut().enumerate() {
                let run_end = pos + run.length;
                if run_end >= new_total {
                    let remain = new_total - pos;
                    if remain > 0 {
                        run.length = remain;
                        keep = i + 1;
                    } else {
                        keep = i;
                    }
                    break;
                }
                pos = run_end;
            }
            self.runs.truncate(keep);
        }
        self.total = new_total;
    }

    /// Merge adjacent runs with equal values.
    fn coalesce(&mut self) {
        let mut out: SmallVec<[Run<T>; 1]> = SmallVec::new();
        for run in self.runs.drain(..) {
            push_coalesced(&mut out, run.value, run.length);
        }
        self.runs = out;
    }
}

/// Push a run, merging into the previous one when the values match.
fn push_coalesced<T: Copy + Eq>(runs: &mut SmallVec<[Run<T>; 1]>, value: T, length: u16) {
    if length == 0 {
        return;
    }
    if let Some(last) = runs.last_mut() {
        if last.value == value {
            last.length += length;
            return;
        }
    }
    runs.push(Run { value, length });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lengths<T: Copy + Eq>(rle: &Rle<T>) -> Vec<(T, u16)> {
        rle.runs().iter().map(|r| (r.value, r.length)).collect()
    }

    fn assert_canonical<T: Copy + Eq + std::fmt::Debug>(rle: &Rle<T>) {
        let mut sum = 0u16;
        for pair in rle.runs().windows(2) {
            assert_ne!(pair[0].value, pair[1].value, "adjacent equal runs");
        }
        for run in rle.runs() {
            assert!(run.length > 0, "empty run");
            sum += run.length;
        }
        assert_eq!(sum, rle.len());
    }

    #[test]
    fn new_single_run() {
        let rle = Rle::new(10, 'a');
        assert_eq!(rle.len(), 10);
        assert_eq!(rle.run_count(), 1);
        assert_eq!(rle.at(0), Some('a'));
        assert_eq!(rle.at(9), Some('a'));
        assert_eq!(rle.at(10), None);
    }

    #[test]
    fn new_zero_length() {
        let rle: Rle<char> = Rle::new(0, 'a');
        assert!(rle.is_empty());
        assert_eq!(rle.run_count(), 0);
    }

    #[test]
    fn replace_middle_splits() {
        let mut rle = Rle::new(10, 'a');
        rle.replace(3, 6, 'b');
        assert_eq!(lengths(&rle), vec![('a', 3), ('b', 3), ('a', 4)]);
        assert_eq!(rle.at(2), Some('a'));
        assert_eq!(rle.at(3), Some('b'));
        assert_eq!(rle.at(5), Some('b'));
        assert_eq!(rle.at(6), Some('a'));
        assert_canonical(&rle);
    }

    #[test]
    fn replace_merges_with_neighbors() {
        let mut rle = Rle::new(10, 'a');
        rle.replace(3, 6, 'b');
        rle.replace(3, 6, 'a');
        assert_eq!(lengths(&rle), vec![('a', 10)]);
        assert_canonical(&rle);
    }

    #[test]
    fn replace_spanning_multiple_runs() {
        let mut rle = Rle::new(10, 'a');
        rle.replace(2, 4, 'b');
        rle.replace(6, 8, 'c');
        rle.replace(3, 7, 'd');
        assert_eq!(
            lengths(&rle),
            vec![('a', 2), ('b', 1), ('d', 4), ('c', 1), ('a', 2)]
        );
        assert_canonical(&rle);
    }

    #[test]
    fn replace_clamps_end() {
        let mut rle = Rle::new(5, 'a');
        rle.replace(3, 100, 'b');
        assert_eq!(lengths(&rle), vec![('a', 3), ('b', 2)]);
        assert_eq!(rle.len(), 5);
    }

    #[test]
    fn replace_degenerate_is_noop() {
        let mut rle = Rle::new(5, 'a');
        rle.replace(3, 3, 'b');
        rle.replace(4, 2, 'b');
        rle.replace(5, 10, 'b');
        assert_eq!(lengths(&rle), vec![('a', 5)]);
    }

    #[test]
    fn replace_values_merges() {
        let mut rle = Rle::new(9, 'a');
        rle.replace(3, 6, 'b');
        rle.replace_values('b', 'a');
        assert_eq!(lengths(&rle), vec![('a', 9)]);
        assert_canonical(&rle);
    }

    #[test]
    fn replace_values_keeps_boundaries_when_distinct() {
        let mut rle = Rle::new(9, 'a');
        rle.replace(3, 6, 'b');
        rle.replace_values('b', 'c');
        assert_eq!(lengths(&rle), vec![('a', 3), ('c', 3), ('a', 3)]);
    }

    #[test]
    fn resize_grows_last_run() {
        let mut rle = Rle::new(5, 'a');
        rle.replace(3, 5, 'b');
        rle.resize_trailing_extent(8);
        assert_eq!(lengths(&rle), vec![('a', 3), ('b', 5)]);
        assert_eq!(rle.len(), 8);
    }

    #[test]
    fn resize_shrinks_across_runs() {
        let mut rle = Rle::new(10, 'a');
        rle.replace(2, 4, 'b');
        rle.replace(6, 8, 'c');
        rle.resize_trailing_extent(3);
        assert_eq!(lengths(&rle), vec![('a', 2), ('b', 1)]);
        assert_eq!(rle.len(), 3);
        assert_canonical(&rle);
    }

    #[test]
    fn resize_to_zero() {
        let mut rle = Rle::new(10, 'a');
        rle.resize_trailing_extent(0);
        assert!(rle.is_empty());
        assert_eq!(rle.run_count(), 0);
    }

    #[test]
    fn resize_exact_run_boundary() {
        let mut rle = Rle::new(10, 'a');
        rle.replace(5, 10, 'b');
        rle.resize_trailing_extent(5);
        assert_eq!(lengths(&rle), vec![('a', 5)]);
    }

    #[test]
    fn extend_with_coalesces() {
        let mut rle = Rle::new(3, 'a');
        rle.extend_with('a', 2);
        rle.extend_with('b', 1);
        assert_eq!(lengths(&rle), vec![('a', 5), ('b', 1)]);
        assert_eq!(rle.len(), 6);
    }
}
