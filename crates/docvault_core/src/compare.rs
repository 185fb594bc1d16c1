//! crates/docvault_core/src/compare.rs
//!
//! Version comparison: the rule for picking two versions to compare, and the
//! line-based diff between their extracted texts.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::domain::{DiffResult, DocumentId, ModifiedLine};

pub const MAX_COMPARED_VERSIONS: usize = 2;

//=========================================================================================
// Selection Rule
//=========================================================================================

/// Applies one click on `version_id` to the current selection.
///
/// An already selected id is removed. A new id is appended while fewer than
/// two are selected; otherwise the selection is returned unchanged.
pub fn select_for_comparison(version_id: DocumentId, current: &[DocumentId]) -> Vec<DocumentId> {
    if current.contains(&version_id) {
        current.iter().copied().filter(|id| *id != version_id).collect()
    } else if current.len() < MAX_COMPARED_VERSIONS {
        let mut next = current.to_vec();
        next.push(version_id);
        next
    } else {
        current.to_vec()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SelectionState {
    Empty,
    One,
    Two,
}

/// The versions currently picked for comparison, in the order they were
/// picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionSelection {
    selected: Vec<DocumentId>,
    clear_after_compare: bool,
}

impl VersionSelection {
    /// `clear_after_compare` decides whether a finished comparison resets
    /// the pair or leaves it selected.
    pub fn new(clear_after_compare: bool) -> Self {
        Self {
            selected: Vec::new(),
            clear_after_compare,
        }
    }

    pub fn toggle(&mut self, version_id: DocumentId) -> SelectionState {
        self.selected = select_for_comparison(version_id, &self.selected);
        self.state()
    }

    pub fn state(&self) -> SelectionState {
        match self.selected.len() {
            0 => SelectionState::Empty,
            1 => SelectionState::One,
            _ => SelectionState::Two,
        }
    }

    pub fn can_compare(&self) -> bool {
        self.state() == SelectionState::Two
    }

    pub fn is_selected(&self, version_id: DocumentId) -> bool {
        self.selected.contains(&version_id)
    }

    pub fn selected(&self) -> &[DocumentId] {
        &self.selected
    }

    /// The `(first, second)` pair when exactly two versions are selected.
    pub fn pair(&self) -> Option<(DocumentId, DocumentId)> {
        match self.selected.as_slice() {
            [first, second] => Some((*first, *second)),
            _ => None,
        }
    }

    /// Called once a comparison has succeeded.
    pub fn complete_compare(&mut self) {
        if self.clear_after_compare {
            self.clear();
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }
}

//=========================================================================================
// Line Diff
//=========================================================================================

/// Computes the added, removed and modified lines between two texts.
///
/// Shared lines are matched first. Inside each run of unmatched lines,
/// removed and added lines are paired up in order as modifications and
/// whatever is left over stays removed or added.
///
/// Matching runs in memory linear in the number of lines: common prefix and
/// suffix are trimmed, lines that occur exactly once on both sides anchor
/// the alignment, and only the stretches between anchors fall back to a
/// divide-and-conquer LCS over the lines the two sides actually share.
pub fn diff(version1: &str, version2: &str) -> DiffResult {
    let old: Vec<&str> = version1.lines().collect();
    let new: Vec<&str> = version2.lines().collect();

    let mut result = DiffResult::default();
    let (mut i, mut j) = (0, 0);
    for (old_at, new_at) in matching_lines(&old, &new) {
        flush_hunk(&mut result, &old[i..old_at], &new[j..new_at]);
        i = old_at + 1;
        j = new_at + 1;
    }
    flush_hunk(&mut result, &old[i..], &new[j..]);

    result
}

fn flush_hunk(result: &mut DiffResult, removed: &[&str], added: &[&str]) {
    let paired = removed.len().min(added.len());

    for (before, after) in removed.iter().zip(added.iter()) {
        result.modified.push(ModifiedLine {
            before: before.to_string(),
            after: after.to_string(),
        });
    }
    result
        .removed
        .extend(removed[paired..].iter().map(|line| line.to_string()));
    result
        .added
        .extend(added[paired..].iter().map(|line| line.to_string()));
}

/// `(old, new)` index pairs of the lines matched between the two versions,
/// strictly increasing in both components.
fn matching_lines(old: &[&str], new: &[&str]) -> Vec<(usize, usize)> {
    let mut ids: HashMap<&str, u32> = HashMap::new();
    let old_ids = intern(old, &mut ids);
    let new_ids = intern(new, &mut ids);

    let mut matches = Vec::new();
    match_range(&old_ids, &new_ids, 0, 0, &mut matches);
    matches
}

fn intern<'a>(lines: &[&'a str], ids: &mut HashMap<&'a str, u32>) -> Vec<u32> {
    lines
        .iter()
        .map(|line| {
            let next = ids.len() as u32;
            *ids.entry(*line).or_insert(next)
        })
        .collect()
}

fn match_range(a: &[u32], b: &[u32], a_off: usize, b_off: usize, out: &mut Vec<(usize, usize)>) {
    let prefix = a.iter().zip(b).take_while(|(x, y)| x == y).count();
    out.extend((0..prefix).map(|k| (a_off + k, b_off + k)));

    let (a, b) = (&a[prefix..], &b[prefix..]);
    let suffix = a
        .iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    let a_mid = &a[..a.len() - suffix];
    let b_mid = &b[..b.len() - suffix];
    let (a_off, b_off) = (a_off + prefix, b_off + prefix);

    if !a_mid.is_empty() && !b_mid.is_empty() {
        let anchors = unique_anchors(a_mid, b_mid);
        if anchors.is_empty() {
            match_shared(a_mid, b_mid, a_off, b_off, out);
        } else {
            let (mut i, mut j) = (0, 0);
            for (ai, bj) in anchors {
                match_range(&a_mid[i..ai], &b_mid[j..bj], a_off + i, b_off + j, out);
                out.push((a_off + ai, b_off + bj));
                i = ai + 1;
                j = bj + 1;
            }
            match_range(&a_mid[i..], &b_mid[j..], a_off + i, b_off + j, out);
        }
    }

    let (a_tail, b_tail) = (a_off + a_mid.len(), b_off + b_mid.len());
    out.extend((0..suffix).map(|k| (a_tail + k, b_tail + k)));
}

/// Lines occurring exactly once in both `a` and `b`, reduced to the longest
/// run that is in the same order on both sides.
fn unique_anchors(a: &[u32], b: &[u32]) -> Vec<(usize, usize)> {
    // (count in a, position in a, count in b, position in b)
    let mut seen: HashMap<u32, (u32, usize, u32, usize)> = HashMap::new();
    for (i, id) in a.iter().enumerate() {
        let entry = seen.entry(*id).or_default();
        entry.0 += 1;
        entry.1 = i;
    }
    for (j, id) in b.iter().enumerate() {
        let entry = seen.entry(*id).or_default();
        entry.2 += 1;
        entry.3 = j;
    }

    let mut candidates: Vec<(usize, usize)> = seen
        .values()
        .filter(|(in_a, _, in_b, _)| *in_a == 1 && *in_b == 1)
        .map(|(_, i, _, j)| (*i, *j))
        .collect();
    candidates.sort_unstable();
    longest_increasing(&candidates)
}

/// Longest subsequence of `pairs` (sorted by the first component) whose
/// second components increase.
fn longest_increasing(pairs: &[(usize, usize)]) -> Vec<(usize, usize)> {
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; pairs.len()];

    for (k, &(_, y)) in pairs.iter().enumerate() {
        let len = tails.partition_point(|&t| pairs[t].1 < y);
        prev[k] = len.checked_sub(1).map(|p| tails[p]);
        if len == tails.len() {
            tails.push(k);
        } else {
            tails[len] = k;
        }
    }

    let mut run = Vec::with_capacity(tails.len());
    let mut cursor = tails.last().copied();
    while let Some(k) = cursor {
        run.push(pairs[k]);
        cursor = prev[k];
    }
    run.reverse();
    run
}

/// LCS over the lines `a` and `b` have in common. Lines present on one side
/// only can never match and are dropped before the quadratic part runs.
fn match_shared(a: &[u32], b: &[u32], a_off: usize, b_off: usize, out: &mut Vec<(usize, usize)>) {
    let in_a: HashSet<u32> = a.iter().copied().collect();
    let in_b: HashSet<u32> = b.iter().copied().collect();

    let (a_kept, a_pos): (Vec<u32>, Vec<usize>) = a
        .iter()
        .enumerate()
        .filter(|(_, id)| in_b.contains(*id))
        .map(|(k, id)| (*id, k))
        .unzip();
    let (b_kept, b_pos): (Vec<u32>, Vec<usize>) = b
        .iter()
        .enumerate()
        .filter(|(_, id)| in_a.contains(*id))
        .map(|(k, id)| (*id, k))
        .unzip();

    let mut pairs = Vec::new();
    hirschberg(&a_kept, &b_kept, 0, 0, &mut pairs);
    out.extend(
        pairs
            .into_iter()
            .map(|(x, y)| (a_off + a_pos[x], b_off + b_pos[y])),
    );
}

/// Hirschberg's LCS: two rolling rows per split, so memory stays linear.
fn hirschberg(a: &[u32], b: &[u32], a_off: usize, b_off: usize, out: &mut Vec<(usize, usize)>) {
    if a.is_empty() || b.is_empty() {
        return;
    }
    if a.len() == 1 {
        if let Some(j) = b.iter().position(|y| *y == a[0]) {
            out.push((a_off, b_off + j));
        }
        return;
    }

    let mid = a.len() / 2;
    let forward = lcs_row(&a[..mid], b);
    let a_rev: Vec<u32> = a[mid..].iter().rev().copied().collect();
    let b_rev: Vec<u32> = b.iter().rev().copied().collect();
    let backward = lcs_row(&a_rev, &b_rev);

    let mut split = 0;
    let mut best = 0;
    for k in 0..=b.len() {
        let total = forward[k] + backward[b.len() - k];
        if total > best {
            best = total;
            split = k;
        }
    }

    hirschberg(&a[..mid], &b[..split], a_off, b_off, out);
    hirschberg(&a[mid..], &b[split..], a_off + mid, b_off + split, out);
}

/// Last row of the LCS length table of `a` against every prefix of `b`.
fn lcs_row(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut prev = vec![0u32; b.len() + 1];
    let mut curr = vec![0u32; b.len() + 1];
    for x in a {
        for (j, y) in b.iter().enumerate() {
            curr[j + 1] = if x == y {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modified(before: &str, after: &str) -> ModifiedLine {
        ModifiedLine {
            before: before.to_string(),
            after: after.to_string(),
        }
    }

    #[test]
    fn test_select_toggles_and_caps_at_two() {
        assert_eq!(select_for_comparison(1, &[]), vec![1]);
        assert_eq!(select_for_comparison(2, &[1]), vec![1, 2]);
        // A third pick is ignored.
        assert_eq!(select_for_comparison(3, &[1, 2]), vec![1, 2]);
        // Picking a selected id removes it.
        assert_eq!(select_for_comparison(1, &[1, 2]), vec![2]);
        assert_eq!(select_for_comparison(2, &[2]), Vec::<DocumentId>::new());
    }

    #[test]
    fn test_selection_state_machine() {
        let mut selection = VersionSelection::new(false);
        assert_eq!(selection.state(), SelectionState::Empty);
        assert_eq!(selection.toggle(10), SelectionState::One);
        assert!(!selection.can_compare());
        assert_eq!(selection.toggle(11), SelectionState::Two);
        assert!(selection.can_compare());
        assert_eq!(selection.pair(), Some((10, 11)));

        assert_eq!(selection.toggle(12), SelectionState::Two);
        assert_eq!(selection.selected(), &[10, 11]);
        assert!(!selection.is_selected(12));

        assert_eq!(selection.toggle(10), SelectionState::One);
        assert_eq!(selection.pair(), None);
    }

    #[test]
    fn test_complete_compare_respects_configuration() {
        let mut keep = VersionSelection::new(false);
        keep.toggle(1);
        keep.toggle(2);
        keep.complete_compare();
        assert_eq!(keep.pair(), Some((1, 2)));

        let mut reset = VersionSelection::new(true);
        reset.toggle(1);
        reset.toggle(2);
        reset.complete_compare();
        assert_eq!(reset.state(), SelectionState::Empty);
    }

    #[test]
    fn test_identical_texts_have_no_differences() {
        let text = "Title\nFirst paragraph\nSecond paragraph";
        assert!(diff(text, text).is_empty());
        assert!(diff("", "").is_empty());
    }

    #[test]
    fn test_empty_first_version_is_all_added() {
        let result = diff("", "A\nB");
        assert_eq!(result.added, vec!["A", "B"]);
        assert!(result.removed.is_empty());
        assert!(result.modified.is_empty());
    }

    #[test]
    fn test_empty_second_version_is_all_removed() {
        let result = diff("A\nB", "");
        assert_eq!(result.removed, vec!["A", "B"]);
        assert!(result.added.is_empty());
        assert!(result.modified.is_empty());
    }

    #[test]
    fn test_changed_line_is_modified() {
        let result = diff("A\nB\nC", "A\nB2\nC");
        assert_eq!(result.modified, vec![modified("B", "B2")]);
        assert!(result.added.is_empty());
        assert!(result.removed.is_empty());
    }

    #[test]
    fn test_insertions_and_deletions_around_matches() {
        let result = diff("A\nB\nC\nD", "A\nC\nD\nE");
        assert_eq!(result.removed, vec!["B"]);
        assert_eq!(result.added, vec!["E"]);
        assert!(result.modified.is_empty());
    }

    #[test]
    fn test_uneven_hunk_pairs_then_leaves_remainder() {
        let result = diff("A\nX\nY\nZ\nB", "A\nX2\nB");
        assert_eq!(result.modified, vec![modified("X", "X2")]);
        assert_eq!(result.removed, vec!["Y", "Z"]);
        assert!(result.added.is_empty());

        let result = diff("A\nX\nB", "A\nP\nQ\nB");
        assert_eq!(result.modified, vec![modified("X", "P")]);
        assert_eq!(result.added, vec!["Q"]);
    }

    #[test]
    fn test_modified_keeps_first_version_order() {
        let result = diff("one\nkeep\ntwo\nthree", "uno\nkeep\ndos\ntres");
        let befores: Vec<&str> = result.modified.iter().map(|m| m.before.as_str()).collect();
        assert_eq!(befores, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_every_line_lands_in_one_category() {
        let v1 = "a\nb\nc\nd\ne\nf";
        let v2 = "a\nc\nx\ne\ny\nz\nf";
        let result = diff(v1, v2);

        let old_unmatched = result.removed.len() + result.modified.len();
        let new_unmatched = result.added.len() + result.modified.len();
        // a, c, e, f are common to both versions.
        assert_eq!(old_unmatched, 6 - 4);
        assert_eq!(new_unmatched, 7 - 4);
        for line in &result.added {
            assert!(!result.removed.contains(line));
        }
    }

    #[test]
    fn test_repeated_lines_still_align_optimally() {
        let result = diff("x\ny\nx\ny", "y\nx\ny\nx");
        assert_eq!(result.removed.len() + result.modified.len(), 1);
        assert_eq!(result.added.len() + result.modified.len(), 1);
    }

    #[test]
    fn test_large_disjoint_texts() {
        let v1: String = (0..30_000).map(|i| format!("old line {}\n", i)).collect();
        let v2: String = (0..30_000).map(|i| format!("new line {}\n", i)).collect();

        let result = diff(&v1, &v2);
        assert_eq!(result.modified.len(), 30_000);
        assert_eq!(result.modified[0], modified("old line 0", "new line 0"));
        assert!(result.added.is_empty());
        assert!(result.removed.is_empty());
    }

    #[test]
    fn test_large_text_with_scattered_edits() {
        let v1: Vec<String> = (0..20_000).map(|i| format!("paragraph {}", i)).collect();
        let mut v2 = v1.clone();
        v2[10] = "edited ten".to_string();
        v2.remove(10_000);
        v2.push("closing note".to_string());

        let result = diff(&v1.join("\n"), &v2.join("\n"));
        assert_eq!(result.modified, vec![modified("paragraph 10", "edited ten")]);
        assert_eq!(result.removed, vec!["paragraph 10000"]);
        assert_eq!(result.added, vec!["closing note"]);
    }

    #[test]
    fn test_windows_line_endings() {
        let result = diff("A\r\nB\r\n", "A\nB\n");
        assert!(result.is_empty());
    }
}
