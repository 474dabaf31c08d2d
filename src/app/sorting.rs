//! Sort orders for the worktree list.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::git::Worktree;

/// Sort order of the worktree list, cycled with `s`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Most recently activated first
    #[default]
    Recent,
    /// Newest commit first
    Date,
    /// Branch name, byte-wise ascending
    Branch,
    /// Dirty worktrees first
    Status,
}

impl SortKey {
    /// Next key in the cycle Recent -> Date -> Branch -> Status -> Recent
    pub fn next(self) -> Self {
        match self {
            SortKey::Recent => SortKey::Date,
            SortKey::Date => SortKey::Branch,
            SortKey::Branch => SortKey::Status,
            SortKey::Status => SortKey::Recent,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Recent => "recent",
            SortKey::Date => "date",
            SortKey::Branch => "branch",
            SortKey::Status => "status",
        }
    }
}

/// Indices of `worktrees` in `key` order. Equal elements keep their order.
pub fn sort_indices(worktrees: &[Worktree], key: SortKey) -> Vec<usize> {
    let mut order: Vec<usize> = (0..worktrees.len()).collect();
    let cmp = |a: &usize, b: &usize| compare(&worktrees[*a], &worktrees[*b], key);
    // sort_by is stable
    order.sort_by(cmp);
    order
}

fn compare(a: &Worktree, b: &Worktree, key: SortKey) -> Ordering {
    match key {
        SortKey::Recent => match (a.last_accessed, b.last_accessed) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => b.commit_date.cmp(&a.commit_date),
        },
        SortKey::Date => b.commit_date.cmp(&a.commit_date),
        SortKey::Branch => a.branch.cmp(&b.branch),
        SortKey::Status => b.is_dirty.cmp(&a.is_dirty),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::fixtures::worktree;

    fn branches(worktrees: &[Worktree], key: SortKey) -> Vec<String> {
        sort_indices(worktrees, key)
            .into_iter()
            .map(|i| worktrees[i].branch.clone())
            .collect()
    }

    #[test]
    fn key_cycle_visits_every_order() {
        let mut key = SortKey::Recent;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(key.label());
            key = key.next();
        }
        assert_eq!(seen, ["recent", "date", "branch", "status"]);
        assert_eq!(key, SortKey::Recent);
    }

    #[test]
    fn date_sort_is_newest_first_and_stable() {
        let wts = vec![
            worktree("a", "2026-01-01T00:00:00+00:00"),
            worktree("b", "2026-03-01T00:00:00+00:00"),
            worktree("c", "2026-01-01T00:00:00+00:00"),
        ];
        assert_eq!(branches(&wts, SortKey::Date), ["b", "a", "c"]);
    }

    #[test]
    fn branch_sort_is_case_sensitive() {
        let wts = vec![
            worktree("beta", "2026-01-01T00:00:00+00:00"),
            worktree("Zeta", "2026-01-01T00:00:00+00:00"),
            worktree("alpha", "2026-01-01T00:00:00+00:00"),
        ];
        assert_eq!(branches(&wts, SortKey::Branch), ["Zeta", "alpha", "beta"]);
    }

    #[test]
    fn status_sort_puts_dirty_first_keeping_order() {
        let mut wts = vec![
            worktree("a", "2026-01-01T00:00:00+00:00"),
            worktree("b", "2026-01-01T00:00:00+00:00"),
            worktree("c", "2026-01-01T00:00:00+00:00"),
            worktree("d", "2026-01-01T00:00:00+00:00"),
        ];
        wts[1].is_dirty = true;
        wts[3].is_dirty = true;
        assert_eq!(branches(&wts, SortKey::Status), ["b", "d", "a", "c"]);
    }

    #[test]
    fn recent_sort_puts_never_accessed_last_by_date() {
        let wts = vec![
            worktree("old", "2026-01-01T00:00:00+00:00"),
            worktree("new", "2026-02-01T00:00:00+00:00"),
            worktree("used", "2025-01-01T00:00:00+00:00").with_last_accessed_millis(Some(1_000)),
            worktree("fresh", "2025-01-01T00:00:00+00:00").with_last_accessed_millis(Some(5_000)),
        ];
        assert_eq!(
            branches(&wts, SortKey::Recent),
            ["fresh", "used", "new", "old"]
        );
    }
}
