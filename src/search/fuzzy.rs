//! Greedy subsequence matching used by every filterable list.
//!
//! The matcher takes the first qualifying character for each query character
//! and scores the total gap between consecutive matches. It is not an optimal
//! alignment: `score("ab", "a_ab")` is 2, not 0. Lists rely on this exact
//! ranking, so keep it greedy.

/// Score `target` against `query`, lower is better.
///
/// Matching is case-insensitive. Returns `None` when `query` is not a
/// subsequence of `target`; an empty query matches everything with score 0.
pub fn score(query: &str, target: &str) -> Option<u32> {
    let mut target_chars = target.chars().flat_map(char::to_lowercase).enumerate();
    let mut total: u32 = 0;
    let mut last: Option<usize> = None;

    for q in query.chars().flat_map(char::to_lowercase) {
        let (pos, _) = target_chars.by_ref().find(|&(_, t)| t == q)?;
        if let Some(prev) = last {
            total = total.saturating_add(u32::try_from(pos - prev - 1).unwrap_or(u32::MAX));
        }
        last = Some(pos);
    }

    Some(total)
}

/// Indices of `items` that match `query`, best score first.
///
/// Equal scores keep their original relative order. An empty query returns
/// every index unchanged.
pub fn filter_indices<'a, T, F>(items: &'a [T], query: &str, key: F) -> Vec<usize>
where
    F: Fn(&'a T) -> &'a str,
{
    if query.is_empty() {
        return (0..items.len()).collect();
    }

    let mut scored: Vec<(u32, usize)> = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| score(query, key(item)).map(|s| (s, i)))
        .collect();
    // sort_by_key is stable
    scored.sort_by_key(|&(s, _)| s);
    scored.into_iter().map(|(_, i)| i).collect()
}
