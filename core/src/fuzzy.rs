//! Fuzzy name matching: case-insensitive substring or small edit distance.

/// Largest edit distance still accepted by `matches_fuzzy_search`.
pub const DEFAULT_MAX_DISTANCE: usize = 4;

/// Levenshtein distance between `a` and `b`, counted in chars.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    // Single rolling row of the DP table.
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            let next = (row[j + 1] + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = row[j + 1];
            row[j + 1] = next;
        }
    }
    row[b.len()]
}

/// Whether `name` matches the search `term` within `DEFAULT_MAX_DISTANCE`.
pub fn matches_fuzzy_search(name: &str, term: &str) -> bool {
    matches_fuzzy_search_within(name, term, DEFAULT_MAX_DISTANCE)
}

/// A blank term matches everything.
pub fn matches_fuzzy_search_within(name: &str, term: &str, max_distance: usize) -> bool {
    if term.trim().is_empty() {
        return true;
    }
    let name = name.to_lowercase();
    let term = term.to_lowercase();
    name.contains(&term) || levenshtein_distance(&name, &term) <= max_distance
}
