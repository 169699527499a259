/// Visibility flag for each name, in input order: true iff the name
/// contains `query`, ignoring case. An empty query shows everything.
pub fn visible_flags<S: AsRef<str>>(query: &str, names: &[S]) -> Vec<bool> {
    let needle = query.to_lowercase();
    names
        .iter()
        .map(|name| needle.is_empty() || name.as_ref().to_lowercase().contains(&needle))
        .collect()
}
