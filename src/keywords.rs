//! Keyword list composition for route and `!` lines.
//!
//! Keywords come from several places in the configuration (task keywords,
//! base method keywords, user extras). They are merged left to right with the
//! first occurrence of each keyword winning, so a keyword repeated in
//! `extra_keywords` does not appear twice in the rendered line.

/// Token appended to every ORCA `!` line to suppress population analysis.
pub const NOPOP: &str = "NoPop";

/// Merges ordered keyword groups, keeping the first occurrence of each value.
///
/// Comparison is case-sensitive. Every call starts from an empty list.
///
/// # Examples
///
/// ```
/// use qcinput::keywords::merge_keywords;
///
/// let task = vec!["Opt".to_string(), "Freq".to_string()];
/// let base = vec!["r2scan-3c".to_string(), "Opt".to_string()];
/// let merged = merge_keywords([task.as_slice(), base.as_slice()]);
/// assert_eq!(merged, vec!["Opt", "Freq", "r2scan-3c"]);
/// ```
pub fn merge_keywords<'a, I>(groups: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut merged: Vec<String> = Vec::new();
    for group in groups {
        for keyword in group {
            if !merged.contains(keyword) {
                merged.push(keyword.clone());
            }
        }
    }
    merged
}

/// Appends `NoPop` unless a token equal to `nopop` (any case) is present.
///
/// # Examples
///
/// ```
/// use qcinput::keywords::ensure_nopop;
///
/// let keywords = ensure_nopop(vec!["SP".to_string()]);
/// assert_eq!(keywords, vec!["SP", "NoPop"]);
///
/// let keywords = ensure_nopop(vec!["NOPOP".to_string(), "SP".to_string()]);
/// assert_eq!(keywords, vec!["NOPOP", "SP"]);
/// ```
pub fn ensure_nopop(mut keywords: Vec<String>) -> Vec<String> {
    if !keywords.iter().any(|kw| kw.eq_ignore_ascii_case(NOPOP)) {
        keywords.push(NOPOP.to_string());
    }
    keywords
}
