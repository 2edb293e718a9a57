//! Brand classification of resolved domains.

/// Returns true when `domain` belongs to the brand described by `brand_pattern`.
///
/// A missing or empty pattern never matches. Otherwise the pattern must occur
/// in the domain as a case-insensitive substring.
pub fn is_mirror(domain: &str, brand_pattern: Option<&str>) -> bool {
    match brand_pattern {
        Some(pattern) if !pattern.is_empty() => domain
            .to_lowercase()
            .contains(&pattern.to_lowercase()),
        _ => false,
    }
}
