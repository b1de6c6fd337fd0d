//! Presence checks for untrusted request fields

/// Returns the value when it is present and non-empty
///
/// An empty string counts as absent; whitespace does not.
pub fn supplied(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supplied() {
        assert_eq!(supplied(Some("Ann".to_string())), Some("Ann".to_string()));
        assert_eq!(supplied(Some(String::new())), None);
        assert_eq!(supplied(None), None);
    }

    #[test]
    fn test_whitespace_counts_as_supplied() {
        assert_eq!(supplied(Some(" ".to_string())), Some(" ".to_string()));
    }
}
