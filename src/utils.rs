// src/utils.rs

/// Lower-case slug of a label: runs of anything outside `[a-z0-9]` collapse
/// to a single `_`, with no leading or trailing `_`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in text.trim().to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !slug.is_empty() {
                slug.push('_');
            }
            pending_separator = false;
            slug.push(c);
        } else {
            pending_separator = true;
        }
    }

    slug
}

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Lenient boolean used by CSV imports
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "yes" | "y" | "1" | "required"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Have a mobile"), "have_a_mobile");
        assert_eq!(slugify("  Years of experience? "), "years_of_experience");
        assert_eq!(slugify("C++ / Rust"), "c_rust");
        assert_eq!(slugify("__Already_Snake__"), "already_snake");
        assert_eq!(slugify("???"), "");
        assert_eq!(slugify("رقم الهاتف"), "");
    }

    #[test]
    fn test_get_file_extension() {
        assert_eq!(get_file_extension("fields.csv"), Some("csv".to_string()));
        assert_eq!(get_file_extension("fields.JSON"), Some("json".to_string()));
        assert_eq!(get_file_extension("noext"), None);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" yes "));
        assert!(!parse_flag("no"));
        assert!(!parse_flag(""));
    }
}
