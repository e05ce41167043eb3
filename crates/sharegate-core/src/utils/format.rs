const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;

/// Format a byte count for display: `512 B`, `1.50 KB`, `2.00 MB`, `1.25 GB`
pub fn format_file_size(size_in_bytes: u64) -> String {
    let size = size_in_bytes as f64;
    if size_in_bytes < KIB {
        format!("{} B", size_in_bytes)
    } else if size_in_bytes < MIB {
        format!("{:.2} KB", size / KIB as f64)
    } else if size_in_bytes < GIB {
        format!("{:.2} MB", size / MIB as f64)
    } else {
        format!("{:.2} GB", size / GIB as f64)
    }
}

/// Check a filename's extension against an allow-list, ignoring case.
/// A name without a dot has no extension and never matches.
pub fn validate_file_extension(filename: &str, allowed_extensions: &[&str]) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext)),
        _ => false,
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(1023), "1023 B");
        assert_eq!(format_file_size(1024), "1.00 KB");
        assert_eq!(format_file_size(1536), "1.50 KB");
        assert_eq!(format_file_size(16 * 1024 * 1024), "16.00 MB");
        assert_eq!(format_file_size(5 * 1024 * 1024 * 1024 / 4), "1.25 GB");
    }

    #[test]
    fn test_validate_file_extension() {
        let allowed = ["pptx", "docx", "xlsx"];
        assert!(validate_file_extension("report.docx", &allowed));
        assert!(validate_file_extension("Deck.PPTX", &allowed));
        assert!(validate_file_extension("archive.v2.xlsx", &allowed));
        assert!(!validate_file_extension("notes.txt", &allowed));
        assert!(!validate_file_extension("docx", &allowed));
        assert!(!validate_file_extension("trailing.", &allowed));
        assert!(!validate_file_extension("", &allowed));
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("héllo wörld", 6), "hél...");
    }
}
