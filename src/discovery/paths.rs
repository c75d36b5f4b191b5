use std::path::MAIN_SEPARATOR;

/// Lexically normalize a path to the host separator convention.
///
/// Collapses repeated separators and `.` segments, resolves `..` where a
/// parent segment exists and keeps a trailing separator.
pub fn normalize(path: &str) -> String {
    normalize_with(path, MAIN_SEPARATOR)
}

pub(crate) fn normalize_with(path: &str, sep: char) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let is_sep = |c: char| c == '/' || (sep == '\\' && c == '\\');
    let absolute = path.starts_with(is_sep);
    let trailing = path.ends_with(is_sep);

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split(is_sep) {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let mut out = String::new();
    if absolute {
        out.push(sep);
    }
    out.push_str(&segments.join(&sep.to_string()));
    if out.is_empty() {
        out.push('.');
    }
    if trailing && !out.ends_with(sep) {
        out.push(sep);
    }
    out
}

/// Matches filenames equal to or nested under a source path
#[derive(Debug, Clone)]
pub struct SourceFilter {
    /// None when the source path is the current directory
    prefix: Option<String>,
    exact: String,
}

impl SourceFilter {
    pub fn new(source_path: &str) -> Self {
        Self::with_separator(source_path, MAIN_SEPARATOR)
    }

    pub(crate) fn with_separator(source_path: &str, sep: char) -> Self {
        let exact = normalize_with(source_path, sep);
        // "./" normalizes to itself, which would never prefix a repo path
        let prefix = if exact == "." || exact == format!(".{}", sep) {
            None
        } else {
            Some(normalize_with(&format!("{}{}", source_path, sep), sep))
        };
        Self { prefix, exact }
    }

    pub fn matches(&self, normalized: &str) -> bool {
        match &self.prefix {
            None => true,
            Some(prefix) => normalized.starts_with(prefix.as_str()) || normalized == self.exact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_posix() {
        assert_eq!(normalize_with("src/main/java", '/'), "src/main/java");
        assert_eq!(normalize_with("./src//main/", '/'), "src/main/");
        assert_eq!(normalize_with("src/../lib/a.rs", '/'), "lib/a.rs");
        assert_eq!(normalize_with("../a", '/'), "../a");
        assert_eq!(normalize_with("/x/../../y", '/'), "/y");
        assert_eq!(normalize_with("./", '/'), "./");
        assert_eq!(normalize_with(".", '/'), ".");
        assert_eq!(normalize_with("", '/'), ".");
    }

    #[test]
    fn test_normalize_windows() {
        assert_eq!(
            normalize_with("src/main/java/A.java", '\\'),
            "src\\main\\java\\A.java"
        );
        assert_eq!(normalize_with("src\\main/", '\\'), "src\\main\\");
    }

    #[test]
    fn test_filter_current_dir_matches_everything() {
        for source in [".", "./"] {
            let filter = SourceFilter::with_separator(source, '/');
            assert!(filter.matches("src/A.java"));
            assert!(filter.matches("README.md"));
        }
    }

    #[test]
    fn test_filter_requires_directory_boundary() {
        let filter = SourceFilter::with_separator("src/main", '/');
        assert!(filter.matches("src/main/A.java"));
        assert!(!filter.matches("src/mainframe/B.java"));
        assert!(!filter.matches("test/A.java"));
    }

    #[test]
    fn test_filter_accepts_trailing_separator_and_exact_match() {
        let filter = SourceFilter::with_separator("src/main/", '/');
        assert!(filter.matches("src/main/A.java"));

        let filter = SourceFilter::with_separator("src/A.java", '/');
        assert!(filter.matches("src/A.java"));
    }

    #[test]
    fn test_filter_windows_separator() {
        let filter = SourceFilter::with_separator("src/main", '\\');
        assert!(filter.matches(&normalize_with("src/main/A.java", '\\')));
    }
}
