//! PMD version parsing and the version-dependent CLI policy.
//!
//! PMD changed its command line twice: 6.41.0 introduced long-form flags
//! (`--no-cache`, `--file-list`) and 7.0.0 replaced `run.sh pmd` with the
//! `pmd check` subcommand.

use regex::Regex;
use std::cmp::Ordering;
use std::sync::OnceLock;

/// First release accepting long-form flags
pub const NEW_ARG_SYNTAX_SINCE: ToolVersion = ToolVersion::new(6, 41, 0);

/// First major version with the subcommand CLI
pub const NEXT_GEN_CLI_MAJOR: u64 = 7;

static VERSION_RE: OnceLock<Regex> = OnceLock::new();

fn version_regex() -> &'static Regex {
    VERSION_RE.get_or_init(|| {
        Regex::new(r"^(\d+)\.(\d+)\.(\d+)(?:-([0-9A-Za-z][0-9A-Za-z.-]*))?$")
            .expect("version regex is valid")
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Option<String>,
}

impl ToolVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre: None,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let caps = version_regex().captures(s.trim())?;
        Some(Self {
            major: caps[1].parse().ok()?,
            minor: caps[2].parse().ok()?,
            patch: caps[3].parse().ok()?,
            pre: caps.get(4).map(|m| m.as_str().to_string()),
        })
    }
}

impl Ord for ToolVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (&self.pre, &other.pre) {
                (None, None) => Ordering::Equal,
                // A prerelease sorts before its release
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl PartialOrd for ToolVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

/// A requested PMD version: a concrete release or "latest"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRequest {
    Latest,
    Exact(String),
}

impl VersionRequest {
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s == "latest" {
            Some(VersionRequest::Latest)
        } else {
            ToolVersion::parse(s).map(|_| VersionRequest::Exact(s.to_string()))
        }
    }

    pub fn is_latest(&self) -> bool {
        matches!(self, VersionRequest::Latest)
    }
}

impl std::fmt::Display for VersionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VersionRequest::Latest => write!(f, "latest"),
            VersionRequest::Exact(v) => write!(f, "{}", v),
        }
    }
}

/// True when the version accepts `--no-cache` / `--file-list`.
///
/// Unparseable versions fall back to the legacy spelling.
pub fn uses_new_arg_syntax(version: &str) -> bool {
    ToolVersion::parse(version).is_some_and(|v| v >= NEW_ARG_SYNTAX_SINCE)
}

/// True when the version ships the `pmd check` subcommand CLI
pub fn is_next_gen_cli(version: &str) -> bool {
    ToolVersion::parse(version).is_some_and(|v| v.major >= NEXT_GEN_CLI_MAJOR)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }
}

/// Every version- and platform-dependent choice, decided once per run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CliDialect {
    pub new_arg_syntax: bool,
    pub next_gen: bool,
    pub platform: Platform,
}

impl CliDialect {
    pub fn select(version: &str, platform: Platform) -> Self {
        Self {
            new_arg_syntax: uses_new_arg_syntax(version),
            next_gen: is_next_gen_cli(version),
            platform,
        }
    }

    /// Executable path relative to the distribution root
    pub fn executable(&self) -> &'static [&'static str] {
        match (self.platform, self.next_gen) {
            (Platform::Windows, _) => &["bin", "pmd.bat"],
            (Platform::Unix, true) => &["bin", "pmd"],
            (Platform::Unix, false) => &["bin", "run.sh"],
        }
    }

    /// Arguments placed between the executable and the flags
    pub fn entry_args(&self) -> &'static [&'static str] {
        match (self.next_gen, self.platform) {
            (true, _) => &["check", "--no-progress"],
            (false, Platform::Unix) => &["pmd"],
            (false, Platform::Windows) => &[],
        }
    }

    pub fn no_cache_flag(&self) -> &'static str {
        if self.new_arg_syntax {
            "--no-cache"
        } else {
            "-no-cache"
        }
    }

    pub fn file_list_flag(&self) -> &'static str {
        if self.new_arg_syntax {
            "--file-list"
        } else {
            "-filelist"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_arg_syntax_threshold() {
        assert!(!uses_new_arg_syntax("6.0.0"));
        assert!(!uses_new_arg_syntax("6.40.0"));
        assert!(!uses_new_arg_syntax("6.41.0-rc1"));
        assert!(uses_new_arg_syntax("6.41.0"));
        assert!(uses_new_arg_syntax("6.55.0"));
        assert!(uses_new_arg_syntax("7.0.0-rc1"));
        assert!(uses_new_arg_syntax("7.1.0"));
    }

    #[test]
    fn test_next_gen_threshold() {
        assert!(!is_next_gen_cli("6.55.0"));
        assert!(!is_next_gen_cli("6.99.99"));
        assert!(is_next_gen_cli("7.0.0-rc1"));
        assert!(is_next_gen_cli("7.0.0"));
        assert!(is_next_gen_cli("8.2.1"));
    }

    #[test]
    fn test_unparseable_is_legacy() {
        assert!(!uses_new_arg_syntax("latest"));
        assert!(!is_next_gen_cli("seven"));
    }

    #[test]
    fn test_version_ordering() {
        let rc = ToolVersion::parse("7.0.0-rc1").unwrap();
        let rc2 = ToolVersion::parse("7.0.0-rc2").unwrap();
        let release = ToolVersion::parse("7.0.0").unwrap();
        assert!(rc < rc2);
        assert!(rc2 < release);
        assert!(ToolVersion::parse("6.9.0").unwrap() < ToolVersion::parse("6.10.0").unwrap());
        assert_eq!(rc.to_string(), "7.0.0-rc1");
    }

    #[test]
    fn test_version_request_parse() {
        assert_eq!(VersionRequest::parse("latest"), Some(VersionRequest::Latest));
        assert_eq!(
            VersionRequest::parse("6.55.0"),
            Some(VersionRequest::Exact("6.55.0".to_string()))
        );
        assert_eq!(VersionRequest::parse("6.55"), None);
        assert_eq!(VersionRequest::parse(""), None);
    }

    #[test]
    fn test_dialect_windows_overrides_entry_point() {
        let legacy = CliDialect::select("6.55.0", Platform::Windows);
        assert_eq!(legacy.executable(), &["bin", "pmd.bat"]);
        assert!(legacy.entry_args().is_empty());

        let next = CliDialect::select("7.0.0", Platform::Windows);
        assert_eq!(next.executable(), &["bin", "pmd.bat"]);
        assert_eq!(next.entry_args(), &["check", "--no-progress"]);
    }

    #[test]
    fn test_dialect_unix_entry_points() {
        let legacy = CliDialect::select("6.40.0", Platform::Unix);
        assert_eq!(legacy.executable(), &["bin", "run.sh"]);
        assert_eq!(legacy.entry_args(), &["pmd"]);
        assert_eq!(legacy.no_cache_flag(), "-no-cache");
        assert_eq!(legacy.file_list_flag(), "-filelist");

        let next = CliDialect::select("7.0.0-rc1", Platform::Unix);
        assert_eq!(next.executable(), &["bin", "pmd"]);
        assert_eq!(next.no_cache_flag(), "--no-cache");
        assert_eq!(next.file_list_flag(), "--file-list");
    }
}
