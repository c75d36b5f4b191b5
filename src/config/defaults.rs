use std::path::PathBuf;

pub const PUBLIC_API_URL: &str = "https://api.github.com";

pub fn default_version() -> String {
    "latest".to_string()
}

pub fn default_source_path() -> String {
    ".".to_string()
}

pub fn default_rulesets() -> String {
    "rulesets/java/quickstart.xml".to_string()
}

pub fn default_report_file() -> PathBuf {
    PathBuf::from("pmd-report.sarif")
}

pub fn default_minimum_priority() -> u8 {
    5
}

pub fn default_api_url() -> String {
    PUBLIC_API_URL.to_string()
}

pub fn default_tool_cache() -> PathBuf {
    // Hosted runners provide a persistent tool cache
    if let Some(dir) = std::env::var_os("RUNNER_TOOL_CACHE") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    PathBuf::from(".pmdgate/tool-cache")
}

pub fn default_true() -> bool {
    true
}
