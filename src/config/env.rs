//! # Environment Variable Utilities
//!
//! Helpers for reading typed values out of an environment lookup. Every
//! reader takes the lookup as a closure, so configuration loaders can be
//! exercised in tests without touching the real environment.
//!
//! # Examples
//! ```rust,no_run
//! use session_identity::config::env::{read_flag_from, read_u64_from};
//!
//! let get = |k: &str| std::env::var(k).ok();
//! let secure = read_flag_from(&get, "SESSION_COOKIE_SECURE", false);
//! let ttl = read_u64_from(&get, "SESSION_TTL_SECS", 60);
//! ```

/// Reads a boolean flag.
///
/// Returns `true` for any of the following case-insensitive values:
/// `"1"`, `"true"`, `"yes"`, `"on"`. Surrounding quotes are stripped
/// before matching.
///
/// # Example
/// ```rust
/// use session_identity::config::env::read_flag_from;
///
/// assert!(read_flag_from(|_| Some("'on'".into()), "FLAG", false));
/// assert!(!read_flag_from(|_| None, "FLAG", false));
/// ```
pub fn read_flag_from<F>(provider: F, name: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match provider(name) {
        Some(v) => {
            let s = v.trim().trim_matches(|c| c == '"' || c == '\'');
            matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
        }
        None => default,
    }
}

/// Reads a `u64`, falling back to `default` when unset or unparsable.
pub fn read_u64_from<F>(provider: F, name: &str, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    provider(name)
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

/// Reads a non-empty, trimmed string. Blank values count as unset.
pub fn read_string_from<F>(provider: F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    provider(name)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
