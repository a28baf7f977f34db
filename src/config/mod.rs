//! Harness configuration
//!
//! A page running the suite is configured through its URL query string
//! (`?quiet=1`); embedders can build a [`HarnessConfig`] directly instead.

use rustc_hash::FxHashMap as HashMap;

/// Configuration for a harness session.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Identifier reported to the result sink with every outcome (the page path).
    pub test_id: String,
    /// Fallback text for `description()` when no message is given.
    pub title: String,
    /// Suppress page lines for passes and debug output.
    pub quiet: bool,
    /// Log passes and debug messages to the console, not just failures.
    pub verbose_logging: bool,
    /// Hold console lines back until the first failure.
    pub buffer_console: bool,
    /// Raw query-string options the configuration was parsed from.
    pub options: HashMap<String, String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            test_id: String::new(),
            title: String::new(),
            quiet: false,
            verbose_logging: true,
            buffer_console: true,
            options: HashMap::default(),
        }
    }
}

impl HarnessConfig {
    /// Parse options from a page URL or bare query string.
    ///
    /// Everything up to the first `?` and from the first `#` is ignored;
    /// values are percent-decoded. `quiet=1` turns on quiet mode.
    pub fn from_query(url: &str) -> Self {
        let start = url.find('?').map(|q| q + 1).unwrap_or(0);
        let end = url.find('#').filter(|e| *e >= start).unwrap_or(url.len());
        let options: HashMap<String, String> = url[start..end]
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let mut parts = pair.split('=');
                let key = parts.next().unwrap_or_default().to_string();
                let value = parts.next().map(percent_decode).unwrap_or_default();
                (key, value)
            })
            .collect();

        Self {
            quiet: options.get("quiet").map(String::as_str) == Some("1"),
            options,
            ..Self::default()
        }
    }

    /// Look up a raw query option
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Set the identifier reported to the result sink
    pub fn with_test_id(mut self, test_id: impl Into<String>) -> Self {
        self.test_id = test_id.into();
        self
    }

    /// Set the default description
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Enable or disable quiet mode
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Enable or disable verbose console logging
    pub fn with_verbose_logging(mut self, verbose: bool) -> Self {
        self.verbose_logging = verbose;
        self
    }

    /// Enable or disable console buffering
    pub fn with_buffer_console(mut self, buffer: bool) -> Self {
        self.buffer_console = buffer;
        self
    }
}

/// Percent-decode a URI component (`+` is left alone).
pub fn percent_decode(s: &str) -> String {
    let mut result = Vec::new();
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(h), Some(l)) = (hex_to_nibble(bytes[i + 1]), hex_to_nibble(bytes[i + 2])) {
                result.push((h << 4) | l);
                i += 3;
                continue;
            }
        }
        result.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&result).to_string()
}

fn hex_to_nibble(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'A'..=b'F' => Some(b - b'A' + 10),
        b'a'..=b'f' => Some(b - b'a' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let cfg = HarnessConfig::default();
        assert!(cfg.verbose_logging);
        assert!(cfg.buffer_console);
        assert!(!cfg.quiet);
        assert!(cfg.options.is_empty());
    }

    #[test]
    fn test_from_query_quiet() {
        let cfg = HarnessConfig::from_query("http://host/conformance/buffers.html?quiet=1&webglVersion=2#top");
        assert!(cfg.quiet);
        assert_eq!(cfg.option("webglVersion"), Some("2"));
        assert_eq!(cfg.option("top"), None);
    }

    #[test]
    fn test_from_query_not_quiet() {
        let cfg = HarnessConfig::from_query("?quiet=0");
        assert!(!cfg.quiet);
        let cfg = HarnessConfig::from_query("page.html");
        assert!(!cfg.quiet);
    }

    #[test]
    fn test_from_query_decodes_values() {
        let cfg = HarnessConfig::from_query("?name=a%20b%2Bc&flag");
        assert_eq!(cfg.option("name"), Some("a b+c"));
        assert_eq!(cfg.option("flag"), Some(""));
    }

    #[test]
    fn test_percent_decode_edge_cases() {
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%4"), "%4");
        assert_eq!(percent_decode("%41%zz"), "A%zz");
        assert_eq!(percent_decode("a+b"), "a+b");
    }

    #[test]
    fn test_builder_setters() {
        let cfg = HarnessConfig::default()
            .with_test_id("/conformance/a.html")
            .with_title("A")
            .with_quiet(true)
            .with_verbose_logging(false)
            .with_buffer_console(false);
        assert_eq!(cfg.test_id, "/conformance/a.html");
        assert_eq!(cfg.title, "A");
        assert!(cfg.quiet);
        assert!(!cfg.verbose_logging);
        assert!(!cfg.buffer_console);
    }
}
