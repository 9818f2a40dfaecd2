//! JSON output, compact or pretty-printed, optionally colored

use colored_json::prelude::*;
use serde::Serialize;

use crate::error::Result;

/// JSON formatter with pretty printing support
pub struct JsonFormatter {
    /// Enable pretty printing
    pretty: bool,

    /// Enable colored output (only applied when writing to a terminal)
    use_colors: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(pretty: bool, use_colors: bool) -> Self {
        Self { pretty, use_colors }
    }

    /// Serialize any report
    pub fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        let json_str = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };

        if self.use_colors {
            Ok(json_str.to_colored_json_auto().unwrap_or(json_str))
        } else {
            Ok(json_str)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compact() {
        let formatter = JsonFormatter::new(false, false);
        let output = formatter.format(&json!({"candidates": ["a", "b"]})).unwrap();
        assert_eq!(output, r#"{"candidates":["a","b"]}"#);
    }

    #[test]
    fn test_pretty() {
        let formatter = JsonFormatter::new(true, false);
        let output = formatter.format(&json!({"state": "satisfied"})).unwrap();
        assert_eq!(output, "{\n  \"state\": \"satisfied\"\n}");
    }
}
