//! Output formatting for CLI commands.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, PagemarkArgs};
use crate::error::Result;

/// Result structure for search operations.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchSummary {
    pub input: String,
    pub output: Option<String>,
    pub query: String,
    pub count: usize,
    pub message: String,
    pub elements: usize,
    pub skipped: usize,
}

/// Result structure for clear operations.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClearSummary {
    pub input: String,
    pub output: Option<String>,
    pub removed: usize,
}

/// Output a result in the specified format.
pub fn output_result<W: Write, T: Serialize>(
    out: &mut W,
    message: &str,
    result: &T,
    args: &PagemarkArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(out, message, result, args),
        OutputFormat::Json => output_json(out, result, args),
    }
}

/// Output in human-readable format.
fn output_human<W: Write, T: Serialize>(
    out: &mut W,
    message: &str,
    result: &T,
    args: &PagemarkArgs,
) -> Result<()> {
    if args.verbosity() == 0 {
        return Ok(());
    }
    writeln!(out, "{message}")?;

    if args.verbosity() > 1 {
        let value = serde_json::to_value(result)?;
        if let serde_json::Value::Object(obj) = value {
            for (key, val) in obj {
                let formatted_val = format_value(&val);
                writeln!(out, "  {key}: {formatted_val}")?;
            }
        }
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<W: Write, T: Serialize>(out: &mut W, result: &T, args: &PagemarkArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    writeln!(out, "{json}")?;
    Ok(())
}

/// Format a JSON value for display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        serde_json::Value::Object(_) => "[object]".to_string(),
        serde_json::Value::Null => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn summary() -> ClearSummary {
        ClearSummary {
            input: "page.html".to_string(),
            output: None,
            removed: 3,
        }
    }

    fn render(argv: &[&str]) -> String {
        let args = PagemarkArgs::try_parse_from(argv).unwrap();
        let mut out = Vec::new();
        output_result(&mut out, "Removed 3 highlights", &summary(), &args).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_human_output() {
        assert_eq!(render(&["pagemark", "clear", "page.html"]), "Removed 3 highlights\n");
        assert_eq!(render(&["pagemark", "-q", "clear", "page.html"]), "");

        let verbose = render(&["pagemark", "-vv", "clear", "page.html"]);
        assert!(verbose.contains("  removed: 3\n"));
        assert!(verbose.contains("  output: -\n"));
    }

    #[test]
    fn test_json_output() {
        let json = render(&["pagemark", "-f", "json", "clear", "page.html"]);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["removed"], 3);
        assert_eq!(value["input"], "page.html");
        assert!(!json.trim_end().contains('\n'));

        let pretty = render(&["pagemark", "-f", "json", "--pretty", "clear", "page.html"]);
        assert!(pretty.trim_end().contains('\n'));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(
            format_value(&serde_json::Value::String("test".to_string())),
            "test"
        );
        assert_eq!(
            format_value(&serde_json::Value::Number(serde_json::Number::from(42))),
            "42"
        );
        assert_eq!(format_value(&serde_json::Value::Null), "-");
        assert_eq!(format_value(&serde_json::json!([1, "a"])), "[1, a]");
    }
}
