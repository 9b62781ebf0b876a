//! YAML frontmatter splitting, defaulting and re-serialization.

use crate::error::{ExportError, Result};
use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// Frontmatter extraction result.
#[derive(Debug, Clone)]
pub struct FrontmatterSplit<'a> {
    /// The raw YAML string (without delimiters).
    pub yaml: Option<&'a str>,
    /// The content after the frontmatter.
    pub content: &'a str,
}

/// Split content into frontmatter and body.
///
/// Frontmatter must open with `---` on the very first line and close with a
/// `---` line of its own. Anything else is treated as body.
pub fn split_frontmatter(content: &str) -> FrontmatterSplit<'_> {
    let no_frontmatter = FrontmatterSplit {
        yaml: None,
        content,
    };

    let Some(after_open) = content.strip_prefix("---") else {
        return no_frontmatter;
    };

    let yaml_start = if after_open.starts_with('\n') {
        4
    } else if after_open.starts_with("\r\n") {
        5
    } else {
        return no_frontmatter;
    };

    let remaining = &content[yaml_start..];

    // Empty block: closing delimiter directly after the opener
    if remaining.starts_with("---") {
        let rest = &remaining[3..];
        if rest.is_empty() || rest.starts_with('\n') || rest.starts_with("\r\n") {
            return FrontmatterSplit {
                yaml: Some(""),
                content: strip_leading_newline(rest),
            };
        }
    }

    let closing_pos = remaining
        .find("\n---\n")
        .or_else(|| remaining.find("\n---\r\n"))
        .or_else(|| remaining.ends_with("\n---").then(|| remaining.len() - 4));

    match closing_pos {
        Some(pos) => {
            let yaml_end = yaml_start + pos;
            let yaml = content[yaml_start..yaml_end].trim_end_matches('\r');
            let rest = &content[(yaml_end + 4).min(content.len())..];
            FrontmatterSplit {
                yaml: Some(yaml),
                content: strip_leading_newline(rest),
            }
        }
        None => no_frontmatter,
    }
}

fn strip_leading_newline(rest: &str) -> &str {
    rest.strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest)
}

/// Parse a raw YAML block into a mapping.
///
/// An empty block yields an empty mapping; a block that is valid YAML but not a
/// mapping is rejected.
pub fn parse_frontmatter_mapping(yaml: &str, path: &Path) -> Result<Mapping> {
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }

    let invalid = |message: String| ExportError::InvalidFrontmatter {
        path: path.to_path_buf(),
        message,
    };

    match serde_yaml::from_str::<Value>(yaml).map_err(|e| invalid(e.to_string()))? {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        other => Err(invalid(format!(
            "expected a mapping, found {}",
            value_kind(&other)
        ))),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Serialize a mapping back to YAML frontmatter format (with delimiters).
pub fn serialize_frontmatter(metadata: &Mapping) -> Result<String> {
    let yaml = serde_yaml::to_string(metadata)?;
    Ok(format!("---\n{}---\n", yaml))
}

/// A note split into metadata and body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub metadata: Mapping,
    pub body: String,
}

impl Document {
    pub const TITLE: &'static str = "title";
    pub const DATE: &'static str = "date";

    /// The `title` field, if it is a string.
    pub fn title(&self) -> Option<&str> {
        self.metadata.get(Self::TITLE).and_then(Value::as_str)
    }

    /// The `date` field, if it is a string.
    pub fn date(&self) -> Option<&str> {
        self.metadata.get(Self::DATE).and_then(Value::as_str)
    }

    /// Reassemble frontmatter and body into one markdown document.
    pub fn to_markdown(&self) -> Result<String> {
        let mut out = serialize_frontmatter(&self.metadata)?;
        out.push_str(&self.body);
        Ok(out)
    }
}

/// Split a note and make sure its metadata carries `title` and `date`.
///
/// `title` defaults to `note_name` and `date` to `now` as ISO-8601. Existing
/// metadata is layered over the defaults and wins on every key, except that a
/// null or blank `title`/`date` does not replace its default.
pub fn merge_frontmatter(
    content: &str,
    note_name: &str,
    now: DateTime<FixedOffset>,
    path: &Path,
) -> Result<Document> {
    let split = split_frontmatter(content);
    let existing = match split.yaml {
        Some(yaml) => parse_frontmatter_mapping(yaml, path)?,
        None => Mapping::new(),
    };

    let mut metadata = Mapping::new();
    metadata.insert(
        Value::String(Document::TITLE.to_string()),
        Value::String(note_name.to_string()),
    );
    metadata.insert(
        Value::String(Document::DATE.to_string()),
        Value::String(now.to_rfc3339_opts(SecondsFormat::Secs, true)),
    );

    for (key, value) in existing {
        let is_required = matches!(key.as_str(), Some(Document::TITLE) | Some(Document::DATE));
        if is_required && is_blank(&value) {
            continue;
        }
        metadata.insert(key, value);
    }

    Ok(Document {
        metadata,
        body: split.content.to_string(),
    })
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
