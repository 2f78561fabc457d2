//! Document Header Parsing
//!
//! Extracts the leading `---`-delimited key/value header from a document.
//! Handles the subset of YAML the memory bank files use (scalar strings,
//! inline `[a, b]` lists, and `- item` block lists) without a full YAML
//! library. Absent or malformed headers never fail; callers get an empty
//! header and fall back to content-derived values.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};

/// Parsed header fields of one document
#[derive(Debug, Clone, Default)]
pub struct DocumentHeader {
    pub title: Option<String>,
    /// Declared document type identifier (e.g. "projectBrief")
    pub doc_type: Option<String>,
    pub tags: Vec<String>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

/// A raw header field value
#[derive(Debug, Clone, PartialEq)]
enum FieldValue {
    Scalar(String),
    List(Vec<String>),
}

/// Parse the leading frontmatter block of a document.
///
/// Returns an empty header when there is no block or it never closes.
pub fn parse_header(content: &str) -> DocumentHeader {
    let Some(frontmatter) = extract_frontmatter(content) else {
        return DocumentHeader::default();
    };
    let fields = parse_fields(&frontmatter);

    DocumentHeader {
        title: scalar(&fields, "title"),
        doc_type: scalar(&fields, "type"),
        tags: list(&fields, "tags"),
        created: scalar(&fields, "created").as_deref().and_then(parse_timestamp),
        updated: scalar(&fields, "updated").as_deref().and_then(parse_timestamp),
    }
}

/// First `# ` heading of the document, without the marker
pub fn first_heading(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let trimmed = line.trim_start();
        trimmed
            .strip_prefix("# ")
            .map(|rest| rest.trim().to_string())
            .filter(|heading| !heading.is_empty())
    })
}

/// Extract the text between the opening and closing `---` lines.
fn extract_frontmatter(content: &str) -> Option<String> {
    let trimmed = content.trim_start();
    let mut lines = trimmed.lines();

    if !is_delimiter(lines.next()?) {
        return None;
    }

    let mut collected: Vec<&str> = Vec::new();
    for line in lines {
        if is_delimiter(line) {
            return Some(collected.join("\n"));
        }
        collected.push(line);
    }
    None
}

/// A delimiter line is three or more dashes and nothing else
fn is_delimiter(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 3 && trimmed.chars().all(|c| c == '-')
}

/// Parse `key: value` lines, inline `[a, b]` lists, and indented `- item`
/// block lists into a field map.
fn parse_fields(frontmatter: &str) -> HashMap<String, FieldValue> {
    let mut fields = HashMap::new();
    let mut pending_list: Option<(String, Vec<String>)> = None;

    for line in frontmatter.lines() {
        let indented = line.starts_with(' ') || line.starts_with('\t');
        let trimmed = line.trim();

        let consumed_by_list = match pending_list.as_mut() {
            Some((_, items)) => {
                if let Some(item) = trimmed.strip_prefix("- ") {
                    items.push(strip_quotes(item).to_string());
                    true
                } else {
                    trimmed.is_empty() || indented
                }
            }
            None => false,
        };
        if consumed_by_list {
            continue;
        }
        if let Some((key, items)) = pending_list.take() {
            fields.insert(key, FieldValue::List(items));
        }

        if indented || trimmed.is_empty() {
            continue;
        }
        let Some((key, rest)) = trimmed.split_once(':') else {
            continue;
        };
        let key = key.trim().to_string();
        let rest = rest.trim();

        if rest.is_empty() {
            pending_list = Some((key, Vec::new()));
        } else if rest.starts_with('[') && rest.ends_with(']') {
            let items = rest[1..rest.len() - 1]
                .split(',')
                .map(|item| strip_quotes(item.trim()).to_string())
                .filter(|item| !item.is_empty())
                .collect();
            fields.insert(key, FieldValue::List(items));
        } else {
            fields.insert(key, FieldValue::Scalar(strip_quotes(rest).to_string()));
        }
    }

    if let Some((key, items)) = pending_list {
        fields.insert(key, FieldValue::List(items));
    }

    fields
}

fn scalar(fields: &HashMap<String, FieldValue>, key: &str) -> Option<String> {
    match fields.get(key) {
        Some(FieldValue::Scalar(value)) if !value.is_empty() => Some(value.clone()),
        _ => None,
    }
}

fn list(fields: &HashMap<String, FieldValue>, key: &str) -> Vec<String> {
    match fields.get(key) {
        Some(FieldValue::List(items)) => items.clone(),
        Some(FieldValue::Scalar(value)) if !value.is_empty() => vec![value.clone()],
        _ => Vec::new(),
    }
}

fn strip_quotes(value: &str) -> &str {
    let value = value.trim();
    if value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}
