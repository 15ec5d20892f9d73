//! CSV ingestion for collection exports. Real-world exports disagree on
//! delimiters, header names, and quoting, so the loader sniffs all three
//! instead of demanding a fixed schema.

use std::path::Path;

use tracing::{debug, info, warn};

use decksmith_core::{CardEntry, Collection};

use crate::CollectionError;

const NAME_HEADERS: [&str; 8] =
    ["name", "card_name", "cardname", "card name", "title", "card", "card_title", "cardtitle"];
const QUANTITY_HEADERS: [&str; 6] = ["quantity", "qty", "count", "amount", "copies", "owned"];
const SET_HEADERS: [&str; 8] =
    ["set", "set_code", "setcode", "set code", "expansion", "edition", "set_name", "setname"];

/// Load a collection CSV. Duplicate rows for the same card accumulate their
/// quantities; unparseable rows are skipped with a warning.
pub fn load_collection(path: impl AsRef<Path>) -> Result<Collection, CollectionError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .map_err(|source| CollectionError::Read { path: path.to_path_buf(), source })?;

    let mut lines = raw.lines().filter(|line| !line.trim().is_empty());
    let header_line = lines.next().ok_or_else(|| CollectionError::Empty {
        path: path.to_path_buf(),
    })?;

    let delimiter = detect_delimiter(&raw);
    debug!(?delimiter, "detected collection delimiter");

    let headers = split_row(header_line, delimiter);
    let columns = identify_columns(&headers)?;

    let mut collection = Collection::new();
    let mut skipped = 0usize;
    for line in lines {
        let fields = split_row(line, delimiter);
        let Some(name) = fields.get(columns.name).map(|field| field.trim()) else {
            skipped += 1;
            continue;
        };
        if name.is_empty() {
            skipped += 1;
            continue;
        }

        let quantity = columns
            .quantity
            .and_then(|idx| fields.get(idx))
            .and_then(|field| parse_quantity(field))
            .unwrap_or(1);
        let set_code = columns
            .set
            .and_then(|idx| fields.get(idx))
            .map(|field| field.trim().to_string())
            .unwrap_or_default();

        let entry = CardEntry::new(name, quantity, &set_code);
        collection
            .entry(entry.normalized_name.clone())
            .and_modify(|existing| existing.quantity += quantity)
            .or_insert(entry);
    }

    if collection.is_empty() {
        return Err(CollectionError::Empty { path: path.to_path_buf() });
    }
    if skipped > 0 {
        warn!(skipped, "skipped unparseable collection rows");
    }
    info!(cards = collection.len(), path = %path.display(), "collection loaded");
    Ok(collection)
}

struct ColumnLayout {
    name: usize,
    quantity: Option<usize>,
    set: Option<usize>,
}

fn identify_columns(headers: &[String]) -> Result<ColumnLayout, CollectionError> {
    let lowered: Vec<String> =
        headers.iter().map(|header| header.trim().to_lowercase()).collect();

    let mut name = None;
    let mut quantity = None;
    let mut set = None;
    for (index, header) in lowered.iter().enumerate() {
        if name.is_none() && NAME_HEADERS.contains(&header.as_str()) {
            name = Some(index);
        } else if quantity.is_none() && QUANTITY_HEADERS.contains(&header.as_str()) {
            quantity = Some(index);
        } else if set.is_none() && SET_HEADERS.contains(&header.as_str()) {
            set = Some(index);
        }
    }

    // Loose fallback: any header mentioning "name" that is not a set or file
    // name, else assume the first column holds card names.
    let name = name
        .or_else(|| {
            lowered.iter().position(|header| {
                header.contains("name")
                    && !["binder", "set", "file"].iter().any(|noise| header.contains(noise))
            })
        })
        .or(if headers.is_empty() { None } else { Some(0) })
        .ok_or_else(|| CollectionError::MissingNameColumn { headers: headers.to_vec() })?;

    Ok(ColumnLayout { name, quantity, set })
}

/// Pick the delimiter whose per-line count is positive and consistent across
/// the first few lines. Candidates are tried in order of preference.
fn detect_delimiter(sample: &str) -> char {
    let lines: Vec<&str> =
        sample.lines().filter(|line| !line.trim().is_empty()).take(5).collect();
    for candidate in [',', ';', '\t', '|'] {
        let counts: Vec<usize> =
            lines.iter().map(|line| line.matches(candidate).count()).collect();
        if let Some(&first) = counts.first() {
            if first > 0 && counts.iter().all(|&count| count == first) {
                return candidate;
            }
        }
    }
    ','
}

/// Split one row on `delimiter`, honoring double-quoted fields with doubled
/// quote escapes.
fn split_row(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == delimiter {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    fields.push(current);
    fields
}

/// Quantities show up as "4", "4.0", or "x4"; keep the digits and parse.
fn parse_quantity(field: &str) -> Option<u32> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return None;
    }
    let digits: String =
        trimmed.chars().take_while(|ch| ch.is_ascii_digit() || *ch == '.').collect();
    let digits = if digits.is_empty() {
        trimmed.chars().filter(|ch| ch.is_ascii_digit()).collect()
    } else {
        digits
    };
    digits.parse::<f64>().ok().map(|value| value.max(0.0) as u32).filter(|&value| value > 0)
}
