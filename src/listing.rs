use crate::constants::{KEY_DISPLAY_MAX, KEY_DISPLAY_TAIL, LISTING_DATE_FORMAT};
use crate::storage::StorageEntry;
use crate::utils::format_bytes;
use std::cmp::Ordering;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Name,
    Size,
    Date,
}

impl SortKey {
    /// Parses a sort token. Unknown tokens sort by name.
    pub fn parse(token: &str) -> Self {
        match token.trim().to_lowercase().as_str() {
            "size" => SortKey::Size,
            "date" => SortKey::Date,
            _ => SortKey::Name,
        }
    }

    fn compare(&self, a: &StorageEntry, b: &StorageEntry) -> Ordering {
        match self {
            SortKey::Name => a.key.cmp(&b.key),
            SortKey::Size => a.size.cmp(&b.size),
            SortKey::Date => a.last_modified.cmp(&b.last_modified),
        }
    }
}

/// One rendered line of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    /// Full key, for anything that acts on the object.
    pub key: String,
    pub display_key: String,
    pub size: String,
    pub modified: String,
    pub url: String,
}

/// Shortens keys longer than 38 characters to `"..."` plus their last 35.
pub fn display_key(key: &str) -> String {
    let len = key.chars().count();
    if len <= KEY_DISPLAY_MAX {
        return key.to_string();
    }
    let tail: String = key.chars().skip(len - KEY_DISPLAY_TAIL).collect();
    format!("...{}", tail)
}

/// Sorts in place. The sort is stable, so equal entries keep backend order in
/// both directions.
pub fn sort_entries(entries: &mut [StorageEntry], key: SortKey, descending: bool) {
    if descending {
        entries.sort_by(|a, b| key.compare(b, a));
    } else {
        entries.sort_by(|a, b| key.compare(a, b));
    }
}

pub fn format_listing(
    mut entries: Vec<StorageEntry>,
    key: SortKey,
    descending: bool,
) -> Vec<ListingRow> {
    sort_entries(&mut entries, key, descending);
    entries
        .into_iter()
        .map(|entry| ListingRow {
            display_key: display_key(&entry.key),
            size: format_bytes(entry.size),
            modified: entry.last_modified.format(LISTING_DATE_FORMAT).to_string(),
            url: entry.url,
            key: entry.key,
        })
        .collect()
}

/// Renders rows as a fixed-width table with a total line.
pub fn render_listing(rows: &[ListingRow], show_urls: bool) -> String {
    if rows.is_empty() {
        return "No objects found.\n".to_string();
    }

    let mut out = String::new();
    let _ = write!(out, "{:<40} {:<15} {:<20}", "KEY", "SIZE", "LAST MODIFIED");
    if show_urls {
        let _ = write!(out, " {:<60}", "URL");
    }
    out.push('\n');
    out.push_str(&"-".repeat(80));
    out.push('\n');

    for row in rows {
        let _ = write!(out, "{:<40} {:<15} {:<20}", row.display_key, row.size, row.modified);
        if show_urls {
            let _ = write!(out, " {}", row.url);
        }
        out.push('\n');
    }

    let _ = writeln!(out, "\nTotal: {} objects", rows.len());
    out
}
