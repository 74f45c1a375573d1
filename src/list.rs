use crate::constants::INFO_PREFIX;
use crate::error::Result;
use crate::listing::{format_listing, render_listing, ListingRow, SortKey};
use crate::storage::ObjectStore;

#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub prefix: String,
    /// 0 means no cap.
    pub limit: usize,
    pub sort: SortKey,
    pub descending: bool,
    pub show_urls: bool,
}

/// Lists objects under a prefix and prints them as a sorted table.
pub fn list_objects(store: &dyn ObjectStore, options: &ListOptions) -> Result<Vec<ListingRow>> {
    store.ensure_ready()?;

    if options.prefix.is_empty() {
        println!("{} Listing objects in bucket '{}'", INFO_PREFIX, store.bucket_name());
    } else {
        println!(
            "{} Listing objects in bucket '{}' with prefix '{}'",
            INFO_PREFIX,
            store.bucket_name(),
            options.prefix
        );
    }

    let entries = store.list(&options.prefix, options.limit)?;
    let rows = format_listing(entries, options.sort, options.descending);
    print!("{}", render_listing(&rows, options.show_urls));

    Ok(rows)
}
