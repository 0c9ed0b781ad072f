//! Keyset pagination cursor codec.
//!
//! The cursor is the reference of the last product on a page. The next page
//! asks for references strictly below it, so a cursor stays usable even when
//! its row has since been deleted.

use crate::models::{Cursor, Product};

pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Absent or non-positive sizes fall back to the default. Positive sizes are
/// honoured as given.
pub fn page_size(requested: Option<i64>) -> i64 {
    match requested {
        Some(size) if size > 0 => size,
        _ => DEFAULT_PAGE_SIZE,
    }
}

/// Decodes an inbound `last_reference`; blank means "first page".
pub fn decode(raw: Option<&str>) -> Option<Cursor> {
    raw.map(str::trim)
        .filter(|reference| !reference.is_empty())
        .map(Cursor::new)
}

/// Cursor for the page after `page`, or `None` when `page` was the last one.
pub fn encode_next(page: &[Product], page_size: i64) -> Option<Cursor> {
    let full = usize::try_from(page_size).is_ok_and(|size| size > 0 && page.len() >= size);
    if !full {
        return None;
    }

    page.last().map(|product| Cursor::new(product.reference.clone()))
}
