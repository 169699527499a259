/// Number of pages needed for `len` rows. Never less than one, so an empty
/// table still has a page to show its placeholder on.
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    len.div_ceil(page_size).max(1)
}

/// Rows of the 1-based `page`. Empty when the page is past the end.
pub fn paginate<T>(rows: &[T], page_size: usize, page: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }

    let start = page_size.saturating_mul(page - 1);
    if start >= rows.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(rows.len());

    &rows[start..end]
}

/// Clamps a requested page into `[1, page_count]`.
pub fn clamp_page(page: usize, len: usize, page_size: usize) -> usize {
    page.clamp(1, page_count(len, page_size))
}
