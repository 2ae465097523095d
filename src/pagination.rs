//! Page window computation for listing navigation.

use crate::error::AppError;

/// One entry of a rendered page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    /// Elided run of pages
    Ellipsis,
}

/// Navigation description for one listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    /// Pages to link, in ascending order with ellipsis markers over gaps
    pub items: Vec<PageItem>,
    pub current_page: u32,
    pub total_pages: u32,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PageWindow {
    /// Target of the previous control, `None` when it is disabled
    pub fn previous_page(&self) -> Option<u32> {
        self.has_previous.then(|| self.current_page - 1)
    }

    /// Target of the next control, `None` when it is disabled
    pub fn next_page(&self) -> Option<u32> {
        self.has_next.then(|| self.current_page + 1)
    }
}

/// Computes the page window for `current_page` out of `total_pages`
///
/// The window holds the first page, the last page, the pages adjacent to the
/// current one, and an ellipsis wherever pages are skipped. A current page past
/// the last page is clamped to the last page.
///
/// # Arguments
/// * `current_page` - Page being shown, at least 1
/// * `total_pages` - Number of pages the data source reports, at least 0
pub fn compute_window(current_page: i64, total_pages: i64) -> Result<PageWindow, AppError> {
    if total_pages < 0 {
        return Err(AppError::InvalidArgument(format!(
            "total pages must not be negative, got {total_pages}"
        )));
    }
    if current_page < 1 {
        return Err(AppError::InvalidArgument(format!(
            "current page must be at least 1, got {current_page}"
        )));
    }

    let total = u32::try_from(total_pages).map_err(|_| {
        AppError::InvalidArgument(format!("total pages out of range: {total_pages}"))
    })?;
    let requested = u32::try_from(current_page).map_err(|_| {
        AppError::InvalidArgument(format!("current page out of range: {current_page}"))
    })?;
    let current = if total >= 1 { requested.min(total) } else { requested };

    Ok(PageWindow {
        items: page_items(current, total),
        current_page: current,
        total_pages: total,
        has_previous: current > 1,
        has_next: current < total,
    })
}

fn page_items(current: u32, total: u32) -> Vec<PageItem> {
    match total {
        0 => return Vec::new(),
        1 => return vec![PageItem::Page(1)],
        _ => {}
    }

    let mut items = vec![PageItem::Page(1)];
    if current > 3 {
        items.push(PageItem::Ellipsis);
    }

    // bounded to 2..=total-1 so the first and last pages never repeat
    let start = current.saturating_sub(1).max(2);
    let end = current.saturating_add(1).min(total - 1);
    items.extend((start..=end).map(PageItem::Page));

    if u64::from(current) + 2 < u64::from(total) {
        items.push(PageItem::Ellipsis);
    }
    items.push(PageItem::Page(total));
    items
}

/// Reads a page number from a raw `page` query value
///
/// Parses leading digits after optional whitespace and sign, so `"3abc"` is
/// page 3. Missing or unparsable values give page 1 and the result is never
/// below 1.
pub fn parse_page_param(raw: Option<&str>) -> u32 {
    raw.and_then(parse_leading_integer)
        .map_or(1, |page| u32::try_from(page.max(1)).unwrap_or(u32::MAX))
}

fn parse_leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if digits_end == 0 {
        return None;
    }

    let magnitude: i64 = unsigned[..digits_end].parse().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Link to `page` of the listing at `base_path`
pub fn page_url(base_path: &str, page: u32) -> String {
    format!("{base_path}?page={page}")
}
