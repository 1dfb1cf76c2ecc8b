//! Which page links to show around the current page.

use serde::Serialize;

const MAX_VISIBLE_PAGES: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

/// Page links for `current` out of `total` pages (1-based).
///
/// Up to seven pages are listed in full. Beyond that the first and last pages
/// are always shown around a window of about five pages near `current`, with
/// ellipses marking the gaps.
pub fn page_items(current: usize, total: usize) -> Vec<PageItem> {
    if total <= MAX_VISIBLE_PAGES {
        return (1..=total).map(PageItem::Page).collect();
    }

    let mut items = vec![PageItem::Page(1)];

    let mut start = current.saturating_sub(2).max(2);
    let mut end = (current + 2).min(total - 1);
    if current <= 4 {
        end = 5;
    } else if current >= total - 3 {
        start = total - 4;
    }

    if start > 2 {
        items.push(PageItem::Ellipsis);
    }
    items.extend((start..=end).map(PageItem::Page));
    if end < total - 1 {
        items.push(PageItem::Ellipsis);
    }

    items.push(PageItem::Page(total));
    items
}

/// Compact text rendering, e.g. `1 … 4 5 [6] 7 8 … 20`.
pub fn render_page_items(current: usize, total: usize) -> String {
    page_items(current, total)
        .into_iter()
        .map(|item| match item {
            PageItem::Page(n) if n == current => format!("[{n}]"),
            PageItem::Page(n) => n.to_string(),
            PageItem::Ellipsis => "…".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
