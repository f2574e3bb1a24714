use serde::Serialize;

/// TMDB refuses `page` values above this.
pub const MAX_REMOTE_PAGE: u32 = 500;
pub const MAX_PAGE_BUTTONS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaginationMode {
    /// Page metadata comes from the provider; each page is a fresh fetch.
    Remote,
    /// Single page fabricated after local filtering.
    Synthesized,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub mode: PaginationMode,
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u32,
}

impl Pagination {
    /// Snapshot of the page the provider returned. An empty result set sits on page 1.
    pub fn remote(page: u32, total_pages: u32, total_results: u32) -> Self {
        let total_pages = total_pages.min(MAX_REMOTE_PAGE);
        let page = if total_pages == 0 { 1 } else { page.max(1) };
        Self {
            mode: PaginationMode::Remote,
            page,
            total_pages,
            total_results,
        }
    }

    /// Whether this page lies past the last page the provider reported.
    pub fn is_past_end(&self) -> bool {
        self.total_pages > 0 && self.page > self.total_pages
    }

    pub fn synthesized(result_count: usize) -> Self {
        Self {
            mode: PaginationMode::Synthesized,
            page: 1,
            total_pages: u32::from(result_count > 0),
            total_results: result_count as u32,
        }
    }

    /// Target of a "go to page" action, or `None` if it would not fetch anything.
    pub fn target(&self, requested: u32) -> Option<u32> {
        if self.mode == PaginationMode::Synthesized {
            return None;
        }
        if requested < 1 || requested > self.total_pages || requested == self.page {
            return None;
        }
        Some(requested)
    }

    pub fn next(&self) -> Option<u32> {
        self.target(self.page.saturating_add(1))
    }

    pub fn previous(&self) -> Option<u32> {
        self.target(self.page.saturating_sub(1))
    }

    pub fn window(&self) -> Vec<u32> {
        page_window(self.page, self.total_pages)
    }
}

/// Page-number strip of at most five buttons around `current`, clamped to `[1, total]`.
pub fn page_window(current: u32, total: u32) -> Vec<u32> {
    if total == 0 {
        return Vec::new();
    }
    if total <= MAX_PAGE_BUTTONS {
        return (1..=total).collect();
    }
    let half = MAX_PAGE_BUTTONS / 2;
    let current = current.clamp(1, total);
    let start = current
        .saturating_sub(half)
        .max(1)
        .min(total - MAX_PAGE_BUTTONS + 1);
    (start..start + MAX_PAGE_BUTTONS).collect()
}

/// Clamp a user-supplied page number for a remote fetch.
pub fn requested_page(page: Option<u32>) -> u32 {
    page.unwrap_or(1).clamp(1, MAX_REMOTE_PAGE)
}
