use axum::http::header::HeaderMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Default and maximum page sizes applied when resolving query parameters.
#[derive(Debug, Clone, Copy)]
pub struct PageLimits {
    pub default_per_page: u64,
    pub max_per_page: u64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_per_page: 10,
            max_per_page: 100,
        }
    }
}

impl PageLimits {
    /// Resolve optional query parameters into a concrete page request.
    ///
    /// `page` is 1-based on the wire and converted to the 0-based form the
    /// paginator uses; `per_page` is clamped to `1..=max_per_page`.
    #[must_use]
    pub fn resolve(&self, page: Option<u64>, per_page: Option<u64>) -> PageRequest {
        PageRequest {
            page: page.map_or(0, |p| p.saturating_sub(1)),
            per_page: per_page
                .unwrap_or(self.default_per_page)
                .clamp(1, self.max_per_page),
        }
    }
}

/// One requested page: 0-based page index and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    /// Build a request; `per_page` is raised to at least 1.
    #[must_use]
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page,
            per_page: per_page.max(1),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageLimits::default().resolve(None, None)
    }
}

/// One page of rows with the totals and geometry needed for response shaping.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: u64,
    pub total_pages: u64,
    /// 0-based index of this page.
    pub page: u64,
    pub per_page: u64,
}

impl<T> Page<T> {
    /// Generate the Content-Range and X-Total-Count headers for this page.
    ///
    /// Content-Range reads `<resource_name> <first>-<last>/<total>`, e.g.
    /// `heroes 0-9/23`; X-Total-Count carries the total on its own for
    /// clients that only want the count.
    ///
    /// # Panics
    ///
    /// Panics if `resource_name` contains characters that are not valid in a
    /// header value.
    #[must_use]
    pub fn content_range(&self, resource_name: &str) -> HeaderMap {
        let offset = self.page * self.per_page;
        let max_offset_limit = (offset + self.per_page - 1).min(self.total_items);

        let total_items = self.total_items;
        let content_range = format!("{resource_name} {offset}-{max_offset_limit}/{total_items}");

        let mut headers = HeaderMap::new();
        headers.insert("Content-Range", content_range.parse().unwrap());
        headers.insert("X-Total-Count", self.total_items.into());

        headers
    }
}
