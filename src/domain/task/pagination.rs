use super::error::TaskServiceError;

/// Page sizing for task listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationSettings {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

impl PaginationSettings {
    /// Requested size capped at the maximum; unusable values fall back to the default.
    pub fn page_size(&self, raw: Option<&str>) -> u64 {
        raw.and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|size| *size > 0)
            .map(|size| size.min(self.max_page_size))
            .unwrap_or(self.default_page_size)
    }
}

/// An empty listing still has a single (empty) page.
pub fn total_pages(count: u64, page_size: u64) -> u64 {
    if count == 0 || page_size == 0 {
        1
    } else {
        count.div_ceil(page_size)
    }
}

/// 1-based page number; accepts `last`. Missing or empty means the first page.
pub fn page_number(raw: Option<&str>, total_pages: u64) -> Result<u64, TaskServiceError> {
    let number = match raw.map(str::trim) {
        None | Some("") => 1,
        Some("last") => total_pages,
        Some(value) => value
            .parse::<u64>()
            .map_err(|_| TaskServiceError::InvalidPage)?,
    };

    if number == 0 || number > total_pages {
        return Err(TaskServiceError::InvalidPage);
    }
    Ok(number)
}
