//! Page windows over the repository.
//!
//! A [`PaginatedResult`] is assembled per request from the current total count.
//! It is never cached: page windows shift on every insert or delete.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::MAX_PAGE_SIZE;
use crate::error::{PlanetsError, Result};

/// Field a page is ordered by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Planet id
    Id,
    /// Planet name
    Name,
    /// Terrain
    Terrain,
    /// Climate
    Climate,
    /// Creation time
    CreatedAt,
    /// Last write time
    UpdatedAt,
}

impl FromStr for SortKey {
    type Err = PlanetsError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().replace('_', "").as_str() {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "terrain" => Ok(Self::Terrain),
            "climate" => Ok(Self::Climate),
            "createdat" => Ok(Self::CreatedAt),
            "updatedat" => Ok(Self::UpdatedAt),
            _ => Err(PlanetsError::ValidationError(format!(
                "unknown sort key '{value}'"
            ))),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Terrain => "terrain",
            Self::Climate => "climate",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        };
        f.write_str(name)
    }
}

/// Sort direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending
    #[default]
    Asc,
    /// Descending
    Desc,
}

/// Ordering of a page: key plus direction.
///
/// Parses `"name"`, `"name,asc"`, or `"name,desc"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sort {
    /// Field to order by
    pub key: SortKey,
    /// Direction of the ordering
    pub direction: Direction,
}

impl Sort {
    /// Ascending order on `key`.
    pub fn asc(key: SortKey) -> Self {
        Self { key, direction: Direction::Asc }
    }

    /// Descending order on `key`.
    pub fn desc(key: SortKey) -> Self {
        Self { key, direction: Direction::Desc }
    }
}

impl Default for Sort {
    fn default() -> Self {
        Self::asc(SortKey::Name)
    }
}

impl FromStr for Sort {
    type Err = PlanetsError;

    fn from_str(value: &str) -> Result<Self> {
        let (key, direction) = match value.split_once(',') {
            Some((key, direction)) => (key, Some(direction)),
            None => (value, None),
        };

        let key = key.parse::<SortKey>()?;
        let direction = match direction.map(|d| d.trim().to_ascii_lowercase()) {
            None => Direction::Asc,
            Some(d) if d == "asc" => Direction::Asc,
            Some(d) if d == "desc" => Direction::Desc,
            Some(d) => {
                return Err(PlanetsError::ValidationError(format!(
                    "unknown sort direction '{d}'"
                )))
            }
        };

        Ok(Self { key, direction })
    }
}

/// A requested page window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Zero-based page index
    pub page_number: u32,
    /// Items per page (1..=MAX_PAGE_SIZE)
    pub page_size: u32,
    /// Ordering applied before slicing
    pub sort: Sort,
}

impl PageRequest {
    /// Creates a validated page request.
    pub fn new(page_number: u32, page_size: u32, sort: Sort) -> Result<Self> {
        if page_size == 0 {
            return Err(PlanetsError::ValidationError(
                "page size must be at least 1".into(),
            ));
        }
        if page_size > MAX_PAGE_SIZE {
            return Err(PlanetsError::ValidationError(format!(
                "page size must be at most {MAX_PAGE_SIZE}, got {page_size}"
            )));
        }

        Ok(Self {
            page_number,
            page_size,
            sort,
        })
    }

    /// Creates a page request from a textual sort key such as `"name,desc"`.
    pub fn parse(page_number: u32, page_size: u32, sort: &str) -> Result<Self> {
        Self::new(page_number, page_size, sort.parse()?)
    }

    /// Number of items preceding this window.
    pub fn offset(&self) -> u64 {
        u64::from(self.page_number) * u64::from(self.page_size)
    }
}

/// One page of results plus the totals needed to navigate the rest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResult<T> {
    /// Items in this window, in sort order
    pub content: Vec<T>,
    /// Total items across all pages
    pub total_elements: u64,
    /// Total pages at the requested size
    pub total_pages: u64,
    /// Requested page size
    pub page_size: u32,
    /// Zero-based index of this page
    pub page_number: u32,
    /// Whether this is the first page
    pub is_first: bool,
    /// Whether no page follows this one
    pub is_last: bool,
}

impl<T> PaginatedResult<T> {
    /// Assembles the envelope for `content` fetched with `request`.
    pub fn new(content: Vec<T>, total_elements: u64, request: &PageRequest) -> Self {
        let page_size = u64::from(request.page_size);
        let total_pages = total_elements.div_ceil(page_size);
        let page_number = request.page_number;

        Self {
            content,
            total_elements,
            total_pages,
            page_size: request.page_size,
            page_number,
            is_first: page_number == 0,
            is_last: u64::from(page_number) + 1 >= total_pages,
        }
    }
}
