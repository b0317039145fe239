//! Paged query parameters and result envelope.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Sort direction of a [`SearchQuery`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// Uniform input of every `find_all`.
///
/// `page` is 0-indexed. `terms` is a free-text filter; its meaning (which
/// attributes are matched) belongs to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub page: u32,
    pub per_page: u32,
    #[serde(default)]
    pub terms: String,
    #[serde(default = "default_sort")]
    pub sort: String,
    #[serde(default)]
    pub direction: Direction,
}

fn default_sort() -> String {
    "createdAt".to_string()
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            page: 0,
            per_page: 20,
            terms: String::new(),
            sort: default_sort(),
            direction: Direction::Asc,
        }
    }
}

impl SearchQuery {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page,
            per_page,
            ..Self::default()
        }
    }

    pub fn with_terms(mut self, terms: impl Into<String>) -> Self {
        self.terms = terms.into();
        self
    }

    pub fn sorted_by(mut self, sort: impl Into<String>, direction: Direction) -> Self {
        self.sort = sort.into();
        self.direction = direction;
        self
    }

    /// Number of items preceding the requested page.
    pub fn offset(&self) -> usize {
        self.page as usize * self.per_page as usize
    }

    /// Cut the requested page out of an already filtered and sorted list.
    pub fn paginate<T>(&self, items: Vec<T>) -> Pagination<T> {
        let total_items = items.len() as u64;
        let page = items
            .into_iter()
            .skip(self.offset())
            .take(self.per_page as usize)
            .collect();

        Pagination::new(self.page, self.per_page, total_items, page)
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination<T> {
    pub current_page: u32,
    pub per_page: u32,
    pub total_pages: u64,
    pub total_items: u64,
    pub items: Vec<T>,
}

impl<T> Pagination<T> {
    pub fn new(current_page: u32, per_page: u32, total_items: u64, items: Vec<T>) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            total_items.div_ceil(per_page as u64)
        };

        Self {
            current_page,
            per_page,
            total_pages,
            total_items,
            items,
        }
    }

    /// Same page metadata, every item transformed by `f`.
    pub fn map<U, F>(self, f: F) -> Pagination<U>
    where
        F: FnMut(T) -> U,
    {
        Pagination {
            current_page: self.current_page,
            per_page: self.per_page,
            total_pages: self.total_pages,
            total_items: self.total_items,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}
