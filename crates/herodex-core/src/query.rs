//! List query pipeline: filter, sort, paginate.
//!
//! The pipeline is a pure function over a slice of heroes. Raw request
//! parameters arrive as [`ListParams`] and are normalised into a
//! [`HeroQuery`] before running, so malformed paging values never fail a
//! request; they fall back to the defaults instead.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::hero::Hero;

/// Page used when none (or an unusable one) is supplied.
pub const DEFAULT_PAGE: usize = 1;

/// Page size used when none (or an unusable one) is supplied.
pub const DEFAULT_LIMIT: usize = 5;

/// Raw list parameters as they appear in a query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListParams {
    /// Keep heroes with this attack type.
    #[serde(default)]
    pub attack_type: Option<String>,
    /// Keep heroes with this primary attribute.
    #[serde(default)]
    pub primary_attr: Option<String>,
    /// `asc` or `desc`; anything else keeps collection order.
    #[serde(default, rename = "sortBy")]
    pub sort_by: Option<String>,
    /// 1-based page index.
    #[serde(default)]
    pub page: Option<String>,
    /// Page size.
    #[serde(default)]
    pub limit: Option<String>,
}

/// Ordering applied to the filtered heroes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Collection (insertion) order.
    #[default]
    Insertion,
    /// By name, ascending.
    Ascending,
    /// By name, descending.
    Descending,
}

impl SortOrder {
    /// Parses the `sortBy` value. Only exact `asc` and `desc` select an order.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("asc") => Self::Ascending,
            Some("desc") => Self::Descending,
            _ => Self::Insertion,
        }
    }
}

/// A normalised list query.
///
/// Built from [`ListParams`] or with the `with_*` methods, so `page` and
/// `limit` are never zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroQuery {
    attack_type: Option<String>,
    primary_attr: Option<String>,
    sort: SortOrder,
    page: usize,
    limit: usize,
}

impl Default for HeroQuery {
    fn default() -> Self {
        Self {
            attack_type: None,
            primary_attr: None,
            sort: SortOrder::Insertion,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl From<&ListParams> for HeroQuery {
    fn from(params: &ListParams) -> Self {
        Self {
            attack_type: non_empty(params.attack_type.as_deref()),
            primary_attr: non_empty(params.primary_attr.as_deref()),
            sort: SortOrder::parse(params.sort_by.as_deref()),
            page: positive_or(params.page.as_deref(), DEFAULT_PAGE),
            limit: positive_or(params.limit.as_deref(), DEFAULT_LIMIT),
        }
    }
}

impl HeroQuery {
    /// Attack type filter, compared case-insensitively.
    #[must_use]
    pub fn attack_type(&self) -> Option<&str> {
        self.attack_type.as_deref()
    }

    /// Primary attribute filter, compared case-insensitively.
    #[must_use]
    pub fn primary_attr(&self) -> Option<&str> {
        self.primary_attr.as_deref()
    }

    /// Sort order.
    #[must_use]
    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    /// 1-based page.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Page size.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Sets the attack type filter.
    #[must_use]
    pub fn with_attack_type(mut self, attack_type: impl Into<String>) -> Self {
        self.attack_type = Some(attack_type.into());
        self
    }

    /// Sets the primary attribute filter.
    #[must_use]
    pub fn with_primary_attr(mut self, primary_attr: impl Into<String>) -> Self {
        self.primary_attr = Some(primary_attr.into());
        self
    }

    /// Sets the sort order.
    #[must_use]
    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Sets the page and page size. Zero values fall back to the defaults.
    #[must_use]
    pub fn with_page(mut self, page: usize, limit: usize) -> Self {
        self.page = if page == 0 { DEFAULT_PAGE } else { page };
        self.limit = if limit == 0 { DEFAULT_LIMIT } else { limit };
        self
    }

    /// Returns `true` if `hero` passes every configured filter.
    #[must_use]
    pub fn matches(&self, hero: &Hero) -> bool {
        let attack_ok = self
            .attack_type
            .as_deref()
            .map_or(true, |wanted| eq_folded(&hero.attack_type, wanted));
        let attr_ok = self
            .primary_attr
            .as_deref()
            .map_or(true, |wanted| eq_folded(&hero.primary_attr, wanted));
        attack_ok && attr_ok
    }

    /// Runs the pipeline over `heroes`, cloning only the returned page.
    #[must_use]
    pub fn run(&self, heroes: &[Hero]) -> HeroPage {
        let mut results: Vec<&Hero> = heroes.iter().filter(|hero| self.matches(hero)).collect();

        match self.sort {
            SortOrder::Insertion => {}
            SortOrder::Ascending => results.sort_by(|a, b| compare_names(&a.name, &b.name)),
            SortOrder::Descending => results.sort_by(|a, b| compare_names(&b.name, &a.name)),
        }

        let page = self.page.max(1);
        let limit = self.limit.max(1);
        let total_items = results.len();
        let start = (page - 1).saturating_mul(limit).min(total_items);
        let end = start.saturating_add(limit).min(total_items);

        HeroPage {
            current_page: page,
            current_limit: limit,
            total_items,
            total_pages: total_items.div_ceil(limit),
            heroes: results[start..end].iter().copied().cloned().collect(),
        }
    }
}

/// One page of list results plus paging metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroPage {
    /// Requested page.
    pub current_page: usize,
    /// Page size in effect.
    pub current_limit: usize,
    /// Heroes that passed the filters, before paging.
    pub total_items: usize,
    /// `ceil(total_items / current_limit)`.
    pub total_pages: usize,
    /// The heroes on this page.
    pub heroes: Vec<Hero>,
}

/// Name ordering: case-insensitive first, then lowercase before uppercase
/// when two names differ only in case.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

fn eq_folded(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

/// Accepts any positive integral number, including `2.0` and `1e1`.
fn positive_or(raw: Option<&str>, default: usize) -> usize {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite() && *value >= 1.0 && value.fract() == 0.0)
        .map_or(default, |value| value.min(usize::MAX as f64) as usize)
}
