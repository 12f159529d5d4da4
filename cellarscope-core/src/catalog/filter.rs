//! Browsing controls for the cached wine catalog.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use cellarscope_model::{WineEntry, WineType};

use crate::error::FilterError;

pub const DEFAULT_CATALOG_LIMIT: usize = 50;
pub const MAX_CATALOG_LIMIT: usize = 500;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSort {
    #[default]
    Name,
    Rating,
    Vintage,
    CachedAt,
}

impl CatalogSort {
    pub fn parse(raw: &str) -> Result<Self, FilterError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "name" => Ok(CatalogSort::Name),
            "rating" => Ok(CatalogSort::Rating),
            "vintage" => Ok(CatalogSort::Vintage),
            "cached_at" | "cachedat" | "cached" => Ok(CatalogSort::CachedAt),
            _ => Err(FilterError::UnknownSort(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Result<Self, FilterError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            _ => Err(FilterError::UnknownSort(raw.to_string())),
        }
    }
}

/// Raw catalog controls from a query string.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default, rename = "type")]
    pub wine_type: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub min_rating: Option<f32>,
    #[serde(default)]
    pub vintage_from: Option<u16>,
    #[serde(default)]
    pub vintage_to: Option<u16>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
    #[serde(default)]
    pub offset: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogFilter {
    search: Option<String>,
    pub wine_type: Option<WineType>,
    country: Option<String>,
    pub min_rating: Option<f32>,
    pub vintage_from: Option<u16>,
    pub vintage_to: Option<u16>,
    pub sort: CatalogSort,
    pub order: SortOrder,
    pub offset: usize,
    pub limit: usize,
}

/// A page of matches plus the number of matches before paging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSlice<'a> {
    pub total_matches: usize,
    pub wines: Vec<&'a WineEntry>,
}

impl Default for CatalogFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogFilter {
    pub fn new() -> Self {
        CatalogFilter {
            search: None,
            wine_type: None,
            country: None,
            min_rating: None,
            vintage_from: None,
            vintage_to: None,
            sort: CatalogSort::Name,
            order: SortOrder::Ascending,
            offset: 0,
            limit: DEFAULT_CATALOG_LIMIT,
        }
    }

    pub fn from_query(query: &CatalogQuery) -> Result<Self, FilterError> {
        if let (Some(from), Some(to)) = (query.vintage_from, query.vintage_to)
            && from > to
        {
            return Err(FilterError::InvalidRange(format!(
                "vintage {from} is after {to}"
            )));
        }
        if let Some(rating) = query.min_rating
            && !rating.is_finite()
        {
            return Err(FilterError::InvalidRange("min rating must be a number".into()));
        }

        let mut filter = CatalogFilter::new()
            .with_search(query.search.as_deref())
            .with_country(query.country.as_deref());
        filter.wine_type = non_blank(query.wine_type.as_deref()).map(WineType::parse);
        filter.min_rating = query.min_rating;
        filter.vintage_from = query.vintage_from;
        filter.vintage_to = query.vintage_to;
        filter.sort = match query.sort.as_deref() {
            Some(raw) => CatalogSort::parse(raw)?,
            None => CatalogSort::Name,
        };
        filter.order = match query.order.as_deref() {
            Some(raw) => SortOrder::parse(raw)?,
            None => SortOrder::Ascending,
        };
        filter.offset = query.offset.unwrap_or(0);
        filter.limit = query
            .limit
            .unwrap_or(DEFAULT_CATALOG_LIMIT)
            .clamp(1, MAX_CATALOG_LIMIT);
        Ok(filter)
    }

    pub fn with_search(mut self, search: Option<&str>) -> Self {
        self.search = non_blank(search).map(|s| s.trim().to_lowercase());
        self
    }

    pub fn with_country(mut self, country: Option<&str>) -> Self {
        self.country = non_blank(country).map(|s| s.trim().to_lowercase());
        self
    }

    pub fn matches(&self, wine: &WineEntry) -> bool {
        if let Some(needle) = &self.search {
            let in_text = [&wine.name, &wine.winery, &wine.region]
                .iter()
                .any(|field| field.to_lowercase().contains(needle.as_str()));
            let in_grapes = wine
                .grapes
                .iter()
                .any(|grape| grape.to_lowercase().contains(needle.as_str()));
            if !in_text && !in_grapes {
                return false;
            }
        }

        if let Some(kind) = &self.wine_type
            && &wine.wine_type != kind
        {
            return false;
        }

        if let Some(country) = &self.country
            && wine.country.trim().to_lowercase() != *country
        {
            return false;
        }

        if let Some(min) = self.min_rating {
            match wine.rating {
                Some(rating) if rating >= min => {}
                _ => return false,
            }
        }

        if self.vintage_from.is_some() || self.vintage_to.is_some() {
            let Some(vintage) = wine.vintage else {
                return false;
            };
            if self.vintage_from.is_some_and(|from| vintage < from)
                || self.vintage_to.is_some_and(|to| vintage > to)
            {
                return false;
            }
        }

        true
    }

    /// Filter, sort, then page. Entries lacking the sort key go last in
    /// either order.
    pub fn apply<'a>(&self, wines: &'a [WineEntry]) -> CatalogSlice<'a> {
        let mut matches: Vec<&WineEntry> =
            wines.iter().filter(|wine| self.matches(wine)).collect();
        matches.sort_by(|a, b| self.compare(a, b));

        let total_matches = matches.len();
        let wines = matches
            .into_iter()
            .skip(self.offset)
            .take(self.limit)
            .collect();

        CatalogSlice {
            total_matches,
            wines,
        }
    }

    fn compare(&self, a: &WineEntry, b: &WineEntry) -> Ordering {
        let keyed = match self.sort {
            CatalogSort::Name => {
                Some(self.directed(a.name.to_lowercase().cmp(&b.name.to_lowercase())))
            }
            CatalogSort::Rating => self.optional(a.rating, b.rating, |x, y| {
                x.partial_cmp(y).unwrap_or(Ordering::Equal)
            }),
            CatalogSort::Vintage => self.optional(a.vintage, b.vintage, Ord::cmp),
            CatalogSort::CachedAt => {
                self.optional(a.cached_at, b.cached_at, Ord::cmp)
            }
        };

        keyed
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.id.cmp(&b.id))
    }

    fn directed(&self, ordering: Ordering) -> Ordering {
        match self.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }

    fn optional<T>(
        &self,
        a: Option<T>,
        b: Option<T>,
        cmp: impl Fn(&T, &T) -> Ordering,
    ) -> Option<Ordering> {
        match (a, b) {
            (Some(x), Some(y)) => Some(self.directed(cmp(&x, &y))),
            (Some(_), None) => Some(Ordering::Less),
            (None, Some(_)) => Some(Ordering::Greater),
            (None, None) => None,
        }
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.filter(|value| !value.trim().is_empty())
}
