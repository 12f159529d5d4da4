use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use cellarscope_model::{WineEntry, WineType};

use crate::numbers::rounded_percent;

pub const TOP_COUNTRY_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub wine_type: WineType,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryCount {
    pub country: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VintageRange {
    pub oldest: u16,
    pub newest: u16,
}

/// Summary of the cached catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub total: usize,
    pub by_type: Vec<TypeCount>,
    pub top_countries: Vec<CountryCount>,
    pub rated: usize,
    pub average_rating: Option<f32>,
    pub vintages: Option<VintageRange>,
    pub oldest_cached: Option<DateTime<Utc>>,
    pub newest_cached: Option<DateTime<Utc>>,
    pub stale: usize,
    pub fresh_percent: u32,
}

impl CacheStats {
    /// An entry is stale when it has no `cached_at` or is at least `max_age` old.
    pub fn compute(entries: &[WineEntry], now: DateTime<Utc>, max_age: Duration) -> Self {
        let mut types: BTreeMap<&WineType, usize> = BTreeMap::new();
        let mut countries: HashMap<&str, usize> = HashMap::new();
        let mut rating_sum = 0f64;
        let mut rated = 0usize;
        let mut vintages: Option<VintageRange> = None;
        let mut oldest_cached: Option<DateTime<Utc>> = None;
        let mut newest_cached: Option<DateTime<Utc>> = None;
        let mut stale = 0usize;

        for wine in entries {
            *types.entry(&wine.wine_type).or_default() += 1;

            let country = wine.country.trim();
            if !country.is_empty() {
                *countries.entry(country).or_default() += 1;
            }

            if let Some(rating) = wine.rating {
                rated += 1;
                rating_sum += f64::from(rating);
            }

            if let Some(vintage) = wine.vintage {
                vintages = Some(match vintages {
                    Some(range) => VintageRange {
                        oldest: range.oldest.min(vintage),
                        newest: range.newest.max(vintage),
                    },
                    None => VintageRange {
                        oldest: vintage,
                        newest: vintage,
                    },
                });
            }

            match wine.cached_at {
                Some(cached_at) => {
                    oldest_cached = Some(oldest_cached.map_or(cached_at, |t| t.min(cached_at)));
                    newest_cached = Some(newest_cached.map_or(cached_at, |t| t.max(cached_at)));
                    if now - cached_at >= max_age {
                        stale += 1;
                    }
                }
                None => stale += 1,
            }
        }

        let by_type = types
            .into_iter()
            .map(|(wine_type, count)| TypeCount {
                wine_type: wine_type.clone(),
                label: wine_type.label().to_string(),
                count,
            })
            .collect();

        let mut top_countries: Vec<CountryCount> = countries
            .into_iter()
            .map(|(country, count)| CountryCount {
                country: country.to_string(),
                count,
            })
            .collect();
        top_countries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.country.cmp(&b.country)));
        top_countries.truncate(TOP_COUNTRY_COUNT);

        let average_rating = (rated > 0).then(|| (rating_sum / rated as f64) as f32);
        let total = entries.len();

        CacheStats {
            total,
            by_type,
            top_countries,
            rated,
            average_rating,
            vintages,
            oldest_cached,
            newest_cached,
            stale,
            fresh_percent: rounded_percent(total - stale, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::{cached_wine, wine};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap()
    }

    #[test]
    fn empty_catalog() {
        let stats = CacheStats::compute(&[], now(), Duration::days(1));
        assert_eq!(stats.total, 0);
        assert_eq!(stats.average_rating, None);
        assert_eq!(stats.vintages, None);
        assert_eq!(stats.fresh_percent, 0);
    }

    #[test]
    fn counts_types_countries_and_ratings() {
        let mut a = cached_wine("a", now());
        a.wine_type = WineType::Red;
        a.country = "Italy".into();
        a.rating = Some(4.0);
        a.vintage = Some(2015);
        let mut b = cached_wine("b", now());
        b.wine_type = WineType::Red;
        b.country = "France".into();
        b.rating = Some(3.0);
        b.vintage = Some(2019);
        let mut c = cached_wine("c", now());
        c.wine_type = WineType::White;
        c.country = "Italy".into();

        let stats = CacheStats::compute(&[a, b, c], now(), Duration::days(1));
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_type[0].wine_type, WineType::Red);
        assert_eq!(stats.by_type[0].count, 2);
        assert_eq!(stats.top_countries[0].country, "Italy");
        assert_eq!(stats.top_countries[1].country, "France");
        assert_eq!(stats.rated, 2);
        assert_eq!(stats.average_rating, Some(3.5));
        assert_eq!(
            stats.vintages,
            Some(VintageRange {
                oldest: 2015,
                newest: 2019
            })
        );
    }

    #[test]
    fn staleness_counts_missing_and_old_entries() {
        let fresh = cached_wine("fresh", now() - Duration::hours(2));
        let old = cached_wine("old", now() - Duration::days(3));
        let unknown = wine("unknown");

        let stats = CacheStats::compute(&[fresh, old, unknown], now(), Duration::days(1));
        assert_eq!(stats.stale, 2);
        assert_eq!(stats.fresh_percent, 33);
        assert_eq!(stats.oldest_cached, Some(now() - Duration::days(3)));
        assert_eq!(stats.newest_cached, Some(now() - Duration::hours(2)));
    }

    #[test]
    fn country_ties_break_by_name() {
        let mut entries = Vec::new();
        for (id, country) in [("1", "Spain"), ("2", "Chile"), ("3", " ")] {
            let mut entry = wine(id);
            entry.country = country.into();
            entries.push(entry);
        }
        let stats = CacheStats::compute(&entries, now(), Duration::days(1));
        let names: Vec<&str> = stats.top_countries.iter().map(|c| c.country.as_str()).collect();
        assert_eq!(names, vec!["Chile", "Spain"]);
    }
}
