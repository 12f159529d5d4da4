use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WineType {
    Red,
    White,
    Rose,
    Sparkling,
    Dessert,
    Fortified,
    Other(String),
}

impl WineType {
    pub fn all() -> &'static [WineType] {
        use WineType::*;
        &[Red, White, Rose, Sparkling, Dessert, Fortified]
    }

    /// Case-insensitive parse; `rosé` and `rose` are the same type.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "red" => WineType::Red,
            "white" => WineType::White,
            "rose" | "rosé" => WineType::Rose,
            "sparkling" => WineType::Sparkling,
            "dessert" => WineType::Dessert,
            "fortified" => WineType::Fortified,
            _ => WineType::Other(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            WineType::Red => "red",
            WineType::White => "white",
            WineType::Rose => "rose",
            WineType::Sparkling => "sparkling",
            WineType::Dessert => "dessert",
            WineType::Fortified => "fortified",
            WineType::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            WineType::Red => "Red",
            WineType::White => "White",
            WineType::Rose => "Rosé",
            WineType::Sparkling => "Sparkling",
            WineType::Dessert => "Dessert",
            WineType::Fortified => "Fortified",
            WineType::Other(raw) => raw,
        }
    }
}

impl Default for WineType {
    fn default() -> Self {
        WineType::Other(String::new())
    }
}

impl From<String> for WineType {
    fn from(raw: String) -> Self {
        WineType::parse(&raw)
    }
}

impl From<WineType> for String {
    fn from(value: WineType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for WineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One wine as served by the catalog API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WineEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub winery: String,
    #[serde(default)]
    pub vintage: Option<u16>,
    #[serde(default, alias = "type")]
    pub wine_type: WineType,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub grapes: Vec<String>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub price: Option<f64>,
    /// When the catalog service last refreshed this entry.
    #[serde(default, alias = "cached_at")]
    pub cached_at: Option<DateTime<Utc>>,
}

/// A single page of the remote catalog listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    #[serde(default)]
    pub wines: Vec<WineEntry>,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "first_page", alias = "total_pages")]
    pub total_pages: u32,
    #[serde(default)]
    pub total: u64,
}

fn first_page() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wine_type_parse_is_case_insensitive() {
        assert_eq!(WineType::parse("Red"), WineType::Red);
        assert_eq!(WineType::parse("ROSÉ"), WineType::Rose);
        assert_eq!(WineType::parse(" orange "), WineType::Other("orange".into()));
    }

    #[test]
    fn catalog_page_accepts_sparse_payloads() {
        let page: CatalogPage = serde_json::from_str(
            r#"{"wines":[{"id":"w1","name":"Barolo","type":"red","vintage":2016}]}"#,
        )
        .unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.wines[0].wine_type, WineType::Red);
        assert_eq!(page.wines[0].vintage, Some(2016));
        assert!(page.wines[0].cached_at.is_none());
    }
}
