use chrono::NaiveDate;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// The marketplaces with hand-tuned extraction rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    AliExpress,
    Alibaba,
    Temu,
    MadeInChina,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::AliExpress,
        Platform::Alibaba,
        Platform::Temu,
        Platform::MadeInChina,
    ];
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::AliExpress => write!(f, "AliExpress"),
            Platform::Alibaba => write!(f, "Alibaba"),
            Platform::Temu => write!(f, "Temu"),
            Platform::MadeInChina => write!(f, "MadeInChina"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown platform \"{0}\"; expected one of aliexpress, alibaba, temu, madeinchina")]
pub struct UnknownPlatform(pub String);

impl std::str::FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "aliexpress" => Ok(Platform::AliExpress),
            "alibaba" => Ok(Platform::Alibaba),
            "temu" => Ok(Platform::Temu),
            "madeinchina" | "mic" => Ok(Platform::MadeInChina),
            _ => Err(UnknownPlatform(s.to_string())),
        }
    }
}

/// Platform-specific attributes of a record, kept in the order they were
/// inserted so every platform emits its columns in a stable sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extensions(Vec<(String, Value)>);

impl Extensions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` under `key`, replacing an existing entry in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.0.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.0.push((key, value));
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }
}

/// Reads entries in document order; a repeated key keeps its first position.
impl<'de> Deserialize<'de> for Extensions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ExtensionsVisitor;

        impl<'de> Visitor<'de> for ExtensionsVisitor {
            type Value = Extensions;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map of extension values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Extensions, A::Error> {
                let mut extensions = Extensions::new();
                while let Some((key, value)) = access.next_entry::<String, serde_json::Value>()? {
                    extensions.insert(key, value);
                }
                Ok(extensions)
            }
        }

        deserializer.deserialize_map(ExtensionsVisitor)
    }
}

impl Serialize for Extensions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// One scraped listing in the canonical cross-market schema.
///
/// `price_original >= price` is not enforced: marketplaces occasionally
/// render inverted pairs and consumers must tolerate them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub title: String,
    pub price: Option<f64>,
    pub price_original: Option<f64>,
    pub discount_text: Option<String>,
    pub sales_count: u64,
    pub link: String,
    pub page_index: u32,
    pub platform: Platform,
    pub scrape_date: NaiveDate,
    pub currency_symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Extensions::is_empty")]
    pub extensions: Extensions,
}
