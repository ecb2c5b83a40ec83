use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::warn;

/// Titles the analysis endpoint returns when it could not scrape one.
pub const NO_TITLE_SENTINELS: &[&str] = &["Título no disponible", "no title available"];

/// Category guesses the analysis endpoint returns when it has no opinion.
pub const NO_CATEGORY_SENTINELS: &[&str] = &["Sin Categoría", "no category"];

/// The fixed set of link categories. Serialized with the labels the backend
/// stores; unknown labels read from the wire become `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum Category {
    Programming,
    Networking,
    Technology,
    Finance,
    Sports,
    Music,
    Education,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Programming,
        Category::Networking,
        Category::Technology,
        Category::Finance,
        Category::Sports,
        Category::Music,
        Category::Education,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Programming => "Programación",
            Category::Networking => "Redes y Ciberseguridad",
            Category::Technology => "Tecnología",
            Category::Finance => "Finanzas",
            Category::Sports => "Deportes",
            Category::Music => "Música",
            Category::Education => "Educación",
            Category::Other => "Otros",
        }
    }

    fn english_name(&self) -> &'static str {
        match self {
            Category::Programming => "programming",
            Category::Networking => "networking",
            Category::Technology => "technology",
            Category::Finance => "finance",
            Category::Sports => "sports",
            Category::Music => "music",
            Category::Education => "education",
            Category::Other => "other",
        }
    }

    /// Strict parse: the wire label (any case) or the English name.
    pub fn parse(label: &str) -> Option<Self> {
        let wanted = label.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        if wanted == "cybersecurity" {
            return Some(Category::Networking);
        }
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().to_lowercase() == wanted || c.english_name() == wanted)
    }

    pub fn next(&self) -> Self {
        let idx = Category::ALL.iter().position(|c| c == self).unwrap_or(0);
        Category::ALL[(idx + 1) % Category::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        let idx = Category::ALL.iter().position(|c| c == self).unwrap_or(0);
        Category::ALL[(idx + Category::ALL.len() - 1) % Category::ALL.len()]
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        Category::parse(&label).unwrap_or_default()
    }
}

impl From<Category> for &'static str {
    fn from(category: Category) -> Self {
        category.as_str()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub id: String,
    pub url: String,
    pub title: String,
    pub category: Category,
}

impl Link {
    /// The title, or the url when no title was stored.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.url
        } else {
            &self.title
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawId {
    Text(String),
    Number(i64),
}

impl RawId {
    fn into_string(self) -> Option<String> {
        match self {
            RawId::Text(s) if !s.trim().is_empty() => Some(s),
            RawId::Text(_) => None,
            RawId::Number(n) => Some(n.to_string()),
        }
    }
}

/// A link record as the backend sends it. Mongo-backed servers use `_id`,
/// others `id`.
#[derive(Debug, Deserialize)]
pub(crate) struct RawLink {
    #[serde(rename = "_id", default)]
    mongo_id: Option<RawId>,
    #[serde(default)]
    id: Option<RawId>,
    #[serde(default)]
    url: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    category: Option<Category>,
}

impl RawLink {
    pub(crate) fn into_link(self) -> Option<Link> {
        let id = self
            .mongo_id
            .and_then(RawId::into_string)
            .or_else(|| self.id.and_then(RawId::into_string));

        let Some(id) = id else {
            warn!("Dropping link record without an id: {}", self.url);
            return None;
        };

        Some(Link {
            id,
            url: self.url,
            title: self.title.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatEntry {
    #[serde(alias = "_id", default, deserialize_with = "nullable_category")]
    pub category: Category,
    pub count: u64,
}

/// A null category (links stored without one) counts as `Other`.
fn nullable_category<'de, D>(deserializer: D) -> Result<Category, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Category>::deserialize(deserializer)?.unwrap_or_default())
}

/// Request body for POST /links and PUT /links/{id}.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkPayload {
    pub url: String,
    pub title: String,
    pub category: Category,
}

/// Response body for a 201 from POST /links.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatedLink {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title_used: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category_guess: Option<String>,
}

impl Analysis {
    /// The suggested title, unless the server sent a "no data" placeholder.
    pub fn suggested_title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty() && !NO_TITLE_SENTINELS.contains(t))
    }

    /// The suggested category, unless it's a placeholder or not a known label.
    pub fn suggested_category(&self) -> Option<Category> {
        self.category_guess
            .as_deref()
            .map(str::trim)
            .filter(|c| !NO_CATEGORY_SENTINELS.contains(c))
            .and_then(Category::parse)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub(crate) error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_accepts_wire_and_english_names() {
        assert_eq!(Category::parse("Finanzas"), Some(Category::Finance));
        assert_eq!(Category::parse("finance"), Some(Category::Finance));
        assert_eq!(Category::parse("  MÚSICA "), Some(Category::Music));
        assert_eq!(Category::parse("Redes y Ciberseguridad"), Some(Category::Networking));
        assert_eq!(Category::parse("Sin Categoría"), None);
        assert_eq!(Category::parse(""), None);
    }

    #[test]
    fn test_category_unknown_label_deserializes_as_other() {
        let category: Category = serde_json::from_str("\"Cocina\"").unwrap();
        assert_eq!(category, Category::Other);
        assert_eq!(serde_json::to_string(&Category::Education).unwrap(), "\"Educación\"");
    }

    #[test]
    fn test_category_cycling_wraps() {
        assert_eq!(Category::Other.next(), Category::Programming);
        assert_eq!(Category::Programming.previous(), Category::Other);
    }

    #[test]
    fn test_raw_link_prefers_mongo_id() {
        let raw: RawLink =
            serde_json::from_str(r#"{"_id": "abc", "id": "def", "url": "https://a.io"}"#).unwrap();
        let link = raw.into_link().unwrap();
        assert_eq!(link.id, "abc");
        assert_eq!(link.category, Category::Other);
        assert_eq!(link.display_title(), "https://a.io");
    }

    #[test]
    fn test_raw_link_without_id_is_dropped() {
        let raw: RawLink = serde_json::from_str(r#"{"url": "https://a.io"}"#).unwrap();
        assert!(raw.into_link().is_none());
    }

    #[test]
    fn test_analysis_sentinels_are_not_suggestions() {
        let analysis = Analysis {
            title: Some("no title available".to_string()),
            category_guess: Some("Finance".to_string()),
        };
        assert_eq!(analysis.suggested_title(), None);
        assert_eq!(analysis.suggested_category(), Some(Category::Finance));

        let analysis = Analysis {
            title: Some("Rust Book".to_string()),
            category_guess: Some("Sin Categoría".to_string()),
        };
        assert_eq!(analysis.suggested_title(), Some("Rust Book"));
        assert_eq!(analysis.suggested_category(), None);
    }
}
