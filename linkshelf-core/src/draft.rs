use crate::category::default_category;
use linkshelf_api::{Analysis, Category, Link, LinkPayload};
use url::Url;

/// Which draft an operation reads from or writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftTarget {
    /// The creation form
    Create,
    /// The link being edited
    Edit,
}

/// Editable copy of a link. The creation form has no id; an edit draft
/// carries the id of the link it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDraft {
    pub id: Option<String>,
    pub url: String,
    pub title: String,
    pub category: Category,
}

impl Default for LinkDraft {
    fn default() -> Self {
        Self {
            id: None,
            url: String::new(),
            title: String::new(),
            category: default_category(),
        }
    }
}

impl LinkDraft {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn from_link(link: &Link) -> Self {
        Self {
            id: Some(link.id.clone()),
            url: link.url.clone(),
            title: link.title.clone(),
            category: link.category,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// The id, if it is present and not blank.
    pub fn link_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.trim().is_empty())
    }

    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            self.url.trim()
        } else {
            &self.title
        }
    }

    pub fn payload(&self) -> LinkPayload {
        LinkPayload {
            url: self.url.trim().to_string(),
            title: self.title.clone(),
            category: self.category,
        }
    }

    /// Merge server suggestions. Placeholder values never replace what the
    /// user already has.
    pub fn apply_analysis(&mut self, analysis: &Analysis) {
        if let Some(title) = analysis.suggested_title() {
            self.title = title.to_string();
        }
        if let Some(category) = analysis.suggested_category() {
            self.category = category;
        }
    }
}

/// True for absolute `http`/`https` URLs with a host.
pub fn is_web_url(input: &str) -> bool {
    Url::parse(input.trim())
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false)
}

/// Check a url before it is sent to the server.
pub fn validate_url(input: &str) -> Result<(), String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("a URL is required".to_string());
    }
    match Url::parse(input) {
        Ok(_) if is_web_url(input) => Ok(()),
        Ok(_) => Err(format!("'{}' is not an absolute http(s) URL", input)),
        Err(e) => Err(format!("'{}' is not a valid URL ({})", input, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_draft() {
        let draft = LinkDraft::default();
        assert!(draft.id.is_none());
        assert!(draft.url.is_empty());
        assert_eq!(draft.category, Category::Other);
    }

    #[test]
    fn test_analysis_merge_keeps_user_title_on_sentinel() {
        let mut draft = LinkDraft::new("https://bank.example").with_title("X");
        draft.apply_analysis(&Analysis {
            title: Some("no title available".to_string()),
            category_guess: Some("Finance".to_string()),
        });

        assert_eq!(draft.title, "X");
        assert_eq!(draft.category, Category::Finance);
    }

    #[test]
    fn test_analysis_merge_keeps_category_on_sentinel() {
        let mut draft = LinkDraft::new("https://a.io").with_category(Category::Music);
        draft.apply_analysis(&Analysis {
            title: Some("A Song".to_string()),
            category_guess: Some("Sin Categoría".to_string()),
        });

        assert_eq!(draft.title, "A Song");
        assert_eq!(draft.category, Category::Music);
    }

    #[test]
    fn test_blank_id_is_no_id() {
        let mut draft = LinkDraft::new("https://a.io");
        assert_eq!(draft.link_id(), None);
        draft.id = Some("  ".to_string());
        assert_eq!(draft.link_id(), None);
        draft.id = Some("42".to_string());
        assert_eq!(draft.link_id(), Some("42"));
    }

    #[test]
    fn test_is_web_url() {
        assert!(is_web_url("https://example.com"));
        assert!(is_web_url("  http://example.com/path?q=1 "));
        assert!(!is_web_url("ftp://example.com"));
        assert!(!is_web_url("example.com"));
        assert!(!is_web_url("http"));
        assert!(!is_web_url(""));
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://example.com").is_ok());
        assert!(validate_url("").is_err());
        assert!(validate_url("example.com").is_err());
        assert!(validate_url("mailto:a@b.c").is_err());
        assert!(validate_url("ftp://files.example.com").is_err());
        assert!(validate_url("file:///etc/passwd").is_err());
    }
}
