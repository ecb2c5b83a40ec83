use crate::error::{ApiError, Result};
use crate::model::{Analysis, CreatedLink, ErrorBody, Link, LinkPayload, RawLink, StatEntry};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Thin typed wrapper over the links REST API.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(format!(
                "{} cannot be used as an API base",
                base_url
            )));
        }

        let client = Client::builder()
            .user_agent(concat!("linkshelf/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs((timeout_secs / 2).max(1)))
            .pool_idle_timeout(Duration::from_secs(90))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET /links
    pub async fn list_links(&self) -> Result<Vec<Link>> {
        let url = self.endpoint(&["links"])?;
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }

        let raw: Vec<RawLink> = read_json(response).await?;
        Ok(raw.into_iter().filter_map(RawLink::into_link).collect())
    }

    /// GET /stats
    pub async fn list_stats(&self) -> Result<Vec<StatEntry>> {
        let url = self.endpoint(&["stats"])?;
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }
        read_json(response).await
    }

    /// POST /links. Only a 201 counts as created.
    pub async fn create_link(&self, payload: &LinkPayload) -> Result<CreatedLink> {
        let url = self.endpoint(&["links"])?;
        debug!("POST {} ({})", url, payload.url);
        let response = self.client.post(url).json(payload).send().await?;
        if response.status() != StatusCode::CREATED {
            return Err(error_from(response).await);
        }

        // A 201 with an unreadable body is still a created link
        let body = response.text().await?;
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }

    /// PUT /links/{id}
    pub async fn update_link(&self, id: &str, payload: &LinkPayload) -> Result<()> {
        let url = self.endpoint(&["links", id])?;
        debug!("PUT {}", url);
        let response = self.client.put(url).json(payload).send().await?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }
        Ok(())
    }

    /// DELETE /links/{id}
    pub async fn delete_link(&self, id: &str) -> Result<()> {
        let url = self.endpoint(&["links", id])?;
        debug!("DELETE {}", url);
        let response = self.client.delete(url).send().await?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }
        Ok(())
    }

    /// POST /analyze_link
    pub async fn analyze_link(&self, link_url: &str) -> Result<Analysis> {
        let url = self.endpoint(&["analyze_link"])?;
        debug!("POST {} ({})", url, link_url);
        let response = self
            .client
            .post(url)
            .json(&json!({ "url": link_url }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Build a status error, keeping the server's `error` text when the body has one.
async fn error_from(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .ok()
        .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
        .and_then(|body| body.error);
    ApiError::Status { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;
    use wiremock::{
        matchers::{body_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[tokio::test]
    async fn test_list_links_normalizes_ids() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/links"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "_id": "65a1",
                    "url": "https://rust-lang.org",
                    "title": "Rust",
                    "category": "Programación"
                },
                {"id": 7, "url": "https://example.com", "title": null},
                {"url": "https://no-id.example"}
            ])))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri()).unwrap();
        let links = client.list_links().await.unwrap();

        assert_eq!(links.len(), 2);
        assert_eq!(links[0].id, "65a1");
        assert_eq!(links[0].category, Category::Programming);
        assert_eq!(links[1].id, "7");
        assert_eq!(links[1].title, "");
        assert_eq!(links[1].category, Category::Other);
    }

    #[tokio::test]
    async fn test_list_links_rejects_non_array_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/links"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"links": []})))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri()).unwrap();
        let err = client.list_links().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_list_stats_accepts_id_alias() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"_id": "Música", "count": 3},
                {"category": "Finanzas", "count": 1}
            ])))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri()).unwrap();
        let stats = client.list_stats().await.unwrap();

        assert_eq!(
            stats,
            vec![
                StatEntry { category: Category::Music, count: 3 },
                StatEntry { category: Category::Finance, count: 1 },
            ]
        );
    }

    #[tokio::test]
    async fn test_list_stats_null_category_counts_as_other() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"category": null, "count": 2},
                {"category": "Música", "count": 3},
                {"count": 1}
            ])))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri()).unwrap();
        let stats = client.list_stats().await.unwrap();

        assert_eq!(
            stats,
            vec![
                StatEntry { category: Category::Other, count: 2 },
                StatEntry { category: Category::Music, count: 3 },
                StatEntry { category: Category::Other, count: 1 },
            ]
        );
    }

    #[tokio::test]
    async fn test_create_link_posts_payload_and_reads_title_used() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/links"))
            .and(body_json(json!({
                "url": "https://example.com",
                "title": "",
                "category": "Otros"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "message": "Enlace creado con éxito",
                "id": "abc",
                "title_used": "Example"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri()).unwrap();
        let created = client
            .create_link(&LinkPayload {
                url: "https://example.com".to_string(),
                title: String::new(),
                category: Category::Other,
            })
            .await
            .unwrap();

        assert_eq!(created.title_used.as_deref(), Some("Example"));
        assert_eq!(created.id.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_create_link_requires_201() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/links"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "abc"})))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri()).unwrap();
        let err = client
            .create_link(&LinkPayload {
                url: "https://example.com".to_string(),
                title: String::new(),
                category: Category::Other,
            })
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(200));
        assert_eq!(err.server_message(), None);
    }

    #[tokio::test]
    async fn test_delete_link_surfaces_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/links/42"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "not found"})))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri()).unwrap();
        let err = client.delete_link("42").await.unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.server_message(), Some("not found"));
    }

    #[tokio::test]
    async fn test_error_without_json_body_has_no_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/links/1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<h1>oops</h1>"))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri()).unwrap();
        let err = client
            .update_link(
                "1",
                &LinkPayload {
                    url: "https://example.com".to_string(),
                    title: "x".to_string(),
                    category: Category::Other,
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert!(err.server_message().is_none());
    }

    #[tokio::test]
    async fn test_base_url_path_prefix_is_kept() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/analyze_link"))
            .and(body_json(json!({"url": "https://example.com"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "title": "Example Domain",
                "category_guess": "Otros"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&format!("{}/api/", mock_server.uri())).unwrap();
        let analysis = client.analyze_link("https://example.com").await.unwrap();

        assert_eq!(analysis.suggested_title(), Some("Example Domain"));
        assert_eq!(analysis.suggested_category(), Some(Category::Other));
    }

    #[test]
    fn test_rejects_relative_base_url() {
        assert!(matches!(
            ApiClient::new("not a url"),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(matches!(
            ApiClient::new("mailto:someone@example.com"),
            Err(ApiError::InvalidUrl(_))
        ));
    }
}
