//! Shared request/response handling for the search APIs.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use veritas_core::EvidenceItem;

use super::SourceError;

const MAX_ERROR_BODY: usize = 200;

/// Send `request` and decode a JSON body of type `T`.
///
/// Transport errors are stripped of the request URL, which carries API
/// keys in its query string.
pub(crate) async fn get_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    timeout: Duration,
) -> Result<T, SourceError> {
    let response = request.send().await.map_err(|e| transport_error(e, timeout))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SourceError::Status {
            status: status.as_u16(),
            message: body.chars().take(MAX_ERROR_BODY).collect(),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| transport_error(e, timeout))?;
    serde_json::from_slice(&bytes).map_err(|e| SourceError::Decode(e.to_string()))
}

fn transport_error(err: reqwest::Error, timeout: Duration) -> SourceError {
    if err.is_timeout() {
        SourceError::Timeout(timeout)
    } else {
        SourceError::Transport(err.without_url().to_string())
    }
}

/// Article shape shared by NewsAPI and GNews.
#[derive(Debug, Deserialize)]
pub(crate) struct NewsArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<NewsArticle> for EvidenceItem {
    fn from(article: NewsArticle) -> Self {
        EvidenceItem::from_parts(article.title, article.url, article.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritas_core::MISSING_TITLE;

    #[test]
    fn test_article_with_null_fields() {
        let article: NewsArticle =
            serde_json::from_str(r#"{"title":null,"url":"https://e.ge/a","description":null}"#)
                .unwrap();
        let item = EvidenceItem::from(article);
        assert_eq!(item.title, MISSING_TITLE);
        assert_eq!(item.url, "https://e.ge/a");
        assert_eq!(item.snippet, "");
    }

    #[test]
    fn test_article_description_becomes_snippet() {
        let article: NewsArticle = serde_json::from_str(
            r#"{"title":"სათაური","url":"https://e.ge/b","description":"აღწერა","source":{"name":"x"}}"#,
        )
        .unwrap();
        let item = EvidenceItem::from(article);
        assert_eq!(item.title, "სათაური");
        assert_eq!(item.snippet, "აღწერა");
    }
}
