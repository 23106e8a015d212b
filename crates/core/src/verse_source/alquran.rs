//! alquran.cloud API client.
//!
//! No API key needed. The API has no cheap range read, so collections are
//! always fetched whole.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use super::types::{Collection, CollectionInfo, Unit};
use super::{VerseSource, VerseSourceError};

/// alquran.cloud client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlQuranCloudConfig {
    /// Base URL (default: https://api.alquran.cloud/v1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Text edition (default: ar.quran-simple).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_timeout() -> u32 {
    30
}

impl Default for AlQuranCloudConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            edition: None,
            timeout_secs: default_timeout(),
        }
    }
}

/// alquran.cloud API client.
pub struct AlQuranCloudClient {
    client: Client,
    base_url: String,
    edition: String,
}

impl AlQuranCloudClient {
    pub fn new(config: AlQuranCloudConfig) -> Result<Self, VerseSourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_secs)))
            .build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| "https://api.alquran.cloud/v1".to_string())
            .trim_end_matches('/')
            .to_string();

        let edition = config
            .edition
            .unwrap_or_else(|| "ar.quran-simple".to_string());

        Ok(Self {
            client,
            base_url,
            edition,
        })
    }

    pub fn edition(&self) -> &str {
        &self.edition
    }

    async fn decode<T: DeserializeOwned>(
        response: Response,
        what: &str,
    ) -> Result<T, VerseSourceError> {
        let status = response.status();
        if status == 404 {
            return Err(VerseSourceError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VerseSourceError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let envelope: ApiEnvelope<T> = response.json().await.map_err(|e| {
            VerseSourceError::ParseError(format!("Failed to parse {} response: {}", what, e))
        })?;

        Ok(envelope.data)
    }
}

#[async_trait]
impl VerseSource for AlQuranCloudClient {
    async fn fetch_catalog(&self) -> Result<Vec<CollectionInfo>, VerseSourceError> {
        let url = format!("{}/surah", self.base_url);

        debug!("alquran.cloud catalog: url='{}'", url);

        let response = self.client.get(&url).send().await?;
        let surahs: Vec<ApiSurahSummary> = Self::decode(response, "surah list").await?;

        Ok(surahs.into_iter().map(|s| s.into()).collect())
    }

    async fn fetch_collection(&self, index: u32) -> Result<Collection, VerseSourceError> {
        let url = format!("{}/surah/{}/{}", self.base_url, index, self.edition);

        debug!("alquran.cloud collection: index={}, edition={}", index, self.edition);

        let response = self.client.get(&url).send().await?;
        let surah: ApiSurahDetails = Self::decode(response, &format!("Surah {}", index)).await?;

        Ok(surah.into())
    }
}

// ============================================================================
// alquran.cloud API response types (internal)
// ============================================================================

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSurahSummary {
    number: u32,
    name: String,
    english_name: Option<String>,
    english_name_translation: Option<String>,
    number_of_ayahs: u32,
    revelation_type: Option<String>,
}

impl From<ApiSurahSummary> for CollectionInfo {
    fn from(s: ApiSurahSummary) -> Self {
        Self {
            index: s.number,
            name: s.name,
            english_name: s.english_name,
            english_name_translation: s.english_name_translation,
            unit_count: s.number_of_ayahs,
            revelation_type: s.revelation_type,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiSurahDetails {
    number: u32,
    name: String,
    #[serde(default)]
    ayahs: Vec<ApiAyah>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiAyah {
    number_in_surah: u32,
    text: String,
}

impl From<ApiSurahDetails> for Collection {
    fn from(s: ApiSurahDetails) -> Self {
        Self {
            index: s.number,
            name: s.name,
            units: s
                .ayahs
                .into_iter()
                .map(|a| Unit {
                    ordinal: a.number_in_surah,
                    text: a.text,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, http::StatusCode, routing::get, Router};

    /// Serve `router` on an ephemeral local port and return its base URL.
    async fn spawn_api(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/v1", addr)
    }

    fn client_for(base_url: String) -> AlQuranCloudClient {
        AlQuranCloudClient::new(AlQuranCloudConfig {
            base_url: Some(base_url),
            edition: None,
            timeout_secs: 5,
        })
        .unwrap()
    }

    async fn surah_route(Path((index, edition)): Path<(u32, String)>) -> (StatusCode, String) {
        match index {
            1 => (
                StatusCode::OK,
                format!(
                    r#"{{"code":200,"status":"OK","data":{{"number":1,"name":"{}","ayahs":[{{"numberInSurah":2,"text":"b"}},{{"numberInSurah":1,"text":"a"}}]}}}}"#,
                    edition
                ),
            ),
            2 => (StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string()),
            3 => (StatusCode::OK, "not json".to_string()),
            _ => (StatusCode::NOT_FOUND, "Not Found".to_string()),
        }
    }

    fn surah_router() -> Router {
        Router::new().route("/v1/surah/{index}/{edition}", get(surah_route))
    }

    #[tokio::test]
    async fn test_fetch_collection_over_http() {
        let client = client_for(spawn_api(surah_router()).await);

        let collection = client.fetch_collection(1).await.unwrap();
        assert_eq!(collection.index, 1);
        assert_eq!(collection.name, "ar.quran-simple");
        assert_eq!(collection.units.len(), 2);
        assert_eq!(collection.units[0].ordinal, 2);
    }

    #[tokio::test]
    async fn test_fetch_collection_404_is_not_found() {
        let client = client_for(spawn_api(surah_router()).await);

        let err = client.fetch_collection(999).await.unwrap_err();
        assert!(matches!(err, VerseSourceError::NotFound(ref what) if what == "Surah 999"));
    }

    #[tokio::test]
    async fn test_fetch_collection_server_error_is_api_error() {
        let client = client_for(spawn_api(surah_router()).await);

        let err = client.fetch_collection(2).await.unwrap_err();
        match err {
            VerseSourceError::ApiError { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("expected ApiError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_collection_bad_body_is_parse_error() {
        let client = client_for(spawn_api(surah_router()).await);

        let err = client.fetch_collection(3).await.unwrap_err();
        assert!(matches!(err, VerseSourceError::ParseError(_)));
    }

    #[tokio::test]
    async fn test_fetch_catalog_over_http() {
        let router = Router::new().route(
            "/v1/surah",
            get(|| async {
                r#"{"code":200,"status":"OK","data":[{"number":114,"name":"n","englishName":"An-Naas","numberOfAyahs":6}]}"#
            }),
        );
        let client = client_for(spawn_api(router).await);

        let catalog = client.fetch_catalog().await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].index, 114);
        assert_eq!(catalog[0].unit_count, 6);
        assert!(catalog[0].revelation_type.is_none());
    }

    #[test]
    fn test_client_defaults() {
        let client = AlQuranCloudClient::new(AlQuranCloudConfig::default()).unwrap();
        assert_eq!(client.base_url, "https://api.alquran.cloud/v1");
        assert_eq!(client.edition(), "ar.quran-simple");
    }

    #[test]
    fn test_client_trims_base_url() {
        let client = AlQuranCloudClient::new(AlQuranCloudConfig {
            base_url: Some("http://localhost:8080/v1/".to_string()),
            edition: Some("quran-uthmani".to_string()),
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(client.base_url, "http://localhost:8080/v1");
        assert_eq!(client.edition(), "quran-uthmani");
    }

    #[test]
    fn test_parse_catalog_payload() {
        let body = r#"{
            "code": 200,
            "status": "OK",
            "data": [{
                "number": 1,
                "name": "سُورَةُ ٱلْفَاتِحَةِ",
                "englishName": "Al-Faatiha",
                "englishNameTranslation": "The Opening",
                "numberOfAyahs": 7,
                "revelationType": "Meccan"
            }]
        }"#;
        let envelope: ApiEnvelope<Vec<ApiSurahSummary>> = serde_json::from_str(body).unwrap();
        let catalog: Vec<CollectionInfo> = envelope.data.into_iter().map(Into::into).collect();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].index, 1);
        assert_eq!(catalog[0].unit_count, 7);
        assert_eq!(catalog[0].english_name.as_deref(), Some("Al-Faatiha"));
    }

    #[test]
    fn test_parse_collection_payload() {
        let body = r#"{
            "code": 200,
            "status": "OK",
            "data": {
                "number": 112,
                "name": "سُورَةُ الإِخۡلَاصِ",
                "numberOfAyahs": 4,
                "ayahs": [
                    {"number": 6222, "text": "قُلْ هُوَ اللَّهُ أَحَدٌ", "numberInSurah": 1, "juz": 30},
                    {"number": 6223, "text": "اللَّهُ الصَّمَدُ", "numberInSurah": 2, "juz": 30}
                ]
            }
        }"#;
        let envelope: ApiEnvelope<ApiSurahDetails> = serde_json::from_str(body).unwrap();
        let collection: Collection = envelope.data.into();

        assert_eq!(collection.index, 112);
        assert_eq!(collection.units.len(), 2);
        assert_eq!(collection.units[1].ordinal, 2);
        assert_eq!(collection.units[1].text, "اللَّهُ الصَّمَدُ");
    }
}
