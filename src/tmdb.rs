use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    CountryEntry, Credits, GenreList, LanguageEntry, MovieDetail, MovieSummary, Page, Videos,
};
use crate::query::DiscoverParams;

/// Remote metadata gateway. One method per consumed endpoint.
#[async_trait]
pub trait TmdbApi: Send + Sync {
    async fn trending(&self, page: u32) -> ApiResult<Page<MovieSummary>>;
    async fn top_rated(&self, page: u32) -> ApiResult<Page<MovieSummary>>;
    async fn upcoming(&self, page: u32) -> ApiResult<Page<MovieSummary>>;
    async fn search(
        &self,
        query: &str,
        page: u32,
        language: Option<&str>,
    ) -> ApiResult<Page<MovieSummary>>;
    async fn discover(&self, params: &DiscoverParams) -> ApiResult<Page<MovieSummary>>;
    async fn movie_detail(&self, id: u64) -> ApiResult<MovieDetail>;
    async fn movie_credits(&self, id: u64) -> ApiResult<Credits>;
    async fn movie_videos(&self, id: u64) -> ApiResult<Videos>;
    async fn languages(&self) -> ApiResult<Vec<LanguageEntry>>;
    async fn countries(&self) -> ApiResult<Vec<CountryEntry>>;
    async fn genres(&self) -> ApiResult<GenreList>;
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    language: String,
}

impl TmdbClient {
    pub fn new(config: &Config) -> Result<Self> {
        let user_agent = format!("moviescope/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(config.timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build TMDB HTTP client")?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(&Config::from_env()?)
    }

    /// Full request URL; credential and default locale are always present.
    fn url(&self, path: &str, params: &[(&str, String)]) -> String {
        let mut url = format!(
            "{}{}?api_key={}",
            self.base_url,
            path,
            urlencoding::encode(&self.api_key)
        );
        if !params.iter().any(|(k, _)| *k == "language") {
            url.push_str("&language=");
            url.push_str(&urlencoding::encode(&self.language));
        }
        for (key, value) in params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> ApiResult<T> {
        let url = self.url(path, params);
        debug!(path = %path, params = ?params, "TMDB request");
        let res = self.client.get(&url).send().await?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16(), path, text));
        }
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(format!("{}: {}", path, e)))
    }

    async fn list(&self, path: &str, page: u32) -> ApiResult<Page<MovieSummary>> {
        self.get_json(path, &[("page", page.to_string())]).await
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn trending(&self, page: u32) -> ApiResult<Page<MovieSummary>> {
        self.list("/trending/movie/week", page).await
    }

    async fn top_rated(&self, page: u32) -> ApiResult<Page<MovieSummary>> {
        self.list("/movie/top_rated", page).await
    }

    async fn upcoming(&self, page: u32) -> ApiResult<Page<MovieSummary>> {
        self.list("/movie/upcoming", page).await
    }

    async fn search(
        &self,
        query: &str,
        page: u32,
        language: Option<&str>,
    ) -> ApiResult<Page<MovieSummary>> {
        let mut params = vec![("query", query.to_string()), ("page", page.to_string())];
        if let Some(lang) = language {
            params.push(("language", lang.to_string()));
        }
        self.get_json("/search/movie", &params).await
    }

    async fn discover(&self, params: &DiscoverParams) -> ApiResult<Page<MovieSummary>> {
        self.get_json("/discover/movie", &params.to_query()).await
    }

    async fn movie_detail(&self, id: u64) -> ApiResult<MovieDetail> {
        self.get_json(&format!("/movie/{id}"), &[]).await
    }

    async fn movie_credits(&self, id: u64) -> ApiResult<Credits> {
        self.get_json(&format!("/movie/{id}/credits"), &[]).await
    }

    async fn movie_videos(&self, id: u64) -> ApiResult<Videos> {
        self.get_json(&format!("/movie/{id}/videos"), &[]).await
    }

    async fn languages(&self) -> ApiResult<Vec<LanguageEntry>> {
        self.get_json("/configuration/languages", &[]).await
    }

    async fn countries(&self) -> ApiResult<Vec<CountryEntry>> {
        self.get_json("/configuration/countries", &[]).await
    }

    async fn genres(&self) -> ApiResult<GenreList> {
        self.get_json("/genre/movie/list", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    fn client() -> TmdbClient {
        let config = Config {
            api_key: "secret key".to_string(),
            base_url: "https://tmdb.test/3".to_string(),
            language: "en-US".to_string(),
            timeout: Duration::from_secs(1),
            addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        };
        TmdbClient::new(&config).unwrap()
    }

    #[test]
    fn url_injects_credential_and_locale() {
        let url = client().url("/search/movie", &[("query", "Crouching Tiger".to_string())]);
        assert_eq!(
            url,
            "https://tmdb.test/3/search/movie?api_key=secret%20key&language=en-US&query=Crouching%20Tiger"
        );
    }

    #[test]
    fn explicit_language_replaces_default_locale() {
        let url = client().url("/search/movie", &[("language", "ko".to_string())]);
        assert!(url.ends_with("?api_key=secret%20key&language=ko"));
        assert_eq!(url.matches("language=").count(), 1);
    }
}
