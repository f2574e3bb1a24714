use moviescope::config::Config;
use moviescope::error::ApiError;
use moviescope::query::{compose, Call, Intent, SearchFilters};
use moviescope::tmdb::{TmdbApi, TmdbClient};
use serde_json::json;
use std::net::SocketAddr;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-key";

fn client_for(server: &MockServer) -> TmdbClient {
    let config = Config {
        api_key: API_KEY.to_string(),
        base_url: server.uri(),
        language: "en-US".to_string(),
        timeout: Duration::from_secs(5),
        addr: SocketAddr::from(([127, 0, 0, 1], 0)),
    };
    TmdbClient::new(&config).expect("client builds")
}

#[tokio::test]
async fn search_sends_query_page_and_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .and(query_param("api_key", API_KEY))
        .and(query_param("language", "en-US"))
        .and(query_param("query", "Inception"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "results": [{
                "id": 27205,
                "title": "Inception",
                "poster_path": "/inception.jpg",
                "backdrop_path": null,
                "vote_average": 8.369,
                "release_date": "2010-07-15",
                "overview": "Dreams within dreams.",
                "original_language": "en"
            }],
            "total_pages": 1,
            "total_results": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client_for(&server)
        .search("Inception", 1, None)
        .await
        .unwrap();
    assert_eq!(page.total_results, 1);
    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].title, "Inception");
    assert_eq!(page.results[0].release_year(), Some(2010));
}

#[tokio::test]
async fn search_language_overrides_default_locale() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .and(query_param("language", "ko"))
        .and(query_param("query", "괴물"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1, "results": [], "total_pages": 0, "total_results": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client_for(&server)
        .search("괴물", 1, Some("ko"))
        .await
        .unwrap();
    assert!(page.results.is_empty());
}

#[tokio::test]
async fn composed_discover_call_carries_industry_language() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .and(query_param("with_original_language", "ko"))
        .and(query_param("page", "1"))
        .and(query_param_is_missing("region"))
        .and(query_param_is_missing("sort_by"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "results": [{ "id": 496243, "title": "Parasite", "original_language": "ko" }],
            "total_pages": 1,
            "total_results": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let intent = Intent::Search {
        text: "all".to_string(),
        page: 1,
        filters: SearchFilters {
            industry: Some("korean".to_string()),
            ..SearchFilters::default()
        },
    };
    let Call::Discover(params) = compose(&intent) else {
        panic!("sentinel search should compose a discover call");
    };
    let page = client_for(&server).discover(&params).await.unwrap();
    assert_eq!(page.results[0].title, "Parasite");
}

#[tokio::test]
async fn classifies_provider_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/trending/movie/week"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status_code": 7, "status_message": "Invalid API key"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/movie/top_rated"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/movie/1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/movie/upcoming"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/configuration/languages"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.trending(1).await.unwrap_err(), ApiError::Unauthorized);
    assert_eq!(client.top_rated(1).await.unwrap_err(), ApiError::RateLimited);
    assert!(client.movie_detail(1).await.unwrap_err().is_not_found());
    assert_eq!(
        client.upcoming(1).await.unwrap_err(),
        ApiError::Status {
            status: 503,
            body: "down".to_string()
        }
    );
    assert_eq!(client.languages().await.unwrap_err().kind(), "decode");
}

#[tokio::test]
async fn unreachable_provider_is_network_error() {
    let config = Config {
        api_key: API_KEY.to_string(),
        base_url: "http://127.0.0.1:1".to_string(),
        language: "en-US".to_string(),
        timeout: Duration::from_secs(2),
        addr: SocketAddr::from(([127, 0, 0, 1], 0)),
    };
    let client = TmdbClient::new(&config).unwrap();
    let err = client.trending(1).await.unwrap_err();
    assert_eq!(err.kind(), "network");
}

#[tokio::test]
async fn detail_endpoints_parse() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/27205"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 27205,
            "title": "Inception",
            "vote_average": 8.4,
            "vote_count": 35000,
            "release_date": "2010-07-15",
            "overview": "Dreams.",
            "runtime": 148,
            "genres": [{ "id": 28, "name": "Action" }, { "id": 878, "name": "Science Fiction" }],
            "tagline": "",
            "homepage": "https://inception.example",
            "original_language": "en"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/movie/27205/credits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 27205,
            "cast": [
                { "id": 6193, "name": "Leonardo DiCaprio", "character": "Cobb", "profile_path": "/leo.jpg" },
                { "id": 24045, "name": "Joseph Gordon-Levitt", "character": "Arthur", "profile_path": null }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/movie/27205/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 27205,
            "results": [
                { "id": "a", "key": "YoHD9XEInc0", "name": "Trailer", "site": "YouTube", "type": "Trailer" }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/genre/movie/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "genres": [{ "id": 28, "name": "Action" }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let (detail, credits, videos, genres) = tokio::try_join!(
        client.movie_detail(27205),
        client.movie_credits(27205),
        client.movie_videos(27205),
        client.genres(),
    )
    .unwrap();
    assert_eq!(detail.runtime, Some(148));
    assert_eq!(detail.genres.len(), 2);
    assert_eq!(detail.tagline, None);
    assert_eq!(credits.cast[0].person_id, 6193);
    assert_eq!(credits.cast[1].character, "Arthur");
    assert!(videos.results[0].is_youtube());
    assert_eq!(genres.genres[0].name, "Action");
}
