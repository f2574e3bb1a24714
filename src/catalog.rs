use chrono::{Datelike, Utc};
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::filter::{apply_filters, sort_movies, SortKey};
use crate::images::{image_url, ImageSize};
use crate::models::{
    rating_label, runtime_label, CastMember, FacetKind, FacetOption, MovieDetail, MovieSummary,
    Page, VideoRef,
};
use crate::pagination::Pagination;
use crate::query::{self, Call, Category, Intent};
use crate::tmdb::TmdbApi;

pub const LANDING_SECTION_SIZE: usize = 8;
pub const DETAIL_CAST_LIMIT: usize = 10;
pub const DETAIL_VIDEO_LIMIT: usize = 6;
pub const EARLIEST_YEAR: i32 = 1900;

/// What a movie card shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieCard {
    pub id: u64,
    pub title: String,
    pub poster_url: String,
    pub year: Option<i32>,
    pub rating: String,
    pub overview: String,
}

impl From<&MovieSummary> for MovieCard {
    fn from(movie: &MovieSummary) -> Self {
        MovieCard {
            id: movie.id,
            title: movie.title.clone(),
            poster_url: movie.poster_url(),
            year: movie.release_year(),
            rating: rating_label(movie.vote_average),
            overview: movie.overview.clone(),
        }
    }
}

fn as_cards<S: Serializer>(movies: &[MovieSummary], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(movies.iter().map(MovieCard::from))
}

fn sort_name<S: Serializer>(key: &SortKey, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(key.as_str())
}

/// A result list with its pagination snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsPage {
    #[serde(serialize_with = "as_cards")]
    pub movies: Vec<MovieSummary>,
    pub pagination: Pagination,
    pub page_window: Vec<u32>,
    #[serde(serialize_with = "sort_name")]
    pub sort: SortKey,
    /// No results is a valid outcome, never an error.
    pub empty: bool,
}

impl ResultsPage {
    pub fn new(movies: Vec<MovieSummary>, pagination: Pagination) -> Self {
        let page_window = pagination.window();
        let empty = movies.is_empty();
        Self {
            movies,
            pagination,
            page_window,
            sort: SortKey::Relevance,
            empty,
        }
    }

    /// Re-sort the held list without refetching.
    pub fn apply_sort(&mut self, key: SortKey) {
        sort_movies(&mut self.movies, key);
        self.sort = key;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandingData {
    pub featured: Option<MovieCard>,
    pub trending: Vec<MovieCard>,
    pub top_rated: Vec<MovieCard>,
    pub upcoming: Vec<MovieCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastCard {
    pub person_id: u64,
    pub name: String,
    pub character: String,
    pub profile_url: String,
}

impl From<CastMember> for CastCard {
    fn from(member: CastMember) -> Self {
        let profile_url = member.profile_url();
        CastCard {
            person_id: member.person_id,
            name: member.name,
            character: member.character,
            profile_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoCard {
    pub id: String,
    pub key: String,
    pub name: String,
    pub kind: String,
    pub url: String,
}

impl From<VideoRef> for VideoCard {
    fn from(video: VideoRef) -> Self {
        let url = video.watch_url();
        VideoCard {
            id: video.id,
            key: video.key,
            name: video.name,
            kind: video.kind,
            url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailData {
    pub movie: MovieDetail,
    pub poster_url: String,
    pub backdrop_url: String,
    pub year: Option<i32>,
    pub rating: String,
    pub runtime: Option<String>,
    pub cast: Vec<CastCard>,
    pub videos: Vec<VideoCard>,
}

#[derive(Clone)]
pub struct Catalog {
    api: Arc<dyn TmdbApi>,
}

impl Catalog {
    pub fn new(api: Arc<dyn TmdbApi>) -> Self {
        Self { api }
    }

    /// Trending, top-rated and upcoming together; one failure fails all three.
    pub async fn landing(&self) -> ApiResult<LandingData> {
        let (trending, top_rated, upcoming) = tokio::try_join!(
            self.api.trending(1),
            self.api.top_rated(1),
            self.api.upcoming(1),
        )?;
        let featured = trending.results.first().map(MovieCard::from);
        Ok(LandingData {
            featured,
            trending: cards(trending.results.iter().skip(1)),
            top_rated: cards(top_rated.results.iter()),
            upcoming: cards(upcoming.results.iter()),
        })
    }

    /// Compose, fetch and (for filtered text searches) post-filter one intent.
    pub async fn results(&self, intent: &Intent) -> ApiResult<ResultsPage> {
        let call = query::compose(intent);
        let page = execute(self.api.as_ref(), &call).await?;
        match intent {
            Intent::Search { filters, .. } if query::needs_local_filter(intent) => {
                let fetched = page.results.len();
                let movies = apply_filters(page.results, filters);
                debug!(
                    fetched,
                    kept = movies.len(),
                    year = ?filters.year,
                    industry = ?filters.industry,
                    "Applied local filters"
                );
                let pagination = Pagination::synthesized(movies.len());
                Ok(ResultsPage::new(movies, pagination))
            }
            _ => {
                let mut page = page;
                let mut pagination =
                    Pagination::remote(page.page, page.total_pages, page.total_results);
                if pagination.is_past_end() {
                    let last = pagination.total_pages;
                    info!(
                        requested = pagination.page,
                        last, "Requested page is past the end, loading last page"
                    );
                    page = execute(self.api.as_ref(), &query::compose(&intent.with_page(last)))
                        .await?;
                    pagination = Pagination::remote(page.page, page.total_pages, page.total_results);
                }
                Ok(ResultsPage::new(page.results, pagination))
            }
        }
    }

    pub async fn category(&self, category: Category, page: u32) -> ApiResult<ResultsPage> {
        self.results(&Intent::Browse { category, page }).await
    }

    /// Detail, credits and videos together; one failure fails all three.
    pub async fn detail(&self, id: u64) -> ApiResult<DetailData> {
        let (movie, credits, videos) = tokio::try_join!(
            self.api.movie_detail(id),
            async { self.api.movie_credits(id).await.map_err(missing_part) },
            async { self.api.movie_videos(id).await.map_err(missing_part) },
        )?;
        let cast = credits
            .cast
            .into_iter()
            .take(DETAIL_CAST_LIMIT)
            .map(CastCard::from)
            .collect();
        let videos = videos
            .results
            .into_iter()
            .filter(VideoRef::is_youtube)
            .take(DETAIL_VIDEO_LIMIT)
            .map(VideoCard::from)
            .collect();
        Ok(DetailData {
            poster_url: image_url(movie.poster_path.as_deref(), ImageSize::Poster),
            backdrop_url: image_url(movie.backdrop_path.as_deref(), ImageSize::Backdrop),
            year: movie.release_date.as_deref().and_then(crate::models::release_year),
            rating: rating_label(movie.vote_average),
            runtime: movie.runtime.map(runtime_label),
            cast,
            videos,
            movie,
        })
    }

    /// Options for a discovery facet. Years are generated locally.
    pub async fn facet_options(&self, kind: FacetKind) -> ApiResult<Vec<FacetOption>> {
        let options: Vec<FacetOption> = match kind {
            FacetKind::Language => {
                sorted_unique(self.api.languages().await?.into_iter().map(FacetOption::from))
            }
            FacetKind::Region => {
                sorted_unique(self.api.countries().await?.into_iter().map(FacetOption::from))
            }
            FacetKind::Genre => self
                .api
                .genres()
                .await?
                .genres
                .into_iter()
                .map(FacetOption::from)
                .collect(),
            FacetKind::Year => year_options(Utc::now().year()),
        };
        info!("Loaded {} {} options", options.len(), kind.as_str());
        Ok(options)
    }
}

async fn execute(api: &dyn TmdbApi, call: &Call) -> ApiResult<Page<MovieSummary>> {
    match call {
        Call::Trending { page } => api.trending(*page).await,
        Call::TopRated { page } => api.top_rated(*page).await,
        Call::Upcoming { page } => api.upcoming(*page).await,
        Call::Search {
            query,
            page,
            language,
        } => api.search(query, *page, language.as_deref()).await,
        Call::Discover(params) => api.discover(params).await,
    }
}

/// Only the movie record decides "not found"; a missing credits or videos list is a plain failure.
fn missing_part(err: ApiError) -> ApiError {
    match err {
        ApiError::NotFound(path) => ApiError::Status {
            status: 404,
            body: path,
        },
        other => other,
    }
}

fn cards<'a, I: Iterator<Item = &'a MovieSummary>>(movies: I) -> Vec<MovieCard> {
    movies.take(LANDING_SECTION_SIZE).map(MovieCard::from).collect()
}

fn sorted_unique<I: Iterator<Item = FacetOption>>(options: I) -> Vec<FacetOption> {
    let mut seen = HashSet::new();
    let mut unique: Vec<FacetOption> = options.filter(|o| seen.insert(o.code.clone())).collect();
    unique.sort_by_cached_key(|o| o.name.to_lowercase());
    unique
}

/// Newest first, down to [`EARLIEST_YEAR`].
pub fn year_options(latest: i32) -> Vec<FacetOption> {
    (EARLIEST_YEAR..=latest)
        .rev()
        .map(|year| FacetOption {
            kind: FacetKind::Year,
            code: year.to_string(),
            name: year.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_options_are_local_and_descending() {
        let options = year_options(2026);
        assert_eq!(options.first().map(|o| o.code.as_str()), Some("2026"));
        assert_eq!(options.last().map(|o| o.code.as_str()), Some("1900"));
        assert!(options.contains(&FacetOption {
            kind: FacetKind::Year,
            code: "1999".to_string(),
            name: "1999".to_string(),
        }));
    }

    #[test]
    fn sorted_unique_dedupes_codes() {
        let opts = vec![
            FacetOption {
                kind: FacetKind::Region,
                code: "KR".to_string(),
                name: "South Korea".to_string(),
            },
            FacetOption {
                kind: FacetKind::Region,
                code: "IN".to_string(),
                name: "India".to_string(),
            },
            FacetOption {
                kind: FacetKind::Region,
                code: "KR".to_string(),
                name: "Korea".to_string(),
            },
        ];
        let out = sorted_unique(opts.into_iter());
        let codes: Vec<_> = out.iter().map(|o| o.code.as_str()).collect();
        assert_eq!(codes, vec!["IN", "KR"]);
        assert_eq!(out[1].name, "South Korea");
    }

    #[test]
    fn missing_part_is_not_a_lookup_miss() {
        let err = missing_part(ApiError::NotFound("/movie/1/credits".to_string()));
        assert!(!err.is_not_found());
        assert_eq!(missing_part(ApiError::RateLimited), ApiError::RateLimited);
    }

    #[test]
    fn results_page_marks_empty() {
        let page = ResultsPage::new(Vec::new(), Pagination::synthesized(0));
        assert!(page.empty);
        assert!(page.page_window.is_empty());
    }
}
