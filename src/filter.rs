//! Local post-filtering and client-side sorting of search results.

use chrono::NaiveDate;
use std::cmp::Ordering;
use std::str::FromStr;

use crate::models::MovieSummary;
use crate::query::{industry_language, SearchFilters};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Relevance,
    Rating,
    Date,
    Title,
}

impl FromStr for SortKey {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "relevance" => Ok(SortKey::Relevance),
            "rating" => Ok(SortKey::Rating),
            "date" => Ok(SortKey::Date),
            "title" => Ok(SortKey::Title),
            other => Err(anyhow::anyhow!(
                "sort must be one of relevance, rating, date, title (got '{}')",
                other
            )),
        }
    }
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Relevance => "relevance",
            SortKey::Rating => "rating",
            SortKey::Date => "date",
            SortKey::Title => "title",
        }
    }
}

pub fn filter_by_year(movies: Vec<MovieSummary>, year: i32) -> Vec<MovieSummary> {
    movies
        .into_iter()
        .filter(|m| m.release_year() == Some(year))
        .collect()
}

/// Unmapped industries leave the list untouched.
pub fn filter_by_industry(movies: Vec<MovieSummary>, industry: &str) -> Vec<MovieSummary> {
    let Some(code) = industry_language(industry) else {
        return movies;
    };
    movies
        .into_iter()
        .filter(|m| m.original_language.as_deref() == Some(code))
        .collect()
}

pub fn apply_filters(movies: Vec<MovieSummary>, filters: &SearchFilters) -> Vec<MovieSummary> {
    let mut movies = movies;
    if let Some(year) = filters.year {
        movies = filter_by_year(movies, year);
    }
    if let Some(industry) = filters.industry.as_deref() {
        movies = filter_by_industry(movies, industry);
    }
    movies
}

/// Sorts in place. The sort is stable, so re-applying a key never reorders.
pub fn sort_movies(movies: &mut [MovieSummary], key: SortKey) {
    match key {
        SortKey::Relevance => {}
        SortKey::Rating => movies.sort_by(|a, b| {
            let (a, b) = (a.vote_average.unwrap_or(0.0), b.vote_average.unwrap_or(0.0));
            b.partial_cmp(&a).unwrap_or(Ordering::Equal)
        }),
        SortKey::Date => movies.sort_by(|a, b| release_date(b).cmp(&release_date(a))),
        SortKey::Title => movies.sort_by_cached_key(|m| m.title.to_lowercase()),
    }
}

fn release_date(movie: &MovieSummary) -> NaiveDate {
    movie
        .release_date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
        .unwrap_or(NaiveDate::MIN)
}
