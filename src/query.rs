//! Turns a user-facing intent into exactly one TMDB call.

use crate::models::FacetKind;

/// Search text meaning "no text, filters only".
pub const SEARCH_ALL: &str = "all";

/// Industry pseudo-facet -> original-language code.
pub fn industry_language(industry: &str) -> Option<&'static str> {
    match industry.trim().to_ascii_lowercase().as_str() {
        "tamil" => Some("ta"),
        "bollywood" => Some("hi"),
        "korean" => Some("ko"),
        "japanese" => Some("ja"),
        "chinese" => Some("zh"),
        "hollywood" => Some("en"),
        _ => None,
    }
}

pub fn is_search_all(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case(SEARCH_ALL)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Trending,
    TopRated,
    Upcoming,
}

impl Category {
    pub fn parse(slug: &str) -> Option<Self> {
        match slug {
            "trending" => Some(Category::Trending),
            "top-rated" | "top_rated" => Some(Category::TopRated),
            "upcoming" => Some(Category::Upcoming),
            _ => None,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Category::Trending => "trending",
            Category::TopRated => "top-rated",
            Category::Upcoming => "upcoming",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Trending => "trending movies",
            Category::TopRated => "top rated movies",
            Category::Upcoming => "upcoming movies",
        }
    }
}

/// Auxiliary filters that can accompany a text search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub language: Option<String>,
    pub year: Option<i32>,
    pub industry: Option<String>,
}

impl SearchFilters {
    /// True when the result list must be post-filtered locally.
    pub fn needs_local_filter(&self) -> bool {
        self.year.is_some() || self.industry.is_some()
    }

    /// Explicit language wins over the industry-derived one.
    pub fn effective_language(&self) -> Option<String> {
        self.language.clone().or_else(|| {
            self.industry
                .as_deref()
                .and_then(industry_language)
                .map(str::to_string)
        })
    }
}

/// One facet option picked on a discovery view, with optional refinements.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetSelection {
    pub kind: FacetKind,
    pub code: String,
    pub sort_by: Option<String>,
    pub min_rating: Option<f64>,
}

impl FacetSelection {
    pub fn new(kind: FacetKind, code: &str) -> Result<Self, String> {
        let code = code.trim();
        if code.is_empty() {
            return Err(format!("No {} selected", kind.as_str()));
        }
        let numeric = code.chars().all(|c| c.is_ascii_digit());
        match kind {
            FacetKind::Genre if !numeric => {
                return Err(format!("Genre id must be numeric: {}", code))
            }
            FacetKind::Year if !numeric || code.len() != 4 => {
                return Err(format!("Year must be four digits: {}", code))
            }
            _ => {}
        }
        Ok(Self {
            kind,
            code: code.to_string(),
            sort_by: None,
            min_rating: None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Browse {
        category: Category,
        page: u32,
    },
    Search {
        text: String,
        page: u32,
        filters: SearchFilters,
    },
    Discover {
        selection: FacetSelection,
        page: u32,
    },
}

impl Intent {
    pub fn page(&self) -> u32 {
        match self {
            Intent::Browse { page, .. }
            | Intent::Search { page, .. }
            | Intent::Discover { page, .. } => *page,
        }
    }

    /// Same request, different page.
    pub fn with_page(&self, page: u32) -> Intent {
        let mut intent = self.clone();
        match &mut intent {
            Intent::Browse { page: p, .. }
            | Intent::Search { page: p, .. }
            | Intent::Discover { page: p, .. } => *p = page,
        }
        intent
    }
}

/// Parameters for `/discover/movie`. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscoverParams {
    pub sort_by: Option<String>,
    pub page: Option<u32>,
    pub with_original_language: Option<String>,
    pub region: Option<String>,
    pub with_genres: Option<String>,
    pub primary_release_year: Option<i32>,
    pub vote_average_gte: Option<f64>,
}

impl DiscoverParams {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(sort) = &self.sort_by {
            params.push(("sort_by", sort.clone()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(lang) = &self.with_original_language {
            params.push(("with_original_language", lang.clone()));
        }
        if let Some(region) = &self.region {
            params.push(("region", region.clone()));
        }
        if let Some(genres) = &self.with_genres {
            params.push(("with_genres", genres.clone()));
        }
        if let Some(year) = self.primary_release_year {
            params.push(("primary_release_year", year.to_string()));
        }
        if let Some(min) = self.vote_average_gte {
            params.push(("vote_average.gte", min.to_string()));
        }
        params
    }
}

/// The single gateway call an intent resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Trending { page: u32 },
    TopRated { page: u32 },
    Upcoming { page: u32 },
    Search {
        query: String,
        page: u32,
        language: Option<String>,
    },
    Discover(DiscoverParams),
}

pub fn compose(intent: &Intent) -> Call {
    match intent {
        Intent::Browse { category, page } => match category {
            Category::Trending => Call::Trending { page: *page },
            Category::TopRated => Call::TopRated { page: *page },
            Category::Upcoming => Call::Upcoming { page: *page },
        },
        Intent::Search {
            text,
            page,
            filters,
        } => {
            if is_search_all(text) {
                Call::Discover(DiscoverParams {
                    page: Some(*page),
                    with_original_language: filters.effective_language(),
                    primary_release_year: filters.year,
                    ..DiscoverParams::default()
                })
            } else {
                Call::Search {
                    query: text.trim().to_string(),
                    page: *page,
                    language: filters.language.clone(),
                }
            }
        }
        Intent::Discover { selection, page } => {
            let mut params = DiscoverParams {
                sort_by: selection.sort_by.clone(),
                page: Some(*page),
                vote_average_gte: selection.min_rating,
                ..DiscoverParams::default()
            };
            match selection.kind {
                FacetKind::Language => params.with_original_language = Some(selection.code.clone()),
                FacetKind::Region => params.region = Some(selection.code.clone()),
                FacetKind::Genre => params.with_genres = Some(selection.code.clone()),
                FacetKind::Year => params.primary_release_year = selection.code.parse().ok(),
            }
            Call::Discover(params)
        }
    }
}

/// Whether the composed call's results must be post-filtered locally.
pub fn needs_local_filter(intent: &Intent) -> bool {
    match intent {
        Intent::Search { text, filters, .. } => {
            !is_search_all(text) && filters.needs_local_filter()
        }
        _ => false,
    }
}
