use serde::{Deserialize, Deserializer, Serialize};

use crate::images::{self, ImageSize};

/// One page of a TMDB list endpoint (trending, search, discover, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub original_language: Option<String>,
}

impl MovieSummary {
    pub fn release_year(&self) -> Option<i32> {
        self.release_date.as_deref().and_then(release_year)
    }

    pub fn poster_url(&self) -> String {
        images::image_url(self.poster_path.as_deref(), ImageSize::Poster)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: u32,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: String,
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub tagline: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub homepage: Option<String>,
    #[serde(default)]
    pub original_language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    #[serde(rename(deserialize = "id"))]
    pub person_id: u64,
    pub name: String,
    #[serde(default)]
    pub character: String,
    pub profile_path: Option<String>,
}

impl CastMember {
    pub fn profile_url(&self) -> String {
        images::image_url(self.profile_path.as_deref(), ImageSize::Profile)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRef {
    pub id: String,
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl VideoRef {
    pub fn is_youtube(&self) -> bool {
        self.site == "YouTube"
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.key)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Videos {
    #[serde(default)]
    pub results: Vec<VideoRef>,
}

/// Entry of `/configuration/languages`.
#[derive(Debug, Clone, Deserialize)]
pub struct LanguageEntry {
    pub iso_639_1: String,
    #[serde(default)]
    pub english_name: String,
}

/// Entry of `/configuration/countries`.
#[derive(Debug, Clone, Deserialize)]
pub struct CountryEntry {
    pub iso_3166_1: String,
    #[serde(default)]
    pub english_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacetKind {
    Language,
    Region,
    Genre,
    Year,
}

impl FacetKind {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "language" => Some(FacetKind::Language),
            "region" | "country" => Some(FacetKind::Region),
            "genre" => Some(FacetKind::Genre),
            "year" => Some(FacetKind::Year),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FacetKind::Language => "language",
            FacetKind::Region => "region",
            FacetKind::Genre => "genre",
            FacetKind::Year => "year",
        }
    }
}

/// A selectable discovery option, tagged with its facet when fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetOption {
    pub kind: FacetKind,
    pub code: String,
    pub name: String,
}

impl From<LanguageEntry> for FacetOption {
    fn from(entry: LanguageEntry) -> Self {
        let name = display_name(entry.english_name, &entry.iso_639_1);
        FacetOption {
            kind: FacetKind::Language,
            code: entry.iso_639_1,
            name,
        }
    }
}

impl From<CountryEntry> for FacetOption {
    fn from(entry: CountryEntry) -> Self {
        let name = display_name(entry.english_name, &entry.iso_3166_1);
        FacetOption {
            kind: FacetKind::Region,
            code: entry.iso_3166_1,
            name,
        }
    }
}

impl From<Genre> for FacetOption {
    fn from(genre: Genre) -> Self {
        FacetOption {
            kind: FacetKind::Genre,
            code: genre.id.to_string(),
            name: genre.name,
        }
    }
}

fn display_name(name: String, code: &str) -> String {
    if name.trim().is_empty() {
        code.to_string()
    } else {
        name
    }
}

pub fn release_year(date: &str) -> Option<i32> {
    let year = date.trim().split('-').next()?;
    if year.len() != 4 {
        return None;
    }
    year.parse().ok()
}

/// `148` -> `"2h 28m"`.
pub fn runtime_label(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

pub fn rating_label(vote_average: Option<f64>) -> String {
    match vote_average {
        Some(v) if v > 0.0 => format!("{:.1}", v),
        _ => "N/A".to_string(),
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_release_date_is_none() {
        let movie: MovieSummary = serde_json::from_value(json!({
            "id": 1,
            "title": "Untitled",
            "release_date": "",
            "original_language": "en"
        }))
        .unwrap();
        assert_eq!(movie.release_date, None);
        assert_eq!(movie.release_year(), None);
        assert_eq!(movie.original_language.as_deref(), Some("en"));
    }

    #[test]
    fn cast_member_reads_provider_id() {
        let member: CastMember = serde_json::from_value(json!({
            "id": 6193,
            "name": "Leonardo DiCaprio",
            "character": "Cobb",
            "profile_path": null
        }))
        .unwrap();
        assert_eq!(member.person_id, 6193);
        assert!(member.profile_url().contains("placeholder"));
    }

    #[test]
    fn labels() {
        assert_eq!(runtime_label(148), "2h 28m");
        assert_eq!(runtime_label(45), "0h 45m");
        assert_eq!(rating_label(Some(8.369)), "8.4");
        assert_eq!(rating_label(Some(0.0)), "N/A");
        assert_eq!(rating_label(None), "N/A");
        assert_eq!(release_year("2010-07-15"), Some(2010));
        assert_eq!(release_year("soon"), None);
    }

    #[test]
    fn facet_option_falls_back_to_code() {
        let opt = FacetOption::from(LanguageEntry {
            iso_639_1: "xx".to_string(),
            english_name: " ".to_string(),
        });
        assert_eq!(opt.kind, FacetKind::Language);
        assert_eq!(opt.name, "xx");
    }

    #[test]
    fn facet_kind_parse() {
        assert_eq!(FacetKind::parse("Language"), Some(FacetKind::Language));
        assert_eq!(FacetKind::parse("country"), Some(FacetKind::Region));
        assert_eq!(FacetKind::parse("decade"), None);
    }
}
