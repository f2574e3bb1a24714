//! Image CDN URL construction for provider-relative paths.

pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
pub const PLACEHOLDER_URL: &str = "https://via.placeholder.com/500x750?text=No+Image";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Profile,
    Poster,
    Backdrop,
}

impl ImageSize {
    pub fn token(&self) -> &'static str {
        match self {
            ImageSize::Profile => "w185",
            ImageSize::Poster => "w500",
            ImageSize::Backdrop => "w1280",
        }
    }
}

pub fn image_url(path: Option<&str>, size: ImageSize) -> String {
    match path.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) => format!("{IMAGE_BASE}/{}{p}", size.token()),
        None => PLACEHOLDER_URL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_sized_urls() {
        assert_eq!(
            image_url(Some("/abc.jpg"), ImageSize::Poster),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
        assert_eq!(
            image_url(Some("/abc.jpg"), ImageSize::Backdrop),
            "https://image.tmdb.org/t/p/w1280/abc.jpg"
        );
        assert_eq!(
            image_url(Some("/p.jpg"), ImageSize::Profile),
            "https://image.tmdb.org/t/p/w185/p.jpg"
        );
    }

    #[test]
    fn missing_path_is_placeholder() {
        assert_eq!(image_url(None, ImageSize::Poster), PLACEHOLDER_URL);
        assert_eq!(image_url(Some(""), ImageSize::Backdrop), PLACEHOLDER_URL);
    }
}
