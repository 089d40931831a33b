//! Image URL and date helpers for upstream asset paths.

const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

/// Poster rendition width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PosterSize {
    W185,
    #[default]
    W342,
}

impl PosterSize {
    fn as_str(self) -> &'static str {
        match self {
            Self::W185 => "w185",
            Self::W342 => "w342",
        }
    }
}

fn image_url(path: Option<&str>, size: &str) -> Option<String> {
    let path = path?;
    if path.trim().is_empty() {
        return None;
    }
    Some(format!("{}/{}{}", IMAGE_BASE, size, path))
}

/// Provider logo at 45px width.
pub fn logo_url(path: Option<&str>) -> Option<String> {
    image_url(path, "w45")
}

pub fn poster_url(path: Option<&str>, size: PosterSize) -> Option<String> {
    image_url(path, size.as_str())
}

/// Year from an upstream `YYYY-MM-DD` date, if it starts with one.
pub fn release_year(date: Option<&str>) -> Option<i32> {
    let date = date?;
    date.get(..4)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logo_url() {
        assert_eq!(
            logo_url(Some("/pbpMk2JmcoNnQwx5JGpXngfoWtp.jpg")).as_deref(),
            Some("https://image.tmdb.org/t/p/w45/pbpMk2JmcoNnQwx5JGpXngfoWtp.jpg")
        );
        assert_eq!(logo_url(None), None);
        assert_eq!(logo_url(Some("  ")), None);
    }

    #[test]
    fn test_poster_url_sizes() {
        assert_eq!(
            poster_url(Some("/p.jpg"), PosterSize::default()).as_deref(),
            Some("https://image.tmdb.org/t/p/w342/p.jpg")
        );
        assert_eq!(
            poster_url(Some("/p.jpg"), PosterSize::W185).as_deref(),
            Some("https://image.tmdb.org/t/p/w185/p.jpg")
        );
    }

    #[test]
    fn test_release_year() {
        assert_eq!(release_year(Some("2019-05-30")), Some(2019));
        assert_eq!(release_year(Some("")), None);
        assert_eq!(release_year(Some("TBA")), None);
        assert_eq!(release_year(None), None);
    }
}
