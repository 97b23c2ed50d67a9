use crate::domain::model::{DisplayFields, Movie};
use crate::utils::error::{MovieError, Result};

pub const NOT_AVAILABLE: &str = "Not available";

/// The year part of a `YYYY-MM-DD` date: everything before the first `-`.
pub fn extract_release_year(release_date: &str) -> Result<&str> {
    release_date
        .split_once('-')
        .map(|(year, _)| year)
        .ok_or_else(|| MovieError::FormatError {
            value: release_date.to_string(),
        })
}

/// Whole votes keep one decimal place ("8.0"), the way the catalog shows them.
fn format_vote_average(vote_average: f64) -> String {
    if vote_average.is_finite() && vote_average.fract() == 0.0 {
        format!("{:.1}", vote_average)
    } else {
        vote_average.to_string()
    }
}

fn or_placeholder(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_string()
}

pub fn bind(movie: &Movie) -> DisplayFields {
    let release_year = match extract_release_year(movie.release_date()) {
        Ok(year) => year.to_string(),
        Err(e) => {
            tracing::debug!("{}; showing it unmodified", e);
            movie.release_date().to_string()
        }
    };

    DisplayFields {
        window_title: movie.title().to_string(),
        title: movie.title().to_string(),
        poster: or_placeholder(movie.poster_path()),
        vote_average: format_vote_average(movie.vote_average()),
        release_year,
        plot: or_placeholder(movie.plot()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_release_year() {
        assert_eq!(extract_release_year("2014-11-07").unwrap(), "2014");
        assert_eq!(extract_release_year("no-dashes-case-with-value").unwrap(), "no");
        assert_eq!(extract_release_year("-01-01").unwrap(), "");
        assert!(matches!(
            extract_release_year("2014"),
            Err(MovieError::FormatError { .. })
        ));
        assert!(extract_release_year("").is_err());
    }

    #[test]
    fn test_bind_full_movie() {
        let movie = Movie::new(
            "Interstellar",
            "2014-11-07",
            Some("http://image.tmdb.org/t/p/w185/poster.jpg".to_string()),
            8.3,
            Some("Explorers travel through a wormhole.".to_string()),
        );

        let fields = bind(&movie);
        assert_eq!(fields.window_title, "Interstellar");
        assert_eq!(fields.title, "Interstellar");
        assert_eq!(fields.poster, "http://image.tmdb.org/t/p/w185/poster.jpg");
        assert_eq!(fields.vote_average, "8.3");
        assert_eq!(fields.release_year, "2014");
        assert_eq!(fields.plot, "Explorers travel through a wormhole.");
    }

    #[test]
    fn test_bind_uses_placeholders_for_absent_fields() {
        let movie = Movie::new("Untitled", "2001-01-01", None, 8.0, None);

        let fields = bind(&movie);
        assert_eq!(fields.poster, NOT_AVAILABLE);
        assert_eq!(fields.plot, NOT_AVAILABLE);
        assert_eq!(fields.vote_average, "8.0");
    }

    #[test]
    fn test_bind_falls_back_to_raw_release_date() {
        let movie = Movie::new("Undated", "TBA", None, 0.0, None);
        assert_eq!(bind(&movie).release_year, "TBA");
    }
}
