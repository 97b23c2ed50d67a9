use crate::domain::parcel::MovieParcel;
use crate::utils::error::{MovieError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One catalog entry.
///
/// A plain data holder: nothing is derived from other fields except the
/// display-only release year, which the detail binder computes on demand.
/// Serializes as a positional parcel (see [`crate::domain::parcel`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "MovieParcel", from = "MovieParcel")]
pub struct Movie {
    title: String,
    release_date: String,
    poster_path: Option<String>,
    vote_average: f64,
    plot: Option<String>,
}

impl Movie {
    pub fn new(
        title: impl Into<String>,
        release_date: impl Into<String>,
        poster_path: Option<String>,
        vote_average: f64,
        plot: Option<String>,
    ) -> Self {
        Self {
            title: title.into(),
            release_date: release_date.into(),
            poster_path,
            vote_average,
            plot,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn release_date(&self) -> &str {
        &self.release_date
    }

    /// Absolute poster URL, if the catalog provided a poster.
    pub fn poster_path(&self) -> Option<&str> {
        self.poster_path.as_deref()
    }

    pub fn vote_average(&self) -> f64 {
        self.vote_average
    }

    pub fn plot(&self) -> Option<&str> {
        self.plot.as_deref()
    }

    pub(crate) fn into_parts(self) -> (String, String, Option<String>, f64, Option<String>) {
        (
            self.title,
            self.release_date,
            self.poster_path,
            self.vote_average,
            self.plot,
        )
    }
}

/// Ranking mode for the fetched list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortCriterion {
    #[default]
    #[serde(rename = "popular")]
    MostPopular,
    #[serde(rename = "top_rated")]
    TopRated,
}

impl SortCriterion {
    /// Last path segment of the catalog endpoint for this criterion.
    pub fn endpoint_segment(&self) -> &'static str {
        match self {
            SortCriterion::MostPopular => "popular",
            SortCriterion::TopRated => "top_rated",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortCriterion::MostPopular => "Most Popular",
            SortCriterion::TopRated => "Top Rated",
        }
    }
}

impl fmt::Display for SortCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortCriterion {
    type Err = MovieError;

    /// Accepts the endpoint slug (`popular`, `top_rated`, `top-rated`) or the display label.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "popular" | "most_popular" => Ok(SortCriterion::MostPopular),
            "top_rated" => Ok(SortCriterion::TopRated),
            _ => Err(MovieError::InvalidConfigValueError {
                field: "sort".to_string(),
                value: s.to_string(),
                reason: "Expected one of: popular, top_rated".to_string(),
            }),
        }
    }
}

/// The unit that survives a view-lifecycle restart.
///
/// `movies` is `None` when nothing has been loaded (first start, or the
/// collection was cleared because the device was offline).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListState {
    pub movies: Option<Vec<Movie>>,
    pub criterion: SortCriterion,
    pub scroll_offset: usize,
}

impl ListState {
    pub fn movies(&self) -> &[Movie] {
        self.movies.as_deref().unwrap_or_default()
    }

    pub fn has_movies(&self) -> bool {
        self.movies.as_ref().is_some_and(|movies| !movies.is_empty())
    }
}

/// Text for the detail view, one field per widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayFields {
    pub window_title: String,
    pub title: String,
    /// Poster URL handed to the image loader, or the placeholder text.
    pub poster: String,
    pub vote_average: String,
    pub release_year: String,
    pub plot: String,
}
