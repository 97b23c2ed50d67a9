//! Transfer encoding for a single [`Movie`].
//!
//! A movie travels between views as a JSON array with a fixed field order:
//! title, release date, poster URL, vote average, plot. Absent optional
//! fields are encoded as `null`. Decoding requires all five positions, so a
//! truncated parcel is rejected as a whole. A vote average that JSON cannot
//! represent (NaN, infinity) fails encoding rather than being written as `null`.

use crate::domain::model::Movie;
use crate::utils::error::{MovieError, Result};
use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};

#[derive(Serialize, Deserialize)]
pub(crate) struct MovieParcel(
    String,
    String,
    Option<String>,
    #[serde(serialize_with = "finite_vote_average")] f64,
    Option<String>,
);

fn finite_vote_average<S: Serializer>(
    value: &f64,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    if !value.is_finite() {
        return Err(S::Error::custom(format!(
            "vote average {} is not a finite number",
            value
        )));
    }
    serializer.serialize_f64(*value)
}

impl From<Movie> for MovieParcel {
    fn from(movie: Movie) -> Self {
        let (title, release_date, poster_path, vote_average, plot) = movie.into_parts();
        MovieParcel(title, release_date, poster_path, vote_average, plot)
    }
}

impl From<MovieParcel> for Movie {
    fn from(parcel: MovieParcel) -> Self {
        let MovieParcel(title, release_date, poster_path, vote_average, plot) = parcel;
        Movie::new(title, release_date, poster_path, vote_average, plot)
    }
}

pub fn encode(movie: &Movie) -> Result<String> {
    Ok(serde_json::to_string(movie)?)
}

pub fn decode(raw: &str) -> Result<Movie> {
    serde_json::from_str(raw).map_err(|e| MovieError::DecodeError {
        message: format!("invalid movie parcel: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_movie() -> Movie {
        Movie::new(
            "Interstellar",
            "2014-11-07",
            Some("http://image.tmdb.org/t/p/w185/nBNZadXqJSdt05SHLqgT0HuC5Gm.jpg".to_string()),
            8.3,
            Some("A team of explorers travel through a wormhole.".to_string()),
        )
    }

    #[test]
    fn test_encode_uses_fixed_field_order() {
        let movie = Movie::new("A", "2020-01-02", Some("http://img/x.jpg".to_string()), 7.5, None);
        let encoded = encode(&movie).unwrap();
        assert_eq!(encoded, r#"["A","2020-01-02","http://img/x.jpg",7.5,null]"#);
    }

    #[test]
    fn test_round_trip() {
        let movie = sample_movie();
        let decoded = decode(&encode(&movie).unwrap()).unwrap();
        assert_eq!(decoded, movie);

        let sparse = Movie::new("", "", None, 0.0, None);
        assert_eq!(decode(&encode(&sparse).unwrap()).unwrap(), sparse);
    }

    #[test]
    fn test_non_finite_vote_average_is_not_encoded() {
        for vote_average in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let movie = Movie::new("A", "2020-01-02", None, vote_average, None);
            let result = encode(&movie);
            assert!(
                matches!(result, Err(MovieError::SerializationError(_))),
                "{} encoded as {:?}",
                vote_average,
                result
            );
        }
    }

    #[test]
    fn test_truncated_parcel_is_rejected() {
        let encoded = encode(&sample_movie()).unwrap();
        for cut in [0, 1, encoded.len() / 2, encoded.len() - 1] {
            let result = decode(&encoded[..cut]);
            assert!(
                matches!(result, Err(MovieError::DecodeError { .. })),
                "prefix of length {} decoded",
                cut
            );
        }
    }

    #[test]
    fn test_missing_positions_are_rejected() {
        let result = decode(r#"["A","2020-01-02","http://img/x.jpg",7.5]"#);
        assert!(matches!(result, Err(MovieError::DecodeError { .. })));

        let result = decode(r#"["A","2020-01-02"]"#);
        assert!(matches!(result, Err(MovieError::DecodeError { .. })));
    }

    #[test]
    fn test_wrong_field_type_is_rejected() {
        let result = decode(r#"["A","2020-01-02",null,"high",null]"#);
        assert!(matches!(result, Err(MovieError::DecodeError { .. })));
    }
}
