use std::collections::HashSet;

use crate::database_ops::providers::{CatalogGenre, CatalogMovie};
use crate::models::{Genre, Movie};

/// Local movie row for a catalog record; the id is the catalog id as text.
pub fn movie_from_catalog(details: &CatalogMovie) -> Movie {
    Movie {
        id: details.id.to_string(),
        external_id: details.id,
        title: details.title.trim().to_string(),
        synopsis: non_blank(details.overview.as_deref()),
        release_year: details.release_year,
        poster_path: non_blank(details.poster_path.as_deref()),
    }
}

pub fn genre_from_catalog(genre: &CatalogGenre) -> Genre {
    Genre {
        id: genre.id.to_string(),
        name: genre.name.trim().to_string(),
    }
}

/// Incoming genres with blank names dropped and repeated names collapsed
/// to their first occurrence.
pub fn distinct_genres(genres: &[CatalogGenre]) -> Vec<Genre> {
    let mut seen: HashSet<String> = HashSet::new();
    genres
        .iter()
        .map(genre_from_catalog)
        .filter(|g| !g.name.is_empty() && seen.insert(g.name.clone()))
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_id_is_catalog_id_text() {
        let details = CatalogMovie {
            id: 27205,
            title: " Inception ".into(),
            overview: Some("".into()),
            poster_path: Some("/inception.jpg".into()),
            release_date: Some("2010-07-15".into()),
            release_year: Some(2010),
            vote_average: Some(8.4),
            genres: vec![],
        };
        let movie = movie_from_catalog(&details);
        assert_eq!(movie.id, "27205");
        assert_eq!(movie.external_id, 27205);
        assert_eq!(movie.title, "Inception");
        assert_eq!(movie.synopsis, None);
        assert_eq!(movie.poster_path.as_deref(), Some("/inception.jpg"));
    }

    #[test]
    fn distinct_genres_drops_blank_and_repeated_names() {
        let genres = vec![
            CatalogGenre { id: 28, name: "Action".into() },
            CatalogGenre { id: 0, name: "  ".into() },
            CatalogGenre { id: 99, name: "Action ".into() },
            CatalogGenre { id: 878, name: "Science Fiction".into() },
        ];
        let out = distinct_genres(&genres);
        assert_eq!(
            out,
            vec![
                Genre { id: "28".into(), name: "Action".into() },
                Genre { id: "878".into(), name: "Science Fiction".into() },
            ]
        );
    }
}
