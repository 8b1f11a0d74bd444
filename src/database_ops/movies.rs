// Movie store: row helpers for the sync transaction plus read queries.
//
// Write helpers take a bare connection so callers decide the transaction
// boundary; pass `&mut *tx` from a `Transaction`.

use anyhow::Result;
use chrono::Utc;
use sqlx::{any::AnyRow, AnyConnection, Row};
use tracing::{debug, instrument};

use crate::database_ops::db::Db;
use crate::models::{Genre, Movie, MovieDetail, MoviePlatform, Platform, PlatformListing, PlatformType};

fn movie_from_row(row: &AnyRow) -> Result<(Movie, String), sqlx::Error> {
    let release_year: Option<i64> = row.try_get("release_year")?;
    let movie = Movie {
        id: row.try_get("id")?,
        external_id: row.try_get("external_id")?,
        title: row.try_get("title")?,
        synopsis: row.try_get("synopsis")?,
        release_year: release_year.and_then(|y| i32::try_from(y).ok()),
        poster_path: row.try_get("poster_path")?,
    };
    Ok((movie, row.try_get("synced_at")?))
}

fn platform_from_row(row: &AnyRow) -> Result<Platform, sqlx::Error> {
    let kind: String = row.try_get("kind")?;
    Ok(Platform {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        kind: PlatformType::from_column(&kind),
        link_url: row.try_get("link_url")?,
    })
}

/// Insert the movie, or refresh its catalog fields when the id already exists.
pub async fn upsert_movie(conn: &mut AnyConnection, movie: &Movie) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO movies (id, external_id, title, synopsis, release_year, poster_path, synced_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         ON CONFLICT (id) DO UPDATE SET
            title = excluded.title,
            synopsis = excluded.synopsis,
            release_year = excluded.release_year,
            poster_path = excluded.poster_path,
            synced_at = excluded.synced_at",
    )
    .bind(&movie.id)
    .bind(movie.external_id)
    .bind(&movie.title)
    .bind(movie.synopsis.as_deref())
    .bind(movie.release_year.map(i64::from))
    .bind(movie.poster_path.as_deref())
    .bind(Utc::now().to_rfc3339())
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Existing genres whose name is exactly one of `names`.
pub async fn find_genres_by_name(
    conn: &mut AnyConnection,
    names: &[String],
) -> Result<Vec<Genre>, sqlx::Error> {
    let mut found = Vec::new();
    for name in names {
        if let Some(row) = sqlx::query("SELECT id, name FROM genres WHERE name = $1")
            .bind(name)
            .fetch_optional(&mut *conn)
            .await?
        {
            found.push(Genre {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
            });
        }
    }
    Ok(found)
}

pub async fn find_genre_by_id(
    conn: &mut AnyConnection,
    id: &str,
) -> Result<Option<Genre>, sqlx::Error> {
    sqlx::query("SELECT id, name FROM genres WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .map(|row| {
            Ok(Genre {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
            })
        })
        .transpose()
}

/// Returns false when a genre with the same id or name already exists.
pub async fn insert_genre(conn: &mut AnyConnection, genre: &Genre) -> Result<bool, sqlx::Error> {
    let res = sqlx::query("INSERT INTO genres (id, name) VALUES ($1, $2) ON CONFLICT DO NOTHING")
        .bind(&genre.id)
        .bind(&genre.name)
        .execute(&mut *conn)
        .await?;
    Ok(res.rows_affected() > 0)
}

/// Link a movie to a genre unless the pair is already linked.
pub async fn link_movie_genre(
    conn: &mut AnyConnection,
    movie_id: &str,
    genre_id: &str,
) -> Result<bool, sqlx::Error> {
    let exists = sqlx::query("SELECT 1 FROM movie_genres WHERE movie_id = $1 AND genre_id = $2")
        .bind(movie_id)
        .bind(genre_id)
        .fetch_optional(&mut *conn)
        .await?
        .is_some();
    if exists {
        debug!(movie_id, genre_id, "movie genre link exists");
        return Ok(false);
    }
    sqlx::query("INSERT INTO movie_genres (movie_id, genre_id) VALUES ($1, $2)")
        .bind(movie_id)
        .bind(genre_id)
        .execute(&mut *conn)
        .await?;
    Ok(true)
}

pub async fn find_platforms_by_name(
    conn: &mut AnyConnection,
    names: &[String],
) -> Result<Vec<Platform>, sqlx::Error> {
    let mut found = Vec::new();
    for name in names {
        if let Some(row) =
            sqlx::query("SELECT id, name, kind, link_url FROM platforms WHERE name = $1")
                .bind(name)
                .fetch_optional(&mut *conn)
                .await?
        {
            found.push(platform_from_row(&row)?);
        }
    }
    Ok(found)
}

pub async fn platform_names(conn: &mut AnyConnection) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT name FROM platforms ORDER BY name")
        .fetch_all(&mut *conn)
        .await
}

/// Plain insert: a concurrent insert of the same name fails the unique
/// constraint and aborts the caller's transaction.
pub async fn insert_platform(
    conn: &mut AnyConnection,
    platform: &Platform,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO platforms (id, name, kind, link_url) VALUES ($1, $2, $3, $4)")
        .bind(&platform.id)
        .bind(&platform.name)
        .bind(platform.kind.as_str())
        .bind(platform.link_url.as_deref())
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn movie_platform_exists(
    conn: &mut AnyConnection,
    movie_id: &str,
    platform_id: &str,
) -> Result<bool, sqlx::Error> {
    Ok(
        sqlx::query("SELECT 1 FROM movie_platforms WHERE movie_id = $1 AND platform_id = $2")
            .bind(movie_id)
            .bind(platform_id)
            .fetch_optional(&mut *conn)
            .await?
            .is_some(),
    )
}

pub async fn insert_movie_platform(
    conn: &mut AnyConnection,
    link: &MoviePlatform,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO movie_platforms (movie_id, platform_id, kind, price, link_url)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(&link.movie_id)
    .bind(&link.platform_id)
    .bind(link.kind.as_str())
    .bind(link.price)
    .bind(link.link_url.as_deref())
    .execute(&mut *conn)
    .await?;
    Ok(())
}

impl Db {
    #[instrument(skip(self))]
    pub async fn fetch_movie(&self, id: &str) -> Result<Option<MovieDetail>> {
        let Some(row) = sqlx::query(
            "SELECT id, external_id, title, synopsis, release_year, poster_path, synced_at
             FROM movies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };
        let (movie, synced_at) = movie_from_row(&row)?;

        let genres = sqlx::query(
            "SELECT g.id, g.name FROM genres g
             JOIN movie_genres mg ON mg.genre_id = g.id
             WHERE mg.movie_id = $1
             ORDER BY g.name",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|r| {
            Ok(Genre {
                id: r.try_get("id")?,
                name: r.try_get("name")?,
            })
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()?;

        let platforms = sqlx::query(
            "SELECT p.id, p.name, mp.kind, mp.price, mp.link_url FROM movie_platforms mp
             JOIN platforms p ON p.id = mp.platform_id
             WHERE mp.movie_id = $1
             ORDER BY p.name",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|r| {
            let kind: String = r.try_get("kind")?;
            Ok(PlatformListing {
                platform_id: r.try_get("id")?,
                name: r.try_get("name")?,
                kind: PlatformType::from_column(&kind),
                price: r.try_get("price")?,
                link_url: r.try_get("link_url")?,
            })
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(Some(MovieDetail {
            movie,
            synced_at,
            genres,
            platforms,
        }))
    }

    #[instrument(skip(self))]
    pub async fn list_movies(&self, limit: i64, offset: i64) -> Result<Vec<Movie>> {
        let rows = sqlx::query(
            "SELECT id, external_id, title, synopsis, release_year, poster_path, synced_at
             FROM movies ORDER BY title, id LIMIT $1 OFFSET $2",
        )
        .bind(limit.clamp(1, 500))
        .bind(offset.max(0))
        .fetch_all(&self.pool)
        .await?;
        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            out.push(movie_from_row(row)?.0);
        }
        Ok(out)
    }

    #[instrument(skip(self))]
    pub async fn list_platforms(&self) -> Result<Vec<Platform>> {
        let rows = sqlx::query("SELECT id, name, kind, link_url FROM platforms ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(platform_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }
}
