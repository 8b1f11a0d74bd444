pub mod db;
pub mod movies;
pub mod providers;
pub mod sync;
pub mod tmdb;
pub mod watchmode;

use self::sync::MovieSync;
use self::tmdb::TmdbProvider;
use self::watchmode::WatchmodeProvider;

/// Engine wired to the live catalog and availability providers.
pub type LiveSync = MovieSync<TmdbProvider, WatchmodeProvider>;
