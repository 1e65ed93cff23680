//! Composition storage
//!
//! The library catalog as the file scanner sees it: candidate selection by
//! scan watermark, tag write-back, and watermark updates.

use crate::StorageError;
use soul_core::types::{Composition, CompositionId, NewComposition, SourceTags, Timestamp};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

type Result<T> = std::result::Result<T, StorageError>;

const COLUMNS: &str = "id, file_path, title, artist, album, album_artist, genre, year, \
                       track_number, disc_number, duration_ms, last_file_scan_time, \
                       created_at, updated_at";

fn map_row(row: &SqliteRow) -> Composition {
    Composition {
        id: row.get("id"),
        file_path: row.get("file_path"),
        title: row.get("title"),
        artist: row.get("artist"),
        album: row.get("album"),
        album_artist: row.get("album_artist"),
        genre: row.get("genre"),
        year: row.get("year"),
        track_number: row.get("track_number"),
        disc_number: row.get("disc_number"),
        duration_ms: row.get("duration_ms"),
        last_file_scan_time: row.get("last_file_scan_time"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Register a new composition. It starts out never scanned.
///
/// Takes a connection so callers can run it inside the transaction that
/// also bumps the library version.
pub async fn insert(
    conn: &mut SqliteConnection,
    composition: &NewComposition,
) -> Result<Composition> {
    let now = chrono::Utc::now().timestamp_millis();

    let row = sqlx::query(&format!(
        "INSERT INTO compositions (file_path, title, last_file_scan_time, created_at, updated_at)
         VALUES (?, ?, 0, ?, ?)
         RETURNING {COLUMNS}"
    ))
    .bind(&composition.file_path)
    .bind(&composition.title)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    Ok(map_row(&row))
}

/// Delete a composition. Returns false if it did not exist.
pub async fn delete(conn: &mut SqliteConnection, id: CompositionId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM compositions WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Get a composition by ID
pub async fn get_by_id(pool: &SqlitePool, id: CompositionId) -> Result<Option<Composition>> {
    let row = sqlx::query(&format!("SELECT {COLUMNS} FROM compositions WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(map_row))
}

/// Get all compositions ordered by ID
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Composition>> {
    let rows = sqlx::query(&format!("SELECT {COLUMNS} FROM compositions ORDER BY id"))
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(map_row).collect())
}

/// Next composition scanned at or before `cutoff`, oldest first
pub async fn select_next_to_scan(
    pool: &SqlitePool,
    cutoff: Timestamp,
) -> Result<Option<Composition>> {
    let row = sqlx::query(&format!(
        "SELECT {COLUMNS} FROM compositions
         WHERE last_file_scan_time <= ?
         ORDER BY last_file_scan_time ASC, id ASC
         LIMIT 1"
    ))
    .bind(cutoff)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(map_row))
}

/// Overwrite tag columns with values read from the file
///
/// The stored title survives when the file carries none.
pub async fn update_by_source_tags(
    pool: &SqlitePool,
    id: CompositionId,
    tags: &SourceTags,
) -> Result<()> {
    let now = chrono::Utc::now().timestamp_millis();

    let result = sqlx::query(
        "UPDATE compositions SET
            title = COALESCE(?, title),
            artist = ?,
            album = ?,
            album_artist = ?,
            genre = ?,
            year = ?,
            track_number = ?,
            disc_number = ?,
            duration_ms = ?,
            updated_at = ?
         WHERE id = ?",
    )
    .bind(&tags.title)
    .bind(&tags.artist)
    .bind(&tags.album)
    .bind(&tags.album_artist)
    .bind(&tags.genre)
    .bind(tags.year)
    .bind(tags.track_number)
    .bind(tags.disc_number)
    .bind(tags.duration_ms)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Composition", id.to_string()));
    }

    Ok(())
}

/// Advance the scan watermark. A deleted row is silently skipped.
pub async fn set_last_file_scan_time(
    pool: &SqlitePool,
    id: CompositionId,
    scanned_at: Timestamp,
) -> Result<()> {
    sqlx::query("UPDATE compositions SET last_file_scan_time = ? WHERE id = ?")
        .bind(scanned_at)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
