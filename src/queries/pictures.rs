use sea_query::{Expr, Order, Query, SqliteQueryBuilder};

use crate::schema::Pictures;

/// INSERT INTO pictures (animal, filename, source_url, saved_at) VALUES (?, ?, ?, ?)
pub fn insert(animal: &str, filename: &str, source_url: &str, saved_at: &str) -> String {
    Query::insert()
        .into_table(Pictures::Table)
        .columns([
            Pictures::Animal,
            Pictures::Filename,
            Pictures::SourceUrl,
            Pictures::SavedAt,
        ])
        .values_panic([
            animal.into(),
            filename.into(),
            source_url.into(),
            saved_at.into(),
        ])
        .to_string(SqliteQueryBuilder)
}

/// SELECT id, animal, filename, source_url, saved_at FROM pictures
/// WHERE animal = ? ORDER BY saved_at DESC, id DESC LIMIT 1
///
/// The id ordering makes the result deterministic when two rows share a
/// saved_at timestamp.
pub fn select_most_recent(animal: &str) -> String {
    Query::select()
        .columns([
            Pictures::Id,
            Pictures::Animal,
            Pictures::Filename,
            Pictures::SourceUrl,
            Pictures::SavedAt,
        ])
        .from(Pictures::Table)
        .and_where(Expr::col(Pictures::Animal).eq(animal))
        .order_by(Pictures::SavedAt, Order::Desc)
        .order_by(Pictures::Id, Order::Desc)
        .limit(1)
        .to_string(SqliteQueryBuilder)
}

/// SELECT COUNT(id) FROM pictures (for test verification)
pub fn select_count() -> String {
    Query::select()
        .expr(Expr::col(Pictures::Id).count())
        .from(Pictures::Table)
        .to_string(SqliteQueryBuilder)
}
