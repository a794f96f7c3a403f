use sea_query::{ColumnDef, Index, SqliteQueryBuilder, Table};

use crate::schema::Pictures;

/// CREATE TABLE IF NOT EXISTS pictures (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     animal TEXT NOT NULL,
///     filename TEXT NOT NULL,
///     source_url TEXT NOT NULL,
///     saved_at TEXT NOT NULL
/// )
pub fn create_pictures_table() -> String {
    Table::create()
        .table(Pictures::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Pictures::Id)
                .integer()
                .primary_key()
                .auto_increment(),
        )
        .col(ColumnDef::new(Pictures::Animal).string().not_null())
        .col(ColumnDef::new(Pictures::Filename).string().not_null())
        .col(ColumnDef::new(Pictures::SourceUrl).string().not_null())
        .col(ColumnDef::new(Pictures::SavedAt).string().not_null())
        .to_string(SqliteQueryBuilder)
}

/// CREATE INDEX IF NOT EXISTS idx_pictures_animal_saved_at ON pictures(animal, saved_at)
pub fn create_pictures_animal_saved_at_index() -> String {
    Index::create()
        .if_not_exists()
        .name("idx_pictures_animal_saved_at")
        .table(Pictures::Table)
        .col(Pictures::Animal)
        .col(Pictures::SavedAt)
        .to_string(SqliteQueryBuilder)
}
