use sea_query::Iden;

/// Pictures table - one row per successfully downloaded image
#[derive(Iden)]
pub enum Pictures {
    Table,
    Id,
    Animal,
    Filename,
    SourceUrl,
    SavedAt,
}
