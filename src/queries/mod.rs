pub mod ddl;
pub mod pictures;
