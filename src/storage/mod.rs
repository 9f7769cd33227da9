mod catalog;
mod export;

pub use catalog::Catalog;
pub use export::{preview_table, read_json, sort_by_year_desc, write_json, DEFAULT_EXPORT_PATH};
