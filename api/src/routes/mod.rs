pub mod ask;
pub mod index_page;
pub mod reindex;
pub mod status;
