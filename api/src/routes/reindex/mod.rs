pub mod reindex_route;
