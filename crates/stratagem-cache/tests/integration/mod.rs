mod file_storage;
mod markup_cache;
mod snapshots;
