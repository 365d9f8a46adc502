/// loading of mixture task files: substance list, offline property records, settings
pub mod load_from_file;
