pub mod crawl;
pub mod list;
pub mod render;

pub use crawl::{CrawlOptions, crawl};
pub use list::{list_directory, list_shares};
pub use render::{JsonStyle, write_json, write_listing, write_shares, write_tree};
