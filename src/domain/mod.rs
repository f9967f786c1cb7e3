pub mod keywords;
pub mod posts;
pub mod rich_text;
