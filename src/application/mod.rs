pub mod catalog;
pub mod error;
pub mod inject;
pub mod pagination;
pub mod render;
pub mod seo;
pub mod sitemap;
pub mod syndication;
