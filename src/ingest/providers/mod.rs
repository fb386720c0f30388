pub mod bom_rss;
