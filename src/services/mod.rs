pub mod demo;
pub mod heatmap;
pub mod news;
pub mod trends;
