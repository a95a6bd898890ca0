pub mod classification;
pub mod daily;
pub mod peaks;
pub mod series;
