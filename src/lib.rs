pub mod analysis;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod report;
pub mod scanner;
pub mod util;
