pub mod config;
pub mod error;
pub mod ingest;
pub mod graph;
pub mod render;

pub use config::Config;
pub use error::{TechtreeError, Result};
pub use graph::{TaskGraph, render_dot};
pub use ingest::{Corpus, ErrorPolicy, LoadReport, TaskRecord, load_corpus};
