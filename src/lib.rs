//! Builds a stop list of high-frequency terms from random encyclopedia articles.
//!
//! `stoplist-builder` samples random articles through a [`source::PageSource`],
//! tokenizes them, one-hot encodes every document against the shared
//! vocabulary, and keeps the terms whose document frequency exceeds a
//! threshold. Column order, ranking and tie-breaks are deterministic; only
//! page sampling is random.

pub mod analysis;
pub mod config;
pub mod document;
pub mod matrix;
pub mod pipeline;
pub mod source;
pub mod tokenize;
pub mod types;
