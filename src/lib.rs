//! Automail: email triage into Produtivo / Improdutivo with a suggested reply.

pub mod api;
pub mod classifier;
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
