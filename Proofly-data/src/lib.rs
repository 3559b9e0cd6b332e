// Proofly Data
// This crate models the documents delivered by the external document store

// Document models
pub mod models;

// Read access over a delivered snapshot
pub mod repository;
