// Proofly Domain
// This crate contains the health-signal derivation logic for the Proofly dashboard

// Services that implement business logic
pub mod services;

// Domain entities
pub mod entities;

// Environment-driven settings
pub mod config;

// Re-export the data layer for convenience
pub use proofly_data as data;

// Testing utilities - only available with mock feature
#[cfg(feature = "mock")]
pub mod testing;
