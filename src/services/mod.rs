// src/services/mod.rs
//
// Clients for third-party services used by the domain modules

pub mod perenual;

pub use perenual::{ExternalApiError, PerenualClient, SpeciesApi};
