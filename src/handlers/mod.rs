// src/handlers/mod.rs
pub mod error;
pub mod horoscopes;
pub mod jobs;
