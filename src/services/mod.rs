// src/services/mod.rs
pub mod assembler;
pub mod dates;
pub mod error;
pub mod job;
pub mod provider;
pub mod scheduler;
pub mod store;
