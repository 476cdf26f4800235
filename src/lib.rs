// src/lib.rs

//! tubescope channel harvester library

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
