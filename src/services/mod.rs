// src/services/mod.rs

pub mod attempts;
