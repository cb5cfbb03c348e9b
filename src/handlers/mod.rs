// src/handlers/mod.rs

pub mod database;
