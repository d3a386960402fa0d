// src/handlers/mod.rs

pub mod auth;
pub mod dictionary;
pub mod leaderboard;
pub mod profile;
pub mod quiz;
