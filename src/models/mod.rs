// src/models/mod.rs

pub mod question;
pub mod quiz;
pub mod quiz_result;
pub mod trivia;
pub mod user;
