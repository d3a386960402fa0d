// src/store/mod.rs

//! SQLite persistence for users, quizzes, questions and results.
//!
//! This is the only module that writes rows. Multi-row writes run inside a
//! single transaction that rolls back when dropped uncommitted.

pub mod quiz;
pub mod result;
pub mod user;
