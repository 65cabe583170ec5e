//! # clinicslot core
//!
//! Domain types and the availability → slot → booking engine. Nothing in
//! this crate talks to a database directly; storage is reached through
//! [`repository::BookingRepository`].

pub mod booking;
pub mod errors;
pub mod models;
pub mod repository;
pub mod slots;
