pub mod appointment;
pub mod availability;
pub mod booking;
pub mod health;
