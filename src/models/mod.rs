pub mod candidate;
pub mod employee;
pub mod user;
