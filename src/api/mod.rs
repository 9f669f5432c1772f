pub mod error;
pub mod rest;
