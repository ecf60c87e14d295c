//! Data models for the globe weather overlay
//!
//! - City: a named place to put a weather marker on

pub mod city;

pub use city::City;
