//! Binary node formats

pub mod animation;

pub use animation::*;
