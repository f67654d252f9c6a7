pub mod service;
pub mod style;
