//! API exposure over HTTP

pub mod rest;

pub use rest::RestExposure;
