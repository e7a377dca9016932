pub mod adapters;
pub mod coach;
pub mod config;
pub mod error;
pub mod web;
