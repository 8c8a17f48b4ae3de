pub mod config;
pub mod controller;
pub mod helpers;
pub mod models;
pub mod repositories;
pub mod search;
