// src/lib.rs
pub mod add_lane;
pub mod app;
pub mod config;
pub mod display;
pub mod errors;
pub mod event;
pub mod feed;
pub mod fetch;
pub mod lanes;
pub mod listing;
pub mod logging;
pub mod manager;
pub mod render;
pub mod storage;
pub mod ui;
