//! Research-paper metadata explorer.
//!
//! One pipeline (load → clean → aggregate) feeds two presenters: a batch
//! chart generator (`cord-charts`) and an interactive dashboard
//! (`cord-explorer`).

pub mod app;
pub mod cache;
pub mod charts;
pub mod color;
pub mod config;
pub mod data;
pub mod images;
pub mod present;
pub mod state;
pub mod ui;
