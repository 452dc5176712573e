//! Suno - Automated Hinglish Caption Pipeline
//!
//! A Rust implementation of an automated pipeline for turning Hinglish
//! speech audio into word-level timed captions using an external whisper
//! engine, the Groq correction API, and rclone.

pub mod caption;
pub mod cli;
pub mod config;
pub mod enhance;
pub mod error;
pub mod media;
pub mod timing;
pub mod transcribe;
pub mod upload;
pub mod workflow;
