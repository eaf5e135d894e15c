//! Utility helpers shared by the config layer and the CLI

pub mod path;
