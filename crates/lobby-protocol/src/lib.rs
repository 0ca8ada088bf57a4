//! lobby-protocol
//!
//! Wire-level text encoding for the spell lobby.
//!
//! This crate turns raw lines into `lobby_core::Input` and
//! `lobby_core::Notice` values into the exact text players read.
//!
//! - [`text_codec`] : line parser and notice formatter

pub mod text_codec;

pub use text_codec::{format_notice, parse_input_line, INSTRUCTIONS};
