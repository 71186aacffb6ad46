//! Byte-level parsing for VT-compatible terminal streams.
//!
//! This crate implements the two lowest layers described in the terminal
//! core's design: an incremental [`ByteClassifier`] that turns a byte stream
//! into [`Token`]s, and a [`CsiCommand`] parser that interprets a collected
//! CSI payload's parameters, intermediates, and final byte. Neither layer
//! knows anything about screens, colors, or dispatch — that lives in the
//! `vtgrid` crate, one level up.

pub mod classifier;
pub mod csi;

pub use classifier::{ByteClassifier, ParserState, SeqBuf, Token, Utf8Buf};
pub use csi::{CsiCommand, Intermediates, Params};
