//! # Integration Tests
//!
//! Cross-crate flows between `sc-07-block-bloom` and `sc-08-consensus`.

pub mod flows;
