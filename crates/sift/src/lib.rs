//! sift: a boolean filter query language.
//!
//! Queries such as `since:2021 AND (until:2022 OR author:octocat)` are lexed, parsed into
//! an AND/OR tree, and compiled against a key table into the boolean query a search
//! backend executes. This crate is the `sift` command-line front end; the stages live in
//! `sift-query`, `sift-compile` and `sift-config`.

#![warn(missing_docs)]

pub mod cli;
