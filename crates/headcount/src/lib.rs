//! Core library for the headcount change reporter.
//!
//! A run fetches two dated snapshots of organizational records, diffs them
//! into an ordered list of change events, renders the result as an HTML
//! report, and hands the report to a mail gateway. The diff engine and the
//! renderers are pure; all I/O sits behind the [`directory::SnapshotSource`]
//! and [`mail::Mailer`] seams so the pipeline can be exercised in tests
//! without a warehouse or an SMTP server.

pub mod archive;
pub mod config;
pub mod directory;
pub mod error;
pub mod job;
pub mod mail;
pub mod report;
pub mod schedule;
pub mod telemetry;
