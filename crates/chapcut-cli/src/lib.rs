//! Command-line audiobook chapter splitter.
//!
//! Two passes share the sidecar annotation format: `find` detects chapter
//! boundary candidates and writes `<input>-chapters.txt` for a human to
//! name, `split` reads the annotations back and extracts one file per
//! chapter.

pub mod annotations;
pub mod cli;
pub mod find;
pub mod split;
