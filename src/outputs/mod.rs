//! Output files written by the batch flow.
//!
//! - [`page`]: the static `news.html` document
//! - [`json`]: an optional `news.json` snapshot of the same payload
//!
//! ```text
//! pages/
//! └── news.html
//! json_output_dir/
//! └── news.json
//! ```

pub mod json;
pub mod page;
