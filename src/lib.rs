//! # joplin-zola
//!
//! Convert a Joplin markdown export into Zola content.
//!
//! A run walks the export's notes tree, rewrites each note's front matter
//! into Zola's shape, points embedded image links at the site's image
//! directory, copies the referenced images across, and finally removes the
//! export.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────┐   ┌──────────────┐
//! │ Joplin notes │──▶│ split / remap /  │──▶│ Zola content │
//! │  Website/    │   │ rewrite links    │   │  content/    │
//! └──────────────┘   └────────┬─────────┘   └──────────────┘
//!                             │ image names
//!                             ▼
//! ┌──────────────┐   ┌──────────────────┐
//! │ _resources/  │──▶│ static/images/   │
//! └──────────────┘   └──────────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Header records and run report |
//! | [`frontmatter`] | Header/body split, parse, render |
//! | [`resources`] | Image link rewriting and copying |
//! | [`slug`] | Destination file names |
//! | [`scan`] | Notes tree walk and filtering |
//! | [`transcode`] | Run orchestration |
//! | [`progress`] | Progress reporting on stderr |
//! | [`check`] | Directory layout health |

pub mod check;
pub mod config;
pub mod frontmatter;
pub mod models;
pub mod progress;
pub mod resources;
pub mod scan;
pub mod slug;
pub mod transcode;
