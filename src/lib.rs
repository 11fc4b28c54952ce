//! Tag-aware search, replace and line breaking for subtitle text.
//!
//! Three layered components make up the engine. [`Finder`] runs literal and
//! regular-expression search and replace over one text with an explicit
//! cursor and no wrap-around. [`Parser`] adds inline-markup awareness: tags
//! matched by a caller-supplied pattern are lifted out before searching and
//! spliced back in afterwards, positions adjusted for every edit.
//! [`Liner`] adds automatic line breaking on top, re-wrapping a text into a
//! bounded number of visually even lines under a hard per-line length
//! limit.
//!
//! The crate has no I/O surface; markup codecs, pattern repositories and
//! multi-document search orchestration plug in through the tag pattern, the
//! break-point rules and the visible-length function.
//!
//! ```
//! use sublines::Finder;
//!
//! let mut finder = Finder::new();
//! finder.set_text("one two one");
//! finder.set_literal("one");
//! finder.set_replacement("1");
//! assert_eq!(finder.replace_all().unwrap(), 2);
//! assert_eq!(finder.text(), "1 two 1");
//! ```

mod breakpoints;
mod error;
mod finder;
mod liner;
mod macros;
mod parser;
mod partition;
mod pattern;
pub mod width;

pub use breakpoints::{BreakPoint, default_break_points};
pub use error::{Error, Result};
pub use finder::Finder;
pub use liner::Liner;
pub use parser::Parser;
pub use pattern::{Pattern, RegexOptions};
