//! Low-level HTML helpers shared by link discovery and field extraction.

pub mod html;
pub mod text;

pub use html::{page_text, parse_links};
pub use text::{TextJoin, join_text_nodes, non_empty};
