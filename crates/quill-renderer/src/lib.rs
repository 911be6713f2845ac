//! Markdown to HTML rendering for the Quill site engine.
//!
//! The [`Markdown`] trait is the seam page building renders through;
//! [`CmarkRenderer`] is the pulldown-cmark implementation with the GFM
//! extensions (tables, strikethrough, task lists) enabled by default.
//! [`first_h1`] and [`first_p`] extract titles and descriptions from
//! rendered fragments.

mod html;
mod renderer;

pub use html::{escape_html, first_h1, first_p};
pub use renderer::{CmarkRenderer, Markdown};
