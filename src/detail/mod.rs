//! Detail module - single post pages

mod reading;
mod richtext;
mod view;

pub use reading::{count_words, estimate_read_minutes, estimate_read_minutes_at, WORDS_PER_MINUTE};
pub use richtext::render_rich_text;
pub use view::{DetailRenderer, DetailView, PostMeta, PostPage, RenderedBlock};
