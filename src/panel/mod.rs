//! Parsers for the blog admin panel pages
//!
//! Each submodule takes the markup of one kind of page and returns plain
//! model values. None of them fetch anything.

pub mod categories;
pub mod comments;
pub mod dom;
pub mod listing;
pub mod post;

pub use categories::{extract_categories, parse_category_page};
pub use comments::{parse_comment_rows, parse_comments, CommentRow, ReplyRow};
pub use listing::{parse_post_listing, PostRef};
pub use post::{parse_post, PostFields};
