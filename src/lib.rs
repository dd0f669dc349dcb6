#![doc = include_str!("../README.md")]

/// Builds the export model from panel pages
pub mod builder;
/// Jalali panel dates to timestamps
pub mod calendar;
pub mod config;
mod error;
/// Page transport and cookie loading
pub mod fetch;
pub mod model;
/// Parsers for the admin panel pages
pub mod panel;
/// WXR document writer
pub mod wxr;

pub use builder::Migration;
pub use calendar::{LocaleDateConverter, PanelZone};
pub use config::MigrationConfig;
pub use error::{MigrateError, Result};
pub use fetch::{HttpFetcher, PageFetcher};
pub use model::{
    Category, CategoryRef, Channel, Comment, CommentIdAllocator, CommentParent, CommentThread,
    Post, PostMeta, PostStatus, Tag,
};
