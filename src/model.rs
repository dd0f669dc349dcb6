//! In-memory content model of one migration run
//!
//! `Channel` is the root: site metadata plus posts in listing order. Posts own
//! their comments, tags and category attachments. The serializer only reads
//! this model.

use chrono::{DateTime, FixedOffset};

/// First id handed out by a fresh [`CommentIdAllocator`]
pub const FIRST_COMMENT_ID: u64 = 1000;

/// A node of the panel's category tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Panel category id (`catid` attribute)
    pub id: String,
    /// Display name
    pub name: String,
    /// Parent category id; `None` for root entries
    pub parent: Option<String>,
}

/// Publication state of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostStatus {
    #[default]
    Publish,
    Draft,
}

impl PostStatus {
    /// WXR `wp:status` value
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Publish => "publish",
            PostStatus::Draft => "draft",
        }
    }
}

/// A migrated blog post
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    /// Panel post id
    pub id: String,
    pub title: String,
    pub slug: String,
    /// Author login
    pub author: String,
    pub published: DateTime<FixedOffset>,
    pub status: PostStatus,
    /// Markup before the read-more boundary
    pub excerpt: String,
    /// Full body markup
    pub content: String,
    pub comments: Vec<Comment>,
    pub tags: Vec<Tag>,
    pub categories: Vec<CategoryRef>,
    pub meta: Vec<PostMeta>,
}

/// Where a comment hangs in its thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentParent {
    /// Top-level comment on the post
    Post,
    /// Reply to the comment with this id
    Comment(u64),
}

impl CommentParent {
    /// WXR `wp:comment_parent` value; 0 for top-level comments
    pub fn id(&self) -> u64 {
        match self {
            CommentParent::Post => 0,
            CommentParent::Comment(id) => *id,
        }
    }
}

/// A comment or a reply
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: u64,
    pub author: String,
    /// Commenter contact details; `None` when the panel has no such field
    /// for this kind of comment (replies), `Some("")` when the field is empty
    pub email: Option<String>,
    pub url: Option<String>,
    pub ip: Option<String>,
    pub date: DateTime<FixedOffset>,
    /// Raw HTML body
    pub content: String,
    pub approved: bool,
    pub parent: CommentParent,
}

/// A comment together with the blog owner's reply to it
#[derive(Debug, Clone, PartialEq)]
pub struct CommentThread {
    pub comment: Comment,
    pub reply: Option<Comment>,
}

impl CommentThread {
    /// The comment followed by its reply, in export order
    pub fn into_comments(self) -> impl Iterator<Item = Comment> {
        std::iter::once(self.comment).chain(self.reply)
    }
}

/// Sequential comment ids for one run
///
/// Ids are unique across all posts of a run. Replies get their parent id
/// from the value returned for the comment they answer.
///
/// ```
/// use panel2wxr::model::CommentIdAllocator;
///
/// let mut ids = CommentIdAllocator::new();
/// assert_eq!(ids.next_id(), 1000);
/// assert_eq!(ids.next_id(), 1001);
/// assert_eq!(ids.peek(), 1002);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentIdAllocator {
    next: u64,
}

impl CommentIdAllocator {
    pub fn new() -> Self {
        Self::starting_at(FIRST_COMMENT_ID)
    }

    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    /// Hand out the next id
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// The id the next call to [`next_id`](Self::next_id) will return
    pub fn peek(&self) -> u64 {
        self.next
    }
}

impl Default for CommentIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// A post tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub slug: String,
}

impl Tag {
    /// Build a tag from a raw panel label
    ///
    /// Line breaks are dropped, tabs become spaces, and the slug is the
    /// lower-cased, dash-joined, percent-encoded label. Returns `None` for
    /// labels that are empty after cleaning.
    ///
    /// ```
    /// use panel2wxr::model::Tag;
    ///
    /// let tag = Tag::from_label(" Rust Lang\r\n").unwrap();
    /// assert_eq!(tag.name, "Rust Lang");
    /// assert_eq!(tag.slug, "rust-lang");
    /// assert!(Tag::from_label(" \t ").is_none());
    /// ```
    pub fn from_label(label: &str) -> Option<Self> {
        let name = label
            .replace(['\r', '\n'], "")
            .replace('\t', " ")
            .trim()
            .to_string();
        if name.is_empty() {
            return None;
        }
        let slug = encode_slug(&name.replace(' ', "-").to_lowercase());
        Some(Self { name, slug })
    }
}

/// A category attached to a post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRef {
    pub name: String,
    pub nicename: String,
}

impl CategoryRef {
    pub fn from_category(category: &Category) -> Self {
        let name = category.name.trim().to_string();
        Self {
            nicename: encode_slug(&name),
            name,
        }
    }
}

/// A `wp:postmeta` key/value pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMeta {
    pub key: String,
    pub value: String,
}

/// Channel-level author entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: u64,
    pub login: String,
    pub email: String,
    pub display_name: String,
}

/// Channel-level category term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTerm {
    pub term_id: u64,
    pub nicename: String,
    pub name: String,
    /// Parent nicename, empty for roots
    pub parent: String,
}

/// Channel-level tag term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagTerm {
    pub term_id: u64,
    pub slug: String,
    pub name: String,
}

/// Optional channel-wide term declarations
///
/// The scraping flow leaves this empty; posts carry their own tag and
/// category elements.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TermRegistry {
    pub authors: Vec<Author>,
    pub categories: Vec<CategoryTerm>,
    pub tags: Vec<TagTerm>,
}

impl TermRegistry {
    pub fn is_empty(&self) -> bool {
        self.authors.is_empty() && self.categories.is_empty() && self.tags.is_empty()
    }
}

/// Root of the export document
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub title: String,
    /// Site base URL
    pub link: String,
    pub language: String,
    pub registry: TermRegistry,
    pub posts: Vec<Post>,
}

impl Channel {
    pub fn new(title: impl Into<String>, link: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            language: language.into(),
            registry: TermRegistry::default(),
            posts: Vec::new(),
        }
    }

    /// Total comments and replies across all posts
    pub fn comment_count(&self) -> usize {
        self.posts.iter().map(|p| p.comments.len()).sum()
    }
}

/// Percent-encode a slug, leaving `/` intact
pub fn encode_slug(text: &str) -> String {
    urlencoding::encode(text).replace("%2F", "/")
}
