//! Content model builder
//!
//! Drives one migration run: category table, post listing, then per post its
//! edit page and comment pages. Everything is fetched sequentially through a
//! [`PageFetcher`] and assembled into a [`Channel`]. Any error aborts the run.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::calendar::LocaleDateConverter;
use crate::config::MigrationConfig;
use crate::fetch::PageFetcher;
use crate::model::{
    Category, CategoryRef, Channel, Comment, CommentIdAllocator, Post, PostStatus, Tag,
};
use crate::panel::{self, CommentRow, PostRef};
use crate::{MigrateError, Result};

/// `page` query value: `N(size)`
///
/// ```
/// assert_eq!(panel2wxr::builder::page_param(2, 100), "2(100)");
/// ```
pub fn page_param(page: usize, page_size: usize) -> String {
    format!("{}({})", page, page_size)
}

/// Clean raw tag labels, dropping the ones left empty
pub fn clean_tags<S: AsRef<str>>(labels: &[S]) -> Vec<Tag> {
    labels.iter().filter_map(|label| Tag::from_label(label.as_ref())).collect()
}

/// Look up a post's category ids in the category table
///
/// Ids are trimmed and blank ids skipped. An id missing from the table is a
/// [`MigrateError::Lookup`].
pub fn resolve_categories<S: AsRef<str>>(
    ids: &[S],
    table: &HashMap<String, Category>,
) -> Result<Vec<CategoryRef>> {
    ids.iter()
        .map(|id| id.as_ref().trim())
        .filter(|id| !id.is_empty())
        .map(|id| {
            table
                .get(id)
                .map(CategoryRef::from_category)
                .ok_or_else(|| MigrateError::Lookup(id.to_string()))
        })
        .collect()
}

/// One migration run against a panel
///
/// # Example
///
/// ```no_run
/// use panel2wxr::{HttpFetcher, Migration, MigrationConfig};
///
/// # fn main() -> panel2wxr::Result<()> {
/// let config = MigrationConfig::new("kaliuser", "https://domain.tld");
/// let fetcher = HttpFetcher::from_cookie_file(&config, "cookies.txt")?;
/// let channel = Migration::new(config, fetcher)?.run()?;
/// panel2wxr::wxr::write_file(&channel, "output.xml")?;
/// # Ok(())
/// # }
/// ```
pub struct Migration<F> {
    config: MigrationConfig,
    fetcher: F,
    ids: CommentIdAllocator,
    dates: LocaleDateConverter,
}

impl<F: PageFetcher> Migration<F> {
    /// Validate `config` and prepare a run with a fresh comment id sequence
    pub fn new(config: MigrationConfig, fetcher: F) -> Result<Self> {
        config.validate()?;
        let dates = LocaleDateConverter::new(config.zone()?);
        Ok(Self {
            config,
            fetcher,
            ids: CommentIdAllocator::new(),
            dates,
        })
    }

    pub fn config(&self) -> &MigrationConfig {
        &self.config
    }

    /// Scrape the panel and build the export model
    pub fn run(mut self) -> Result<Channel> {
        let categories = self.fetch_categories()?;
        let listing = self.list_posts()?;
        info!(
            "Found {} categories and {} posts for {}",
            categories.len(),
            listing.len(),
            self.config.blog
        );

        let mut channel = Channel::new(
            self.config.site_title.clone(),
            self.config.site_root(),
            self.config.language.clone(),
        );
        for (index, post_ref) in listing.iter().enumerate() {
            let post = self.build_post(post_ref, &categories)?;
            info!(
                "[{}/{}] Post {} \"{}\" with {} comments",
                index + 1,
                listing.len(),
                post.id,
                post.title,
                post.comments.len()
            );
            channel.posts.push(post);
        }

        info!(
            "Migrated {} posts, {} comments",
            channel.posts.len(),
            channel.comment_count()
        );
        Ok(channel)
    }

    fn fetch_categories(&self) -> Result<HashMap<String, Category>> {
        let body = self.fetcher.fetch(&self.config.panel_url("categories"), &[])?;
        panel::parse_category_page(&body)
    }

    /// Walk the posts listing until a short, empty or repeated page
    fn list_posts(&self) -> Result<Vec<PostRef>> {
        let url = self.config.panel_url("posts");
        let page_size = self.config.page_size;
        let mut seen = HashSet::new();
        let mut posts = Vec::new();

        for page in 1..=self.config.max_pages {
            let param = page_param(page, page_size);
            let body = self.fetcher.fetch(&url, &[("page", param.as_str())])?;
            let refs = panel::parse_post_listing(&body)?;
            let count = refs.len();
            debug!("Listing page {}: {} posts", page, count);

            let fresh: Vec<PostRef> = refs
                .into_iter()
                .filter(|r| seen.insert(r.id.clone()))
                .collect();
            if count > 0 && fresh.is_empty() {
                warn!("Listing page {} repeats earlier posts, stopping", page);
                return Ok(posts);
            }
            posts.extend(fresh);

            if count < page_size {
                return Ok(posts);
            }
        }
        warn!("Stopped listing after {} pages", self.config.max_pages);
        Ok(posts)
    }

    fn build_post(&mut self, post_ref: &PostRef, categories: &HashMap<String, Category>) -> Result<Post> {
        let body = self
            .fetcher
            .fetch(&self.config.absolute_url(&post_ref.edit_path), &[])?;
        let fields = panel::parse_post(&body, self.dates.zone())?;

        let author = fields.author_or(&self.config.default_author);
        if fields.author.is_none() {
            debug!("Post {} has no author label, using {}", post_ref.id, author);
        }

        let tags = clean_tags(&fields.tags);
        let categories = resolve_categories(&fields.category_ids, categories)?;
        let comments = self.fetch_comments(&post_ref.id)?;

        Ok(Post {
            id: post_ref.id.clone(),
            title: fields.title,
            slug: fields.slug,
            author,
            published: fields.published,
            status: PostStatus::Publish,
            excerpt: fields.excerpt,
            content: fields.content,
            comments,
            tags,
            categories,
            meta: Vec::new(),
        })
    }

    /// Collect every comment page of a post, in panel order
    ///
    /// A page with the same rows as the one before means the panel ignored
    /// the page parameter; it is dropped before any id is taken.
    fn fetch_comments(&mut self, post_id: &str) -> Result<Vec<Comment>> {
        let url = self.config.panel_url("comments");
        let page_size = self.config.page_size;
        let mut comments = Vec::new();
        let mut previous: Option<Vec<CommentRow>> = None;

        for page in 1..=self.config.max_pages {
            let param = page_param(page, page_size);
            let body = self
                .fetcher
                .fetch(&url, &[("page", param.as_str()), ("for_post", post_id)])?;

            let rows = panel::parse_comment_rows(&body, &self.dates)?;
            let count = rows.len();
            if count > 0 && previous.as_ref() == Some(&rows) {
                warn!("Comment page {} of post {} repeats, stopping", page, post_id);
                break;
            }
            debug!("Post {} comment page {}: {} comments", post_id, page, count);

            for row in rows.iter().cloned() {
                comments.extend(row.into_thread(&mut self.ids).into_comments());
            }

            if count < page_size {
                break;
            }
            previous = Some(rows);
        }
        Ok(comments)
    }
}
