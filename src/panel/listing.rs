//! Post listing page

use scraper::Html;

use super::dom;
use crate::{MigrateError, Result};

/// Title of the edit link next to each post in the listing
pub const EDIT_LINK_TITLE: &str = "ویرایش";

/// A post found on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRef {
    /// Post id, the last path segment of the edit link
    pub id: String,
    /// Site-relative path of the edit page
    pub edit_path: String,
}

/// Collect the edit links of a posts listing page, in page order
pub fn parse_post_listing(markup: &str) -> Result<Vec<PostRef>> {
    let doc = Html::parse_document(markup);
    let edit_links = dom::selector(&format!("a[title=\"{}\"]", EDIT_LINK_TITLE))?;

    doc.root_element()
        .select(&edit_links)
        .map(|a| {
            let href = dom::require_attr(a, "href", "edit link")?;
            let id = href
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .filter(|id| !id.is_empty())
                .ok_or_else(|| MigrateError::format(format!("No post id in edit link {:?}", href)))?;
            Ok(PostRef {
                id: id.to_string(),
                edit_path: href.to_string(),
            })
        })
        .collect()
}
