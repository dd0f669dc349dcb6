//! Post edit page

use chrono::{DateTime, FixedOffset};
use scraper::Html;

use super::dom;
use crate::calendar::{jalali_datetime, PanelZone};
use crate::{MigrateError, Result};

/// Hidden input the editor inserts at the "read more" boundary
pub const READ_MORE_MARKER: &str =
    r#"<input type="button" id="read_more" style="display:none;" alt="ادامه مطلب">"#;

/// Fields read from a post's edit page
#[derive(Debug, Clone, PartialEq)]
pub struct PostFields {
    pub title: String,
    pub slug: String,
    /// Normalized author login; `None` when the page has no usable label
    pub author: Option<String>,
    pub published: DateTime<FixedOffset>,
    /// Body before the read-more marker
    pub excerpt: String,
    /// Whole body with the marker removed
    pub content: String,
    /// Raw comma-separated tag labels
    pub tags: Vec<String>,
    /// Raw comma-separated category ids
    pub category_ids: Vec<String>,
}

impl PostFields {
    /// Author login, or `default` when the page did not name one
    pub fn author_or(&self, default: &str) -> String {
        match &self.author {
            Some(author) => author.clone(),
            None => default.to_string(),
        }
    }
}

/// Parse a post edit page
///
/// Publish date and time come from the `publish_date` (`Y/M/D`) and
/// `publish_date_time` (`H:M[:S]`) inputs, as Jalali values in `zone`.
pub fn parse_post(markup: &str, zone: impl Into<PanelZone>) -> Result<PostFields> {
    let doc = Html::parse_document(markup);
    let root = doc.root_element();

    let title = dom::input_value(root, &dom::selector("input#txtPostTitle")?, "input#txtPostTitle")?;
    let slug = dom::input_value(root, &dom::selector("input#txtUrl")?, "input#txtUrl")?;

    let author = dom::first(root, &dom::selector("span.postUser")?)
        .and_then(|label| normalize_author(&dom::text(label)));

    let date = dom::input_value(
        root,
        &dom::selector(r#"input[name="publish_date"]"#)?,
        "publish_date input",
    )?;
    let time = dom::input_value(
        root,
        &dom::selector(r#"input[name="publish_date_time"]"#)?,
        "publish_date_time input",
    )?;
    let published = publish_timestamp(&date, &time, zone.into())?;

    let tags = split_list(&dom::input_value(root, &dom::selector("input#tags")?, "input#tags")?);
    let category_ids = split_list(&dom::input_value(
        root,
        &dom::selector("input#icategories")?,
        "input#icategories",
    )?);

    let body = dom::require(root, &dom::selector("textarea#txt0")?, "textarea#txt0")?;
    let (excerpt, content) = split_body(&dom::text(body));

    Ok(PostFields {
        title,
        slug,
        author,
        published,
        excerpt,
        content,
        tags,
        category_ids,
    })
}

/// Turn the author label into a login: no ASCII punctuation, no
/// whitespace, lower case
///
/// ```
/// use panel2wxr::panel::post::normalize_author;
///
/// assert_eq!(normalize_author(" Alireza Ahani. ").as_deref(), Some("alirezaahani"));
/// assert_eq!(normalize_author(" ... "), None);
/// ```
pub fn normalize_author(label: &str) -> Option<String> {
    let login: String = label
        .chars()
        .filter(|c| !c.is_ascii_punctuation() && !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    if login.is_empty() { None } else { Some(login) }
}

/// Split the editor body at the read-more marker into (excerpt, content)
pub fn split_body(body: &str) -> (String, String) {
    let mut parts = body.split(READ_MORE_MARKER);
    let excerpt = parts.next().unwrap_or_default().to_string();
    let content = body.replace(READ_MORE_MARKER, "");
    (excerpt, content)
}

fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(str::to_string).collect()
}

fn numbers(value: &str, sep: char, what: &str) -> Result<Vec<u32>> {
    value
        .split(sep)
        .map(|part| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| MigrateError::format(format!("Invalid {}: {:?}", what, value)))
        })
        .collect()
}

fn publish_timestamp(date: &str, time: &str, zone: PanelZone) -> Result<DateTime<FixedOffset>> {
    let (year, month, day) = match numbers(date, '/', "publish date")?.as_slice() {
        &[year, month, day] => (year, month, day),
        _ => return Err(MigrateError::format(format!("Invalid publish date: {:?}", date))),
    };
    let (hour, minute, second) = match numbers(time, ':', "publish time")?.as_slice() {
        &[hour, minute] => (hour, minute, 0),
        &[hour, minute, second] => (hour, minute, second),
        _ => return Err(MigrateError::format(format!("Invalid publish time: {:?}", time))),
    };
    let year = i32::try_from(year)
        .map_err(|_| MigrateError::format(format!("Invalid publish year: {}", year)))?;
    jalali_datetime(year, month, day, hour, minute, second, zone)
}
