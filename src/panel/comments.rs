//! Comment listing page
//!
//! Each comment is a `div.commentRow`. The header (`div.logHeadData`) reads
//! "<author> <date> در مطلب <post title>". When the blog owner answered, the
//! row carries `div.replyInfo` ("پاسخ توسط <author> در <date>") and
//! `div.replyText`; unanswered rows carry a `div.emptyReply` marker instead.

use chrono::{DateTime, FixedOffset};
use scraper::{ElementRef, Html, Selector};
use tracing::trace;

use super::dom;
use crate::calendar::LocaleDateConverter;
use crate::model::{Comment, CommentIdAllocator, CommentParent, CommentThread};
use crate::{MigrateError, Result};

/// Separates the comment header from the post title
pub const IN_POST_DELIMITER: &str = "در مطلب";
/// Leads the reply header
pub const REPLY_PREFIX: &str = "پاسخ توسط";
/// Separates the reply author from the reply date
pub const REPLY_DATE_DELIMITER: &str = "در";

struct RowSelectors {
    row: Selector,
    website: Selector,
    ip: Selector,
    email: Selector,
    full_comment: Selector,
    empty_reply: Selector,
    reply_text: Selector,
    reply_info: Selector,
    log_date: Selector,
    head: Selector,
}

impl RowSelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            row: dom::selector("div.commentRow")?,
            website: dom::selector("a.website")?,
            ip: dom::selector("a.ip")?,
            email: dom::selector("a.email")?,
            full_comment: dom::selector("div.fullComment")?,
            empty_reply: dom::selector("div.emptyReply")?,
            reply_text: dom::selector("div.replyText")?,
            reply_info: dom::selector("div.replyInfo")?,
            log_date: dom::selector("span.logDate")?,
            head: dom::selector("div.logHeadData")?,
        })
    }
}

/// Fields of one comment row, before ids are assigned
///
/// Two rows are equal when every field matches, which is how a page served
/// again is recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRow {
    pub author: String,
    pub email: String,
    pub url: String,
    pub ip: String,
    pub date: DateTime<FixedOffset>,
    pub content: String,
    pub reply: Option<ReplyRow>,
}

/// The owner's answer to a comment row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyRow {
    pub author: String,
    pub date: DateTime<FixedOffset>,
    pub content: String,
}

/// Parse every comment row of a listing page, in document order
///
/// Each comment takes the next id from `ids`; its reply, if any, takes the
/// following one and points back at the comment. No id is taken unless the
/// whole page parses.
pub fn parse_comments(
    markup: &str,
    ids: &mut CommentIdAllocator,
    dates: &LocaleDateConverter,
) -> Result<Vec<CommentThread>> {
    Ok(parse_comment_rows(markup, dates)?
        .into_iter()
        .map(|row| row.into_thread(ids))
        .collect())
}

/// Parse every comment row of a listing page without assigning ids
pub fn parse_comment_rows(markup: &str, dates: &LocaleDateConverter) -> Result<Vec<CommentRow>> {
    let doc = Html::parse_document(markup);
    let selectors = RowSelectors::new()?;

    doc.root_element()
        .select(&selectors.row)
        .map(|row| parse_row(row, &selectors, dates))
        .collect()
}

fn parse_row(row: ElementRef<'_>, s: &RowSelectors, dates: &LocaleDateConverter) -> Result<CommentRow> {
    let url = dom::first(row, &s.website)
        .and_then(|a| a.value().attr("href"))
        .map(|href| href.trim().to_string())
        .unwrap_or_default();
    let ip = optional_text(row, &s.ip);
    let email = optional_text(row, &s.email);

    let content = dom::first(row, &s.full_comment)
        .map(|div| div.inner_html())
        .unwrap_or_default();

    let log_date = dom::text(dom::require(row, &s.log_date, "span.logDate")?)
        .trim()
        .to_string();
    let date = dates.parse(&log_date)?;

    let head = dom::text(dom::require(row, &s.head, "div.logHeadData")?);
    let author = head
        .split(IN_POST_DELIMITER)
        .next()
        .unwrap_or_default()
        .replace(&log_date, "")
        .trim()
        .to_string();

    // The marker decides, not whether reply text is present.
    let reply = if dom::first(row, &s.empty_reply).is_some() {
        None
    } else {
        Some(parse_reply(row, s, dates)?)
    };

    Ok(CommentRow {
        author,
        email,
        url,
        ip,
        date,
        content,
        reply,
    })
}

fn parse_reply(row: ElementRef<'_>, s: &RowSelectors, dates: &LocaleDateConverter) -> Result<ReplyRow> {
    let content = dom::first(row, &s.reply_text)
        .map(|div| div.inner_html())
        .unwrap_or_default();

    let info = dom::text(dom::require(row, &s.reply_info, "div.replyInfo")?);
    let (author, date) = info.rsplit_once(REPLY_DATE_DELIMITER).ok_or_else(|| {
        MigrateError::format(format!("Reply header without date: {:?}", info.trim()))
    })?;

    Ok(ReplyRow {
        author: author.replace(REPLY_PREFIX, "").trim().to_string(),
        date: dates.parse(date.trim())?,
        content,
    })
}

impl CommentRow {
    /// Take ids for the comment and its reply and build the thread
    pub fn into_thread(self, ids: &mut CommentIdAllocator) -> CommentThread {
        let comment_id = ids.next_id();
        trace!("Comment {} by {}", comment_id, self.author);

        let reply = self.reply.map(|reply| Comment {
            id: ids.next_id(),
            author: reply.author,
            email: None,
            url: None,
            ip: None,
            date: reply.date,
            content: reply.content,
            approved: true,
            parent: CommentParent::Comment(comment_id),
        });

        CommentThread {
            comment: Comment {
                id: comment_id,
                author: self.author,
                email: Some(self.email),
                url: Some(self.url),
                ip: Some(self.ip),
                date: self.date,
                content: self.content,
                approved: true,
                parent: CommentParent::Post,
            },
            reply,
        }
    }
}

fn optional_text(row: ElementRef<'_>, sel: &Selector) -> String {
    dom::first(row, sel)
        .map(|el| dom::text(el).trim().to_string())
        .unwrap_or_default()
}
