//! WordPress eXtended RSS (WXR 1.2) writer
//!
//! Serializes a finished [`Channel`] into the document WordPress' importer
//! reads. Free-text values go into CDATA sections so HTML bodies pass through
//! untouched; ids and counters are plain text.
//!
//! ```
//! use panel2wxr::model::Channel;
//!
//! let channel = Channel::new("kaliuser", "https://domain.tld", "fa_IR");
//! let xml = String::from_utf8(panel2wxr::wxr::to_xml(&channel).unwrap()).unwrap();
//! assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
//! assert!(xml.contains("<wp:wxr_version>1.2</wp:wxr_version>"));
//! ```

use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::info;

use crate::calendar::{format_local, format_utc};
use crate::model::{Channel, Comment, Post, TermRegistry};
use crate::Result;

pub const WXR_VERSION: &str = "1.2";
pub const GENERATOR: &str = "https://wordpress.org/?v=5.2";

pub const NS_DC: &str = "http://purl.org/dc/elements/1.1/";
pub const NS_WP: &str = "http://wordpress.org/export/1.2/";
pub const NS_CONTENT: &str = "http://purl.org/rss/1.0/modules/content/";
pub const NS_EXCERPT: &str = "http://wordpress.org/export/1.2/excerpt/";

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
const CDATA_END: &str = "]]>";

/// Serialize the channel into an in-memory document
pub fn to_xml(channel: &Channel) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_document(channel, &mut out)?;
    Ok(out)
}

/// Write the document, declaration included, to `sink`
pub fn write_document<W: Write>(channel: &Channel, mut sink: W) -> Result<()> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    write_rss(&mut writer, channel)?;

    sink.write_all(XML_DECLARATION.as_bytes())?;
    sink.write_all(&writer.into_inner().into_inner())?;
    sink.write_all(b"\n")?;
    sink.flush()?;
    Ok(())
}

/// Write the document to a file, replacing it if present
pub fn write_file(channel: &Channel, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_document(channel, BufWriter::new(file))?;
    info!(
        "Wrote {} posts and {} comments to {}",
        channel.posts.len(),
        channel.comment_count(),
        path.display()
    );
    Ok(())
}

type XmlWriter = Writer<Cursor<Vec<u8>>>;

fn write_rss(w: &mut XmlWriter, channel: &Channel) -> Result<()> {
    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    rss.push_attribute(("xmlns:excerpt", NS_EXCERPT));
    rss.push_attribute(("xmlns:content", NS_CONTENT));
    rss.push_attribute(("xmlns:dc", NS_DC));
    rss.push_attribute(("xmlns:wp", NS_WP));
    w.write_event(Event::Start(rss))?;

    start(w, "channel")?;
    text(w, "title", &channel.title)?;
    text(w, "link", &channel.link)?;
    text(w, "language", &channel.language)?;
    text(w, "wp:wxr_version", WXR_VERSION)?;
    text(w, "wp:base_site_url", &channel.link)?;
    text(w, "wp:base_blog_url", &channel.link)?;
    text(w, "generator", GENERATOR)?;

    if !channel.registry.is_empty() {
        write_registry(w, &channel.registry)?;
    }
    for post in &channel.posts {
        write_item(w, post, &channel.link)?;
    }

    end(w, "channel")?;
    end(w, "rss")
}

fn write_registry(w: &mut XmlWriter, registry: &TermRegistry) -> Result<()> {
    for author in &registry.authors {
        start(w, "wp:author")?;
        text(w, "wp:author_id", &author.id.to_string())?;
        cdata(w, "wp:author_login", &author.login)?;
        cdata(w, "wp:author_email", &author.email)?;
        cdata(w, "wp:author_display_name", &author.display_name)?;
        end(w, "wp:author")?;
    }
    for category in &registry.categories {
        start(w, "wp:category")?;
        text(w, "wp:term_id", &category.term_id.to_string())?;
        cdata(w, "wp:category_nicename", &category.nicename)?;
        cdata(w, "wp:category_parent", &category.parent)?;
        cdata(w, "wp:cat_name", &category.name)?;
        end(w, "wp:category")?;
    }
    for tag in &registry.tags {
        start(w, "wp:tag")?;
        text(w, "wp:term_id", &tag.term_id.to_string())?;
        cdata(w, "wp:tag_slug", &tag.slug)?;
        cdata(w, "wp:tag_name", &tag.name)?;
        end(w, "wp:tag")?;
    }
    Ok(())
}

fn write_item(w: &mut XmlWriter, post: &Post, site: &str) -> Result<()> {
    start(w, "item")?;
    text(w, "title", &post.title)?;
    text(w, "link", &format!("{}/{}", site, post.slug))?;
    cdata(w, "dc:creator", &post.author)?;
    text(w, "description", "")?;
    text(w, "wp:post_id", &post.id)?;
    cdata(w, "wp:post_date", &format_local(&post.published))?;
    cdata(w, "wp:post_date_gmt", &format_utc(&post.published))?;
    cdata(w, "wp:comment_status", "open")?;
    cdata(w, "wp:ping_status", "closed")?;
    cdata(w, "wp:post_name", &post.slug)?;
    cdata(w, "wp:status", post.status.as_str())?;
    text(w, "wp:post_parent", "0")?;
    text(w, "wp:menu_order", "0")?;
    cdata(w, "wp:post_type", "post")?;
    cdata(w, "wp:post_password", "")?;
    text(w, "wp:is_sticky", "0")?;
    cdata(w, "content:encoded", &post.content)?;
    cdata(w, "excerpt:encoded", &post.excerpt)?;

    for meta in &post.meta {
        start(w, "wp:postmeta")?;
        cdata(w, "wp:meta_key", &meta.key)?;
        cdata(w, "wp:meta_value", &meta.value)?;
        end(w, "wp:postmeta")?;
    }
    for comment in &post.comments {
        write_comment(w, comment)?;
    }
    for tag in &post.tags {
        term(w, "post_tag", &tag.slug, &tag.name)?;
    }
    for category in &post.categories {
        term(w, "category", &category.nicename, &category.name)?;
    }

    end(w, "item")
}

fn write_comment(w: &mut XmlWriter, comment: &Comment) -> Result<()> {
    start(w, "wp:comment")?;
    text(w, "wp:comment_id", &comment.id.to_string())?;
    cdata(w, "wp:comment_author", &comment.author)?;
    if let Some(email) = &comment.email {
        cdata(w, "wp:comment_author_email", email)?;
    }
    if let Some(url) = &comment.url {
        cdata(w, "wp:comment_author_url", url)?;
    }
    if let Some(ip) = &comment.ip {
        cdata(w, "wp:comment_author_IP", ip)?;
    }
    cdata(w, "wp:comment_date", &format_local(&comment.date))?;
    cdata(w, "wp:comment_date_gmt", &format_utc(&comment.date))?;
    cdata(w, "wp:comment_content", &comment.content)?;
    text(w, "wp:comment_approved", if comment.approved { "1" } else { "0" })?;
    cdata(w, "wp:comment_type", "comment")?;
    text(w, "wp:comment_parent", &comment.parent.id().to_string())?;
    end(w, "wp:comment")
}

/// `<category domain=.. nicename=..>` attached to an item
fn term(w: &mut XmlWriter, domain: &str, nicename: &str, label: &str) -> Result<()> {
    let mut el = BytesStart::new("category");
    el.push_attribute(("domain", domain));
    el.push_attribute(("nicename", nicename));
    w.write_event(Event::Start(el))?;
    write_cdata(w, label)?;
    end(w, "category")
}

fn start(w: &mut XmlWriter, name: &str) -> Result<()> {
    w.write_event(Event::Start(BytesStart::new(name)))?;
    Ok(())
}

fn end(w: &mut XmlWriter, name: &str) -> Result<()> {
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Element with escaped text content
fn text(w: &mut XmlWriter, name: &str, value: &str) -> Result<()> {
    start(w, name)?;
    w.write_event(Event::Text(BytesText::new(value)))?;
    end(w, name)
}

/// Element with CDATA content
fn cdata(w: &mut XmlWriter, name: &str, value: &str) -> Result<()> {
    start(w, name)?;
    write_cdata(w, value)?;
    end(w, name)
}

fn write_cdata(w: &mut XmlWriter, value: &str) -> Result<()> {
    for section in cdata_sections(value) {
        w.write_event(Event::CData(BytesCData::new(section)))?;
    }
    Ok(())
}

/// Split `value` into CDATA section bodies, none containing `]]>`
///
/// Each `]]>` is cut between `]]` and `>`, so the sections concatenate back
/// to the original text.
///
/// ```
/// use panel2wxr::wxr::cdata_sections;
///
/// assert_eq!(cdata_sections("plain"), vec!["plain"]);
/// assert_eq!(cdata_sections("a]]>b"), vec!["a]]", ">b"]);
/// ```
pub fn cdata_sections(value: &str) -> Vec<String> {
    let pieces: Vec<&str> = value.split(CDATA_END).collect();
    let last = pieces.len() - 1;
    pieces
        .iter()
        .enumerate()
        .map(|(i, piece)| {
            let mut section = String::with_capacity(piece.len() + 3);
            if i > 0 {
                section.push('>');
            }
            section.push_str(piece);
            if i < last {
                section.push_str("]]");
            }
            section
        })
        .collect()
}
