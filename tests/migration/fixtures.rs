//! Stored panel pages and an in-memory fetcher serving them

use std::cell::RefCell;
use std::collections::HashMap;

use panel2wxr::{MigrateError, MigrationConfig, PageFetcher, Result};

pub const BLOG: &str = "kaliuser";
pub const PANEL: &str = "https://blog.ir/panel/kaliuser";

/// Serves pages keyed by `url?k=v&k=v`; unknown keys are transport errors
#[derive(Default)]
pub struct StoredPanel {
    pages: HashMap<String, String>,
    pub requests: RefCell<Vec<String>>,
}

impl StoredPanel {
    pub fn with(mut self, key: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(key.into(), body.into());
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl PageFetcher for StoredPanel {
    fn fetch(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        let mut key = url.to_string();
        if !query.is_empty() {
            let pairs: Vec<String> = query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            key.push('?');
            key.push_str(&pairs.join("&"));
        }
        self.requests.borrow_mut().push(key.clone());
        self.pages
            .get(&key)
            .cloned()
            .ok_or_else(|| MigrateError::Transport(format!("no stored page for {}", key)))
    }
}

pub fn config() -> MigrationConfig {
    MigrationConfig::new(BLOG, "https://domain.tld").with_site_title("Kali's blog")
}

pub fn categories_key() -> String {
    format!("{}/categories", PANEL)
}

pub fn posts_key(page: usize, size: usize) -> String {
    format!("{}/posts?page={}({})", PANEL, page, size)
}

pub fn post_key(id: &str) -> String {
    format!("{}/post/edit/{}", PANEL, id)
}

pub fn comments_key(page: usize, size: usize, post: &str) -> String {
    format!("{}/comments?page={}({})&for_post={}", PANEL, page, size, post)
}

pub const CATEGORIES: &str = r##"<html><body>
<div class="sidebar"><ul><li>menu</li></ul></div>
<div id="tree">
  <ul>
    <li catid="A"><a href="#">اخبار</a>
      <ul>
        <li catid="B"><a href="#">Local News</a></li>
      </ul>
    </li>
    <li catid="C"><a href="#">Tech</a></li>
  </ul>
</div>
</body></html>"##;

pub fn listing(ids: &[&str]) -> String {
    let rows: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<tr><td>post {id}</td><td><a title="ویرایش" href="/panel/kaliuser/post/edit/{id}">edit</a></td></tr>"#
            )
        })
        .collect();
    format!("<html><body><table>{}</table></body></html>", rows)
}

pub fn edit_page(title: &str, slug: &str, author: &str, tags: &str, categories: &str) -> String {
    format!(
        r#"<html><body><form>
<input type="text" id="txtPostTitle" value="{title}">
<input type="text" id="txtUrl" value="{slug}">
<span class="postUser">{author}</span>
<input type="hidden" name="publish_date" value="1402/01/15">
<input type="hidden" name="publish_date_time" value="14:30">
<input type="text" id="tags" value="{tags}">
<input type="hidden" id="icategories" value="{categories}">
<textarea id="txt0">&lt;p&gt;Intro&lt;/p&gt;&lt;input type="button" id="read_more" style="display:none;" alt="ادامه مطلب"&gt;&lt;p&gt;Rest&lt;/p&gt;</textarea>
</form></body></html>"#
    )
}

pub const ANSWERED_ROW: &str = r#"<div class="commentRow">
  <div class="logHeadData">مریم <span class="logDate">۱۶ فروردین ۰۲، ۰۸:۱۵</span> در مطلب <a href="/post/hello">Hello</a></div>
  <a class="email">maryam@example.com</a>
  <a class="website" href="https://maryam.example/">site</a>
  <a class="ip">192.0.2.7</a>
  <div class="fullComment"><p>Nice post</p></div>
  <div class="replyInfo">پاسخ توسط kaliuser در ۱۶ فروردین ۰۲، ۱۰:۰۰</div>
  <div class="replyText"><p>Thank you</p></div>
</div>"#;

pub const UNANSWERED_ROW: &str = r#"<div class="commentRow">
  <div class="logHeadData">Reza <span class="logDate">۱۷ فروردین ۰۲، ۲۲:۴۰</span> در مطلب <a href="/post/hello">Hello</a></div>
  <a class="email"></a>
  <a class="ip">198.51.100.4</a>
  <div class="fullComment">First!</div>
  <div class="emptyReply"></div>
  <div class="replyText"><p>stale text</p></div>
</div>"#;

pub fn comments_page(rows: &[&str]) -> String {
    format!("<html><body>{}</body></html>", rows.concat())
}

/// The single-post panel: one post with an answered comment, two tags and
/// one category
pub fn single_post_panel() -> StoredPanel {
    StoredPanel::default()
        .with(categories_key(), CATEGORIES)
        .with(posts_key(1, 100), listing(&["31"]))
        .with(
            post_key("31"),
            edit_page("Hello &amp; welcome", "hello-world", "Ali Reza", "Rust, web dev", "B"),
        )
        .with(comments_key(1, 100, "31"), comments_page(&[ANSWERED_ROW]))
}
