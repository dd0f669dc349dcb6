use panel2wxr::calendar::{format_local, format_utc};
use panel2wxr::{CommentParent, Migration, PostStatus};

use super::fixtures::*;

#[test]
fn test_single_post_model() {
    let panel = single_post_panel();
    let channel = Migration::new(config(), &panel).unwrap().run().unwrap();

    assert_eq!(channel.title, "Kali's blog");
    assert_eq!(channel.link, "https://domain.tld");
    assert_eq!(channel.language, "fa_IR");
    assert!(channel.registry.is_empty());
    assert_eq!(channel.posts.len(), 1);

    let post = &channel.posts[0];
    assert_eq!(post.id, "31");
    assert_eq!(post.title, "Hello & welcome");
    assert_eq!(post.slug, "hello-world");
    assert_eq!(post.author, "alireza");
    assert_eq!(post.status, PostStatus::Publish);
    assert_eq!(format_local(&post.published), "2023-04-04 14:30:00");
    assert_eq!(format_utc(&post.published), "2023-04-04 11:00:00");
    assert_eq!(post.excerpt, "<p>Intro</p>");
    assert_eq!(post.content, "<p>Intro</p><p>Rest</p>");
    assert!(post.meta.is_empty());
}

#[test]
fn test_single_post_comments_threaded() {
    let panel = single_post_panel();
    let channel = Migration::new(config(), &panel).unwrap().run().unwrap();
    let comments = &channel.posts[0].comments;

    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].id, 1000);
    assert_eq!(comments[0].parent, CommentParent::Post);
    assert_eq!(comments[0].author, "مریم");
    assert_eq!(comments[0].content, "<p>Nice post</p>");
    assert_eq!(format_local(&comments[0].date), "2023-04-05 08:15:00");

    assert_eq!(comments[1].id, 1001);
    assert_eq!(comments[1].parent, CommentParent::Comment(1000));
    assert_eq!(comments[1].author, "kaliuser");
    assert_eq!(comments[1].content, "<p>Thank you</p>");
    assert!(comments[1].email.is_none());
}

#[test]
fn test_single_post_terms() {
    let panel = single_post_panel();
    let channel = Migration::new(config(), &panel).unwrap().run().unwrap();
    let post = &channel.posts[0];

    let tags: Vec<(&str, &str)> = post
        .tags
        .iter()
        .map(|t| (t.name.as_str(), t.slug.as_str()))
        .collect();
    assert_eq!(tags, vec![("Rust", "rust"), ("web dev", "web-dev")]);

    assert_eq!(post.categories.len(), 1);
    assert_eq!(post.categories[0].name, "Local News");
    assert_eq!(post.categories[0].nicename, "Local%20News");
}

#[test]
fn test_request_sequence() {
    let panel = single_post_panel();
    Migration::new(config(), &panel).unwrap().run().unwrap();

    assert_eq!(
        *panel.requests.borrow(),
        vec![
            categories_key(),
            posts_key(1, 100),
            post_key("31"),
            comments_key(1, 100, "31"),
        ]
    );
}

#[test]
fn test_comment_ids_continue_across_posts() {
    let panel = StoredPanel::default()
        .with(categories_key(), CATEGORIES)
        .with(posts_key(1, 100), listing(&["31", "30"]))
        .with(post_key("31"), edit_page("One", "one", "Ali", "", "A"))
        .with(post_key("30"), edit_page("Two", "two", "Ali", "", "C"))
        .with(
            comments_key(1, 100, "31"),
            comments_page(&[ANSWERED_ROW, UNANSWERED_ROW]),
        )
        .with(comments_key(1, 100, "30"), comments_page(&[ANSWERED_ROW]));

    let channel = Migration::new(config(), &panel).unwrap().run().unwrap();
    let ids: Vec<u64> = channel
        .posts
        .iter()
        .flat_map(|p| p.comments.iter().map(|c| c.id))
        .collect();
    assert_eq!(ids, vec![1000, 1001, 1002, 1003, 1004]);
    assert_eq!(channel.posts[1].comments[1].parent, CommentParent::Comment(1003));
    assert_eq!(channel.comment_count(), 5);

    // Empty tag inputs produce no tags
    assert!(channel.posts[0].tags.is_empty());
}

#[test]
fn test_separate_runs_restart_ids() {
    let first = Migration::new(config(), &single_post_panel()).unwrap().run().unwrap();
    let second = Migration::new(config(), &single_post_panel()).unwrap().run().unwrap();
    assert_eq!(first.posts[0].comments[0].id, 1000);
    assert_eq!(second.posts[0].comments[0].id, 1000);
}

#[test]
fn test_unlabelled_author_uses_configured_default() {
    let panel = StoredPanel::default()
        .with(categories_key(), CATEGORIES)
        .with(posts_key(1, 100), listing(&["31"]))
        .with(post_key("31"), edit_page("One", "one", "...", "", ""))
        .with(comments_key(1, 100, "31"), comments_page(&[]));

    let config = config().with_default_author("editor");
    let channel = Migration::new(config, &panel).unwrap().run().unwrap();
    assert_eq!(channel.posts[0].author, "editor");
    assert!(channel.posts[0].categories.is_empty());
}
