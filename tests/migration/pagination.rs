use panel2wxr::Migration;

use super::fixtures::*;

fn three_post_panel() -> StoredPanel {
    StoredPanel::default()
        .with(categories_key(), CATEGORIES)
        .with(post_key("3"), edit_page("Three", "three", "Ali", "", ""))
        .with(post_key("2"), edit_page("Two", "two", "Ali", "", ""))
        .with(post_key("1"), edit_page("One", "one", "Ali", "", ""))
        .with(comments_key(1, 2, "3"), comments_page(&[]))
        .with(comments_key(1, 2, "2"), comments_page(&[]))
        .with(comments_key(1, 2, "1"), comments_page(&[]))
}

#[test]
fn test_listing_follows_pages() {
    let panel = three_post_panel()
        .with(posts_key(1, 2), listing(&["3", "2"]))
        .with(posts_key(2, 2), listing(&["1"]));

    let channel = Migration::new(config().with_page_size(2), &panel)
        .unwrap()
        .run()
        .unwrap();
    let ids: Vec<&str> = channel.posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["3", "2", "1"]);
}

#[test]
fn test_listing_full_page_then_empty() {
    let panel = three_post_panel()
        .with(posts_key(1, 2), listing(&["3", "2"]))
        .with(posts_key(2, 2), listing(&[]));

    let channel = Migration::new(config().with_page_size(2), &panel)
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(channel.posts.len(), 2);
}

#[test]
fn test_listing_ignoring_page_parameter_terminates() {
    let panel = three_post_panel()
        .with(posts_key(1, 2), listing(&["3", "2"]))
        .with(posts_key(2, 2), listing(&["3", "2"]));

    let channel = Migration::new(config().with_page_size(2), &panel)
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(channel.posts.len(), 2);
    assert!(!panel.requests.borrow().contains(&posts_key(3, 2)));
}

#[test]
fn test_comments_follow_pages() {
    let panel = three_post_panel()
        .with(posts_key(1, 2), listing(&["3"]))
        .with(
            comments_key(1, 2, "3"),
            comments_page(&[ANSWERED_ROW, UNANSWERED_ROW]),
        )
        .with(comments_key(2, 2, "3"), comments_page(&[UNANSWERED_ROW]));

    let channel = Migration::new(config().with_page_size(2), &panel)
        .unwrap()
        .run()
        .unwrap();
    let ids: Vec<u64> = channel.posts[0].comments.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1000, 1001, 1002, 1003]);
}

#[test]
fn test_comment_page_ignoring_page_parameter_terminates() {
    let same = comments_page(&[UNANSWERED_ROW, UNANSWERED_ROW]);
    let panel = three_post_panel()
        .with(posts_key(1, 2), listing(&["3"]))
        .with(comments_key(1, 2, "3"), same.clone())
        .with(comments_key(2, 2, "3"), same);

    let channel = Migration::new(config().with_page_size(2), &panel)
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(channel.posts[0].comments.len(), 2);
    assert!(!panel.requests.borrow().contains(&comments_key(3, 2, "3")));
}

#[test]
fn test_comment_page_repeated_with_fresh_form_token() {
    let page = |token: &str| {
        format!(
            r#"<html><body><form><input type="hidden" name="csrf" value="{}"></form>{}{}</body></html>"#,
            token, ANSWERED_ROW, UNANSWERED_ROW
        )
    };
    let panel = three_post_panel()
        .with(posts_key(1, 2), listing(&["3"]))
        .with(comments_key(1, 2, "3"), page("a1f3"))
        .with(comments_key(2, 2, "3"), page("9c07"))
        .with(comments_key(3, 2, "3"), page("e52b"));

    let channel = Migration::new(config().with_page_size(2), &panel)
        .unwrap()
        .run()
        .unwrap();
    let ids: Vec<u64> = channel.posts[0].comments.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1000, 1001, 1002]);
    assert!(!panel.requests.borrow().contains(&comments_key(3, 2, "3")));
}
