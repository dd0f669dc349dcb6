use panel2wxr::{MigrateError, Migration};

use super::fixtures::*;

#[test]
fn test_unknown_category_aborts() {
    let panel = StoredPanel::default()
        .with(categories_key(), CATEGORIES)
        .with(posts_key(1, 100), listing(&["31"]))
        .with(post_key("31"), edit_page("One", "one", "Ali", "", "A,Z"));

    let err = Migration::new(config(), &panel).unwrap().run().unwrap_err();
    assert!(matches!(err, MigrateError::Lookup(ref id) if id == "Z"));
}

#[test]
fn test_bad_comment_date_aborts() {
    let row = r#"<div class="commentRow">
        <div class="logHeadData">x <span class="logDate">yesterday</span> در مطلب y</div>
        <div class="emptyReply"></div>
    </div>"#;
    let panel = StoredPanel::default()
        .with(categories_key(), CATEGORIES)
        .with(posts_key(1, 100), listing(&["31"]))
        .with(post_key("31"), edit_page("One", "one", "Ali", "", ""))
        .with(comments_key(1, 100, "31"), comments_page(&[row]));

    let err = Migration::new(config(), &panel).unwrap().run().unwrap_err();
    assert!(matches!(err, MigrateError::Format(_)));
}

#[test]
fn test_missing_category_tree_aborts_before_listing() {
    let panel = StoredPanel::default().with(categories_key(), "<html><body>login</body></html>");

    let err = Migration::new(config(), &panel).unwrap().run().unwrap_err();
    assert!(matches!(err, MigrateError::Format(_)));
    assert_eq!(panel.request_count(), 1);
}

#[test]
fn test_transport_error_propagates() {
    let panel = StoredPanel::default()
        .with(categories_key(), CATEGORIES)
        .with(posts_key(1, 100), listing(&["31"]));

    let err = Migration::new(config(), &panel).unwrap().run().unwrap_err();
    assert!(err.is_transport());
}

#[test]
fn test_invalid_config_rejected() {
    let panel = StoredPanel::default();
    let err = Migration::new(config().with_utc_offset_minutes(-5000), &panel).err();
    assert!(matches!(err, Some(MigrateError::Config(_))));
    assert_eq!(panel.request_count(), 0);
}
