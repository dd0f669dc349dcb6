//! Category tree page
//!
//! The panel renders categories as nested lists under `div#tree`:
//!
//! ```html
//! <div id="tree"><ul>
//!   <li catid="1"><a>News</a>
//!     <ul><li catid="2"><a>Local</a></li></ul>
//!   </li>
//! </ul></div>
//! ```

use std::collections::HashMap;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::dom;
use crate::model::Category;
use crate::{MigrateError, Result};

struct TreeSelectors {
    anchor: Selector,
    nested: Selector,
}

/// Parse the categories page into a table keyed by category id
pub fn parse_category_page(markup: &str) -> Result<HashMap<String, Category>> {
    let doc = Html::parse_document(markup);
    let tree = dom::selector("div#tree")?;
    let list = dom::selector("ul")?;

    let tree = dom::require(doc.root_element(), &tree, "div#tree")?;
    let root = dom::require(tree, &list, "category list under div#tree")?;

    let categories = extract_categories(root)?;
    debug!("Extracted {} categories", categories.len());
    Ok(categories)
}

/// Flatten a nested `<ul>` of categories
///
/// Every `<li catid=..>` at any depth becomes one entry. Entries directly
/// under `ul` have no parent; entries of a nested list point at the `<li>`
/// that contains it.
pub fn extract_categories(ul: ElementRef<'_>) -> Result<HashMap<String, Category>> {
    let selectors = TreeSelectors {
        anchor: dom::selector("a")?,
        nested: dom::selector("ul")?,
    };
    let mut categories = HashMap::new();
    walk(ul, None, &selectors, &mut categories)?;
    Ok(categories)
}

fn walk(
    ul: ElementRef<'_>,
    parent: Option<&str>,
    selectors: &TreeSelectors,
    out: &mut HashMap<String, Category>,
) -> Result<()> {
    for li in dom::child_elements(ul, "li") {
        let id = dom::require_attr(li, "catid", "category entry")?.to_string();
        let anchor = dom::first(li, &selectors.anchor)
            .ok_or_else(|| MigrateError::format(format!("Category {} has no link", id)))?;

        out.insert(
            id.clone(),
            Category {
                id: id.clone(),
                name: dom::stripped_text(anchor),
                parent: parent.map(str::to_string),
            },
        );

        if let Some(nested) = dom::first(li, &selectors.nested) {
            walk(nested, Some(id.as_str()), selectors, out)?;
        }
    }
    Ok(())
}
