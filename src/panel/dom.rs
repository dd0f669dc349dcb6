//! Lookup helpers over parsed panel markup

use scraper::{ElementRef, Selector};

use crate::{MigrateError, Result};

/// Compile a CSS selector
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| MigrateError::format(format!("Invalid selector {}: {:?}", css, e)))
}

/// First descendant of `scope` matching `sel`
pub fn first<'a>(scope: ElementRef<'a>, sel: &Selector) -> Option<ElementRef<'a>> {
    scope.select(sel).next()
}

/// First match, or a format error naming what was expected
pub fn require<'a>(scope: ElementRef<'a>, sel: &Selector, what: &str) -> Result<ElementRef<'a>> {
    first(scope, sel).ok_or_else(|| MigrateError::format(format!("Missing {}", what)))
}

/// Attribute value of an element, or a format error
pub fn require_attr<'a>(el: ElementRef<'a>, attr: &str, what: &str) -> Result<&'a str> {
    el.value()
        .attr(attr)
        .ok_or_else(|| MigrateError::format(format!("Missing {} attribute on {}", attr, what)))
}

/// `value` attribute of the first matching input
pub fn input_value(scope: ElementRef<'_>, sel: &Selector, what: &str) -> Result<String> {
    let input = require(scope, sel, what)?;
    require_attr(input, "value", what).map(str::to_string)
}

/// All text below the element, concatenated
pub fn text(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// Text pieces trimmed individually and joined without separator
pub fn stripped_text(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).filter(|s| !s.is_empty()).collect()
}

/// Direct element children with the given tag name
pub fn child_elements<'a>(el: ElementRef<'a>, name: &'a str) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    el.children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| child.value().name() == name)
}
