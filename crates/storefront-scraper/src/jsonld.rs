//! schema.org `Product` extraction from JSON-LD blocks.
//!
//! When a page carries Product JSON-LD it is authoritative for that page and
//! the CSS fallback is not consulted.

use std::collections::VecDeque;
use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use serde_json::Value;
use storefront_core::ProductRecord;

static LD_JSON_SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]+type\s*=\s*["']?application/ld\+json["']?[^>]*>(.*?)</script>"#)
        .expect("valid regex")
});

/// Extract products from every `<script type="application/ld+json">` block.
///
/// Each block may hold a single object, an array, or an object wrapping an
/// array under `@graph` (recursively). Blocks that fail to parse are skipped.
/// No deduplication is done here.
#[must_use]
pub fn extract_structured(markup: &str, base_url: &Url) -> Vec<ProductRecord> {
    let mut products = Vec::new();

    for cap in LD_JSON_SCRIPT_RE.captures_iter(markup) {
        let Some(json_text) = cap.get(1).map(|m| m.as_str().trim()) else {
            continue;
        };
        if json_text.is_empty() {
            continue;
        }

        let value: Value = match serde_json::from_str(json_text) {
            Ok(v) => v,
            Err(err) => {
                tracing::debug!(
                    page = %base_url,
                    error = %err,
                    "skipping malformed JSON-LD block"
                );
                continue;
            }
        };

        for candidate in flatten_candidates(value) {
            if let Some(product) = candidate_to_product(&candidate, base_url) {
                products.push(product);
            }
        }
    }

    products
}

/// Flattens a JSON-LD payload into candidate objects using an explicit queue.
///
/// Arrays contribute their elements; an object carrying an `@graph` array
/// contributes the graph members instead of itself. Order follows the
/// payload, with graph members appended after the items already queued.
fn flatten_candidates(root: Value) -> Vec<Value> {
    let mut queue = VecDeque::from([root]);
    let mut candidates = Vec::new();

    while let Some(item) = queue.pop_front() {
        match item {
            Value::Array(items) => queue.extend(items),
            Value::Object(mut map) => {
                if let Some(Value::Array(graph)) = map.remove("@graph") {
                    queue.extend(graph);
                } else {
                    candidates.push(Value::Object(map));
                }
            }
            _ => {}
        }
    }

    candidates
}

/// Convert one JSON-LD object to a [`ProductRecord`] if it is a `Product`
/// with a non-empty name and a resolvable URL.
fn candidate_to_product(item: &Value, base_url: &Url) -> Option<ProductRecord> {
    if !declares_product_type(item.get("@type")?) {
        return None;
    }

    let name = item.get("name")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }

    let href = item.get("url")?.as_str()?.trim();
    if href.is_empty() {
        return None;
    }
    let url = base_url.join(href).ok()?;

    let price = item.get("offers").and_then(offer_price);

    Some(ProductRecord {
        name: name.to_owned(),
        url: url.to_string(),
        price,
    })
}

/// `@type` may be a plain string or an array of strings.
fn declares_product_type(type_node: &Value) -> bool {
    let is_product = |s: &str| s.trim().eq_ignore_ascii_case("Product");
    match type_node {
        Value::String(s) => is_product(s),
        Value::Array(types) => types.iter().filter_map(Value::as_str).any(is_product),
        _ => false,
    }
}

/// First price found across `offers`, which may be one offer or a list.
/// Within an offer `price` wins over `priceSpecification.price`.
fn offer_price(offers: &Value) -> Option<String> {
    match offers {
        Value::Array(list) => list.iter().find_map(single_offer_price),
        Value::Object(_) => single_offer_price(offers),
        _ => None,
    }
}

fn single_offer_price(offer: &Value) -> Option<String> {
    offer
        .get("price")
        .and_then(price_text)
        .or_else(|| {
            let detail = offer.get("priceSpecification")?;
            match detail {
                Value::Array(specs) => specs
                    .iter()
                    .find_map(|s| s.get("price").and_then(price_text)),
                _ => detail.get("price").and_then(price_text),
            }
        })
}

/// Prices appear as strings (`"19.99"`) or numbers (`19.99`) in the wild.
fn price_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "jsonld_test.rs"]
mod tests;
