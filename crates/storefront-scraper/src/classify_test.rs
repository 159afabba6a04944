use super::*;

fn homepage() -> Url {
    Url::parse("https://example.com").unwrap()
}

#[test]
fn text_keyword_matches_case_insensitively() {
    assert!(is_category_link("  SHOP ALL  ", "/all"));
    assert!(is_category_link("Women's Outlet", "/deals"));
    assert!(is_category_link("Browse Catalog", "/x"));
}

#[test]
fn href_hint_matches_when_text_does_not() {
    assert!(is_category_link("Tops", "/collections/tops"));
    assert!(is_category_link("Widgets", "/product-category/widgets/"));
    assert!(is_category_link("", "https://example.com/Catalog/Outdoor"));
}

#[test]
fn taxonomy_segment_matches_only_whole_segments() {
    assert!(is_category_link("", "/women/"));
    assert!(is_category_link("", "/en/kids"));
    assert!(is_category_link("", "/sale"));
    assert!(!is_category_link("", "/newsletter"));
    assert!(!is_category_link("", "/salesforce-login"));
}

#[test]
fn unrelated_links_are_rejected() {
    assert!(!is_category_link("About", "/about"));
    assert!(!is_category_link("Contact us", "/pages/contact"));
    assert!(!is_category_link("", ""));
}

#[test]
fn classification_is_deterministic() {
    let pairs = [
        ("Shop Men", "/men"),
        ("About", "/about"),
        ("Gift Cards", "/gift"),
        ("", "/collections"),
    ];
    for (text, href) in pairs {
        let first = is_category_link(text, href);
        for _ in 0..5 {
            assert_eq!(is_category_link(text, href), first, "{text:?} {href:?}");
        }
    }
}

#[test]
fn first_matching_rule_is_reported() {
    let classifier = LinkClassifier::default();
    let rule = classifier.matching_rule("Sale", "/collections/sale").unwrap();
    assert!(matches!(rule, CategoryRule::TextKeyword(k) if k == "sale"));

    let rule = classifier.matching_rule("Tops", "/collections/tops").unwrap();
    assert!(matches!(rule, CategoryRule::HrefHint(h) if h == "/collections"));

    let rule = classifier.matching_rule("", "/kids/").unwrap();
    assert!(matches!(rule, CategoryRule::HrefPattern(_)));
}

#[test]
fn config_keywords_replace_defaults() {
    let config = ScrapeConfig {
        category_text_keywords: vec!["boutique".to_string()],
        category_href_hints: vec!["/rayon".to_string()],
        ..ScrapeConfig::default()
    };
    let classifier = LinkClassifier::from_config(&config);
    assert!(classifier.is_category_link("La Boutique", "/x"));
    assert!(classifier.is_category_link("", "/rayon/chaussures"));
    assert!(!classifier.is_category_link("Shop", "/x"));
    assert!(classifier.is_category_link("", "/sale"));
}

#[test]
fn extra_rows_extend_the_table() {
    let classifier = LinkClassifier::default()
        .with_href_pattern(r"^/c/\d+")
        .unwrap();
    assert!(classifier.is_category_link("Garden", "/c/1234"));
    assert!(!LinkClassifier::default().is_category_link("Garden", "/c/1234"));
}

#[test]
fn invalid_pattern_is_reported() {
    let result = LinkClassifier::default().with_href_pattern("(unclosed");
    assert!(matches!(result, Err(BuildError::InvalidPattern { .. })));
}

#[test]
fn extracts_end_to_end_example() {
    let html = r#"<nav><a href="/men">Shop Men</a><a href="/about">About</a></nav>"#;
    let links = extract_category_links(html, &homepage(), &LinkClassifier::default(), 25);
    assert_eq!(links, vec!["https://example.com/men".to_string()]);
}

#[test]
fn cross_origin_links_are_dropped_even_when_keywords_match() {
    let html = r#"
        <a href="https://partner.com/shop">Shop our partner</a>
        <a href="http://example.com/sale">Sale (insecure)</a>
        <a href="/collections/new">New In</a>
    "#;
    let links = extract_category_links(html, &homepage(), &LinkClassifier::default(), 25);
    assert_eq!(links, vec!["https://example.com/collections/new".to_string()]);
}

#[test]
fn duplicates_keep_first_position_and_fragments_are_dropped() {
    let html = r##"
        <a href="/sale">Sale</a>
        <a href="/men#top">Men</a>
        <a href="/sale">Sale again</a>
        <a href="#menu">Shop</a>
        <a href="mailto:shop@example.com">Shop by email</a>
    "##;
    let links = extract_category_links(html, &homepage(), &LinkClassifier::default(), 25);
    assert_eq!(
        links,
        vec![
            "https://example.com/sale".to_string(),
            "https://example.com/men".to_string(),
        ]
    );
}

#[test]
fn cap_keeps_document_order() {
    use std::fmt::Write as _;

    let mut html = String::new();
    for i in 0..40 {
        let _ = write!(html, r#"<a href="/collections/c{i}">Category {i}</a>"#);
    }
    let links = extract_category_links(&html, &homepage(), &LinkClassifier::default(), 25);
    assert_eq!(links.len(), 25);
    for (i, link) in links.iter().enumerate() {
        assert_eq!(link, &format!("https://example.com/collections/c{i}"));
    }
}

#[test]
fn visible_text_collapses_nested_nodes() {
    let html = r#"<a href="/x"><span> Shop </span>
        <strong>Women</strong></a>"#;
    let document = Html::parse_fragment(html);
    let anchor = document.select(&ANCHOR_SELECTOR).next().unwrap();
    assert_eq!(visible_text(anchor), "Shop Women");
}

#[test]
fn links_on_another_port_are_dropped() {
    let home = Url::parse("https://shop.test").unwrap();
    let html = r#"
        <a href="https://shop.test:8443/collections/x">Collection X</a>
        <a href="https://shop.test:443/collections/z">Collection Z</a>
        <a href="/collections/y">Collection Y</a>
    "#;
    let links = extract_category_links(html, &home, &LinkClassifier::default(), 25);
    assert_eq!(
        links,
        vec![
            "https://shop.test/collections/z".to_string(),
            "https://shop.test/collections/y".to_string(),
        ]
    );
}
