use super::*;

fn base() -> Url {
    Url::parse("https://example.com/collections/all").unwrap()
}

#[test]
fn extracts_generic_product_cards() {
    let html = r#"
        <div class="product-card">
            <a href="/products/tee"><img src="tee.jpg"></a>
            <h3 class="product-title">Basic Tee</h3>
            <span class="price">$19.99</span>
        </div>
        <div class="product-card">
            <a href="/products/hoodie">Hoodie</a>
            <span class="price">Sale price $49.00 Regular price $59.00</span>
        </div>
    "#;
    let products = extract_fallback(html, &base());
    assert_eq!(
        products,
        vec![
            ProductRecord {
                name: "Basic Tee".to_string(),
                url: "https://example.com/products/tee".to_string(),
                price: Some("$19.99".to_string()),
            },
            ProductRecord {
                name: "Hoodie".to_string(),
                url: "https://example.com/products/hoodie".to_string(),
                price: Some("$49.00".to_string()),
            },
        ]
    );
}

#[test]
fn extracts_woocommerce_listing() {
    let html = r#"
        <ul class="products columns-4">
            <li class="type-simple">
                <a href="https://example.com/product/mug/" class="woocommerce-LoopProduct-link">
                    <h2 class="woocommerce-loop-product__title">Coffee Mug</h2>
                    <span class="price"><span class="woocommerce-Price-amount amount">12,50&nbsp;EUR</span></span>
                </a>
            </li>
        </ul>
        <ul class="products"><li class="product"><a href="/product/cap/"><h2>Cap</h2></a></li></ul>
    "#;
    let products = extract_fallback(html, &base());
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Cap");
    assert_eq!(products[0].url, "https://example.com/product/cap/");
    assert!(products[0].price.is_none());
}

#[test]
fn extracts_shopify_grid_items() {
    let html = r#"
        <ul class="product-grid">
            <li class="grid__item">
                <a class="full-unstyled-link" href="/collections/all/products/socks">Wool Socks</a>
                <div class="price__regular"><span class="price-item">Rs. 1,299 PKR</span></div>
            </li>
        </ul>
    "#;
    let products = extract_fallback(html, &base());
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Wool Socks");
    assert_eq!(products[0].price.as_deref(), Some("1,299 PKR"));
}

#[test]
fn product_path_link_beats_earlier_generic_link() {
    let html = r#"
        <div class="product-item">
            <a href="/wishlist/add?id=7">Add to wishlist</a>
            <a href="/item/7">Lamp</a>
        </div>
    "#;
    let products = extract_fallback(html, &base());
    assert_eq!(products[0].url, "https://example.com/item/7");
    assert_eq!(products[0].name, "Lamp");
}

#[test]
fn falls_back_to_any_link_when_no_product_path() {
    let html = r#"<div class="product-tile"><a href="/lamp-7">Desk Lamp</a></div>"#;
    let products = extract_fallback(html, &base());
    assert_eq!(products[0].url, "https://example.com/lamp-7");
    assert_eq!(products[0].name, "Desk Lamp");
}

#[test]
fn name_priority_prefers_itemprop_over_heading() {
    let html = r#"
        <div class="product">
            <h2>Featured!</h2>
            <a href="/products/kettle"><span itemprop="name">Steel Kettle</span></a>
        </div>
    "#;
    let products = extract_fallback(html, &base());
    assert_eq!(products[0].name, "Steel Kettle");
}

#[test]
fn price_without_currency_is_kept_raw() {
    let html = r#"
        <div class="product-card"><a href="/products/a">A</a><span class="product-price">Call for price</span></div>
        <div class="product-card"><a href="/products/b">B</a><span class="amount">  </span></div>
    "#;
    let products = extract_fallback(html, &base());
    assert_eq!(products[0].price.as_deref(), Some("Call for price"));
    assert!(products[1].price.is_none());
}

#[test]
fn itemprop_price_content_attribute_is_used_when_text_is_empty() {
    let html = r#"
        <div class="product-card">
            <a href="/products/a">A</a>
            <meta itemprop="price" content="24.00">
        </div>
    "#;
    let products = extract_fallback(html, &base());
    assert_eq!(products[0].price.as_deref(), Some("24.00"));
}

#[test]
fn cards_without_links_or_names_are_skipped() {
    let html = r##"
        <div class="product-card"><h3>No link here</h3></div>
        <div class="product-card"><a href="/products/x"><img src="x.jpg"></a></div>
        <div class="product-card"><a href="#">Anchor only</a></div>
    "##;
    assert!(extract_fallback(html, &base()).is_empty());
}

#[test]
fn duplicate_urls_keep_the_first_card() {
    let html = r#"
        <div class="product-card"><a href="/products/tee">Tee</a><span class="price">$10</span></div>
        <div class="product-card"><a href="/products/tee">Tee (again)</a><span class="price">$12</span></div>
    "#;
    let products = extract_fallback(html, &base());
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Tee");
    assert_eq!(products[0].price.as_deref(), Some("$10"));
}

#[test]
fn nested_matches_are_collapsed_by_url() {
    let html = r#"
        <div class="product-item-info">
            <div class="product-card"><a href="/products/bag">Bag</a></div>
        </div>
    "#;
    let products = extract_fallback(html, &base());
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].url, "https://example.com/products/bag");
}

#[test]
fn custom_card_pattern_extends_the_table() {
    let html = r#"<article class="tile-x"><a href="/p/9">Nine</a></article>"#;
    assert!(extract_fallback(html, &base()).is_empty());

    let extractor = FallbackExtractor::default()
        .with_card_pattern("custom", "article.tile-x")
        .unwrap();
    let products = extractor.extract(html, &base());
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Nine");
    assert_eq!(
        extractor.card_patterns().last().map(|p| p.platform.as_str()),
        Some("custom")
    );
}

#[test]
fn invalid_selector_is_reported() {
    let result = FallbackExtractor::default().with_card_pattern("broken", "div[");
    assert!(matches!(result, Err(BuildError::InvalidSelector { .. })));
}

#[test]
fn price_pattern_handles_symbols_and_codes() {
    assert_eq!(match_price("Now €1.299,00").as_deref(), Some("€1.299,00"));
    assert_eq!(match_price("From £5").as_deref(), Some("£5"));
    assert_eq!(match_price("AED 250").as_deref(), Some("AED 250"));
    assert_eq!(match_price("49,90 EUR incl. VAT").as_deref(), Some("49,90 EUR"));
    assert_eq!(match_price("usd 12.00").as_deref(), Some("usd 12.00"));
    assert!(match_price("Sold out").is_none());
}
