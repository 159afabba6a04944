use super::*;

#[test]
fn parses_scrape_command_with_defaults() {
    let cli = Cli::try_parse_from(["storefront-cli", "scrape", "shop.example.com"])
        .expect("expected valid cli args");

    match cli.command {
        Commands::Scrape {
            url,
            overrides,
            max_categories,
            site_timeout,
        } => {
            assert_eq!(url, "shop.example.com");
            assert_eq!(overrides, ScrapeOverrides::default());
            assert!(max_categories.is_none());
            assert!(site_timeout.is_none());
        }
        Commands::Category { .. } => panic!("expected scrape command"),
    }
}

#[test]
fn parses_scrape_command_with_overrides() {
    let cli = Cli::try_parse_from([
        "storefront-cli",
        "scrape",
        "https://shop.example.com",
        "--max-categories",
        "5",
        "--max-pages",
        "2",
        "--concurrency",
        "3",
        "--no-render-js",
        "--pretty",
    ])
    .expect("expected valid cli args");

    let Commands::Scrape {
        overrides,
        max_categories,
        ..
    } = cli.command
    else {
        panic!("expected scrape command");
    };
    assert_eq!(max_categories, Some(5));
    assert_eq!(overrides.max_pages, Some(2));
    assert_eq!(overrides.concurrency, Some(3));
    assert!(overrides.no_render_js);
    assert!(overrides.pretty);
}

#[test]
fn parses_category_command() {
    let cli = Cli::try_parse_from([
        "storefront-cli",
        "category",
        "https://shop.example.com/collections/men",
        "--timeout",
        "10",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Category {
            overrides: ScrapeOverrides {
                timeout: Some(10),
                ..
            },
            ..
        }
    ));
}

#[test]
fn missing_command_is_rejected() {
    assert!(Cli::try_parse_from(["storefront-cli"]).is_err());
}

#[test]
fn overrides_apply_to_config() {
    let mut config = storefront_core::ScrapeConfig::default();
    let overrides = ScrapeOverrides {
        max_pages: Some(3),
        concurrency: Some(0),
        timeout: Some(15),
        no_render_js: true,
        pretty: false,
    };

    overrides.apply(&mut config);

    assert_eq!(config.max_pages_per_category, 3);
    assert_eq!(config.concurrent_requests, 1);
    assert_eq!(config.fetch_timeout_secs, 15);
    assert!(!config.render_js);
}

#[test]
fn empty_overrides_leave_config_unchanged() {
    let mut config = storefront_core::ScrapeConfig::default();
    ScrapeOverrides::default().apply(&mut config);
    assert_eq!(config, storefront_core::ScrapeConfig::default());
}

#[test]
fn oversized_concurrency_is_clamped() {
    let mut config = storefront_core::ScrapeConfig::default();
    let overrides = ScrapeOverrides {
        concurrency: Some(usize::MAX),
        ..ScrapeOverrides::default()
    };

    overrides.apply(&mut config);

    assert_eq!(
        config.concurrent_requests,
        storefront_core::MAX_CONCURRENT_REQUESTS
    );
}

#[test]
fn zero_category_cap_is_raised_to_one() {
    let mut config = storefront_core::ScrapeConfig::default();

    apply_site_flags(&mut config, Some(0), Some(30));

    assert_eq!(config.max_category_links, 1);
    assert_eq!(config.site_timeout_secs, Some(30));
}

#[test]
fn absent_site_flags_keep_config() {
    let mut config = storefront_core::ScrapeConfig {
        site_timeout_secs: Some(90),
        ..storefront_core::ScrapeConfig::default()
    };

    apply_site_flags(&mut config, None, None);

    assert_eq!(config.max_category_links, 25);
    assert_eq!(config.site_timeout_secs, Some(90));
}
