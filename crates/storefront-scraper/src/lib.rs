pub mod classify;
pub mod error;
pub mod fallback;
pub mod fetch;
pub mod jsonld;
pub mod origin;
pub mod pagination;
mod rate_limit;
pub mod site;

mod category;

pub use classify::{extract_category_links, is_category_link, CategoryRule, LinkClassifier};
pub use error::{BuildError, FetchError, ScrapeError};
pub use fallback::{extract_fallback, CardPattern, FallbackExtractor};
pub use fetch::{HttpFetcher, PageFetcher};
pub use jsonld::extract_structured;
pub use origin::{is_same_origin, normalize_homepage_url};
pub use pagination::find_pagination;
pub use site::SiteScraper;
pub use storefront_core::{CategoryResult, ProductRecord, ScrapeConfig, SiteResult};
