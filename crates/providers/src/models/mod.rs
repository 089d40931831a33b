//! Output models
//!
//! - `view` - Normalized provider availability (ProviderView, RegionProviders, RegionResolution)
//! - `content` - Content summaries (MediaType, Content, MovieSummary)
//! - `responses` - Payloads assembled by the lookup service

mod content;
mod responses;
mod view;

pub use content::{Content, MediaType, MovieSummary};
pub use responses::{DetailResponse, HomeResponse, MovieProvidersResponse, SearchResponse, TrendingResponse};
pub use view::{PaidProviders, ProviderView, RegionProviders, RegionResolution};
