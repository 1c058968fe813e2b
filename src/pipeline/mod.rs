//! Page-level read and write models.
//!
//! - `load_listing`: listing page (recent prices + filter options)
//! - `load_product`: product detail page (prices + catalog info)
//! - `SubmissionFlow` / `load_form_options`: add-price page

pub mod listing;
pub mod product;
pub mod submit;

pub use listing::{load_listing, merge_bairros, ListingPage};
pub use product::{load_product, summarize, PriceSummary, ProductPage};
pub use submit::{load_form_options, FormOptions, SubmissionFlow, SubmissionState, SubmitOutcome};
