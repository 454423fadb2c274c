//! Brands domain module.
//!
//! Holds the brand entity, its validation rules, the repository boundary and
//! the create-brand command. No HTTP and no concrete storage live here.

pub mod brand;
pub mod create_brand;
pub mod events;
pub mod store;
pub mod validation;

pub use brand::{Brand, BrandDetails, BrandId, BrandName, WebLink};
pub use create_brand::{CreateBrandCommand, CreateBrandError, CreateBrandInput, CreateBrandOutput};
pub use events::BrandCreated;
pub use store::{BrandStore, BrandStoreError};
