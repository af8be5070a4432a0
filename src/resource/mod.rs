//! Resource models shared by the adapters, the session and the views
//!
//! - `types`: resource kinds, item records, identities and the page type filter

pub mod types;

pub use types::{
    BrowseTarget, ChosenItem, GENERIC_PAGE_TYPE, InstanceId, ModelBucket, ModelEntry,
    ModelInstance, ModelLabel, PageId, PageRecord, PageStatus, PageSummary, PageTypeInfo,
    ParentContext, ResourceItem, ResourceKind, TypeFilter,
};
