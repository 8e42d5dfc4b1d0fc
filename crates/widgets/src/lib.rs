//! Dashboard widget data.
//!
//! Every [`WidgetType`](bizdash_core::widget::WidgetType) has one fetch
//! routine and one fallback shape, held in the [`registry`]. The
//! [`resolver`] runs the fetch with a single retry and substitutes the
//! fallback on failure, so callers always receive renderable data. The
//! [`query`] cache tracks each widget query's lifecycle with generation
//! tokens.

pub mod context;
pub mod data;
pub mod error;
pub mod query;
pub mod registry;
pub mod resolver;
pub mod sources;

pub use context::{GlobalFilters, WidgetContext};
pub use data::WidgetData;
pub use error::WidgetError;
pub use query::{Generation, QueryCache, QueryKey, QueryPhase, WidgetQuery};
pub use registry::WidgetRegistry;
pub use resolver::{DataSource, Resolved, WidgetResolver};
