mod config;
pub use config::Config;

pub mod convert;
pub use convert::{convert_query, ConverterResult, SubQuery};

mod engine;
pub use engine::Engine;

pub mod filter;
pub use filter::deep_map_filter;

pub mod mapping;
pub use mapping::AliasMapping;

pub mod plan;
pub use plan::{plan, Permissions, Request};

pub mod result;
pub use result::{map_result, merge_with_parent_items};

pub use nestql_core::{
    async_trait, driver, query, schema, stmt, AbstractQuery, Driver, Error, Result, Row, Schema,
};
