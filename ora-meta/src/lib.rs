
mod catalog_connection;
mod catalog_reader;
mod error;
mod models;
mod query_builder;

pub use catalog_connection::*;
pub use catalog_reader::*;
pub use error::*;
pub use models::*;
pub use query_builder::*;


#[cfg(test)]
pub(crate) fn default<T: Default>() -> T {
    T::default()
}
