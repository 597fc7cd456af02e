mod column;
mod foreign_key;
mod primary_key;
mod schema;
mod table;
mod table_info;

pub use column::*;
pub use foreign_key::*;
pub use primary_key::*;
pub use schema::*;
pub use table::*;
pub use table_info::*;
