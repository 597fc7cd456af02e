use serde::Serialize;

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct SchemaRef {
    pub schema_name: String,
}
