use thiserror::Error;

#[derive(Error, Debug)]
pub enum OraMetaError {
    #[error("Error from oracle when executing query: `{query}`: `{source}`")]
    QueryFailed {
        query: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Column '{column}' was not returned by the query")]
    ColumnNotFound { column: String },

    #[error("Unexpected value in column '{column}'. Expected `{expected}`, got `{actual}`")]
    UnexpectedValueType {
        column: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl OraMetaError {
    pub(crate) fn query_failed<E>(query: &str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        OraMetaError::QueryFailed {
            query: query.to_string(),
            source: Box::new(source),
        }
    }
}

pub type Result<T = ()> = std::result::Result<T, OraMetaError>;
