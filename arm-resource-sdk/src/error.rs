use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input is not a well formed ARM resource id. `reason` names the
    /// rule that rejected it.
    #[error("invalid resource ID '{id}': {reason}")]
    MalformedIdentifier { id: String, reason: &'static str },

    /// A resource type was built from a type path with no segments.
    #[error("invalid resource type '{namespace}/{type_name}': type path has no segments")]
    EmptyResourceType { namespace: String, type_name: String },

    #[error("invalid resource ID or type: '{value}'")]
    MalformedResourceType { value: String },
}

impl ParseError {
    pub(crate) fn malformed(id: &str, reason: &'static str) -> Self {
        tracing::debug!(id, reason, "rejected resource id");

        ParseError::MalformedIdentifier {
            id: id.to_string(),
            reason,
        }
    }
}
