use crate::expression::error::ExprError;

/// Convenience result type used across timecue.
pub type TimecueResult<T> = Result<T, TimecueError>;

/// Top-level error taxonomy used by the resolver and evaluators.
#[derive(thiserror::Error, Debug)]
pub enum TimecueError {
    /// Invalid user-provided or composition data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed time expression.
    #[error("parse error in `{expr}`: {source}")]
    Parse {
        /// The offending expression source.
        expr: String,
        /// Position and reason.
        #[source]
        source: ExprError,
    },

    /// A well-formed expression referenced an anchor that could not be resolved.
    #[error("missing time reference `{anchor}`{}", entity_suffix(.entity))]
    MissingReference {
        /// Anchor in expression syntax, e.g. `scene(intro).end`.
        anchor: String,
        /// Entity whose timing depends on the anchor, once known.
        entity: Option<String>,
    },

    /// Timing fields depend on each other in a loop.
    #[error("circular time reference: {}", .path.join(" -> "))]
    CircularReference {
        /// Dependency path; the first element is repeated at the end.
        path: Vec<String>,
    },

    /// Errors while evaluating a time expression or converging the timeline.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Invalid animation configuration.
    #[error("animation error: {0}")]
    Animation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn entity_suffix(entity: &Option<String>) -> String {
    match entity {
        Some(id) => format!(" (required by '{id}')"),
        None => String::new(),
    }
}

impl TimecueError {
    /// Build a [`TimecueError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TimecueError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`TimecueError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`TimecueError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`TimecueError::Parse`] value for `expr`.
    pub fn parse(expr: impl Into<String>, source: ExprError) -> Self {
        Self::Parse {
            expr: expr.into(),
            source,
        }
    }

    /// Build a [`TimecueError::MissingReference`] without a dependent entity.
    pub fn missing(anchor: impl Into<String>) -> Self {
        Self::MissingReference {
            anchor: anchor.into(),
            entity: None,
        }
    }

    /// Return `true` for the recoverable missing-reference condition.
    pub fn is_missing_reference(&self) -> bool {
        matches!(self, Self::MissingReference { .. })
    }

    /// Attach the dependent entity id to a missing-reference error.
    pub fn with_entity(self, id: &str) -> Self {
        match self {
            Self::MissingReference { anchor, .. } => Self::MissingReference {
                anchor,
                entity: Some(id.to_owned()),
            },
            other => other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
