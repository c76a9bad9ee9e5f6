use thiserror::Error;

/// Structural defects in a flow document.
///
/// None of these are transient: the document has to be fixed by its author,
/// so callers report them and stop converting the flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// The header line yields no work lane.
    #[error("malformed header: no work lanes found in {header:?}")]
    MalformedHeader { header: String },

    /// An arrow names a lane that the header never declared.
    #[error("line {line}: column not found: `{tag}`\n  {raw}")]
    UnknownColumn {
        tag: String,
        line: usize,
        raw: String,
    },

    /// An arrow points at the lane it starts from (strict mode only).
    #[error("line {line}: transition to `{tag}` stays in the same column\n  {raw}")]
    SelfTransition {
        tag: String,
        line: usize,
        raw: String,
    },
}

impl FlowError {
    /// 1-based source line the error points at, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            FlowError::MalformedHeader { .. } => None,
            FlowError::UnknownColumn { line, .. } | FlowError::SelfTransition { line, .. } => {
                Some(*line)
            }
        }
    }
}
