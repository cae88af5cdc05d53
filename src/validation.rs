//! Connection validation framework
//!
//! The authoring state machine asks a [`ConnectionValidator`] whether a
//! candidate connection may be created. A rejection is a normal outcome of
//! exploratory pointer movement, not an error surfaced to the user; the
//! reason is only logged.

use thiserror::Error;

use crate::document::{Connection, GraphDocument, NodeId};

/// Result of connection validation with optional rejection reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Connection may be created
    Valid,
    /// Connection is rejected with a reason
    Invalid(ValidationError),
}

impl ValidationResult {
    /// Check if the result is valid
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// Combine two results (AND logic): returns first error if any
    pub fn and(self, other: ValidationResult) -> ValidationResult {
        match self {
            ValidationResult::Valid => other,
            invalid => invalid,
        }
    }
}

/// Reasons why a candidate connection was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// An endpoint does not exist in the working document
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),
    /// Source and target are the same node
    #[error("Cannot connect a node to itself")]
    SelfLoop,
    /// An identical (source, sourceHandle, target, targetHandle) connection exists
    #[error("Connection already exists")]
    DuplicateConnection,
    /// Custom validation failure
    #[error("{0}")]
    Custom(String),
}

/// Trait for connection validation logic.
///
/// Implement this to add host-specific rules and compose them with
/// [`CompositeValidator`].
///
/// # Example
///
/// ```
/// use workflow_canvas::{Connection, ConnectionValidator, GraphDocument, ValidationError, ValidationResult};
///
/// /// Allow at most one incoming connection per node
/// struct SingleInput;
///
/// impl ConnectionValidator for SingleInput {
///     fn validate(&self, candidate: &Connection, doc: &GraphDocument) -> ValidationResult {
///         if doc.connections.iter().any(|c| c.target == candidate.target) {
///             ValidationResult::Invalid(ValidationError::Custom(format!(
///                 "{} already has an input",
///                 candidate.target
///             )))
///         } else {
///             ValidationResult::Valid
///         }
///     }
/// }
/// ```
pub trait ConnectionValidator {
    /// Check whether `candidate` may be added to `doc`
    fn validate(&self, candidate: &Connection, doc: &GraphDocument) -> ValidationResult;
}

/// Default validator: both endpoints exist and differ
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicConnectionValidator;

impl ConnectionValidator for BasicConnectionValidator {
    fn validate(&self, candidate: &Connection, doc: &GraphDocument) -> ValidationResult {
        if candidate.source == candidate.target {
            return ValidationResult::Invalid(ValidationError::SelfLoop);
        }
        if !doc.contains_node(&candidate.source) {
            return ValidationResult::Invalid(ValidationError::NodeNotFound(candidate.source.clone()));
        }
        if !doc.contains_node(&candidate.target) {
            return ValidationResult::Invalid(ValidationError::NodeNotFound(candidate.target.clone()));
        }
        ValidationResult::Valid
    }
}

/// Validator that prevents duplicate connections
///
/// Direction and handles matter: A→B does not duplicate B→A.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDuplicatesValidator;

impl ConnectionValidator for NoDuplicatesValidator {
    fn validate(&self, candidate: &Connection, doc: &GraphDocument) -> ValidationResult {
        if doc.has_connection(&candidate.key()) {
            ValidationResult::Invalid(ValidationError::DuplicateConnection)
        } else {
            ValidationResult::Valid
        }
    }
}

/// Composite validator that combines multiple validators
///
/// All validators must return Valid (AND logic). Returns the first error
/// encountered.
///
/// ```
/// use workflow_canvas::{BasicConnectionValidator, CompositeValidator, NoDuplicatesValidator};
///
/// let validator = CompositeValidator::new()
///     .add(BasicConnectionValidator)
///     .add(NoDuplicatesValidator);
/// assert_eq!(validator.len(), 2);
/// ```
#[derive(Default)]
pub struct CompositeValidator {
    validators: Vec<Box<dyn ConnectionValidator>>,
}

impl CompositeValidator {
    /// Create a new empty composite validator
    pub fn new() -> Self {
        Self::default()
    }

    /// The rules the editor applies unless the host installs its own:
    /// existing endpoints, no self-loops, no duplicates
    pub fn standard() -> Self {
        Self::new().add(BasicConnectionValidator).add(NoDuplicatesValidator)
    }

    /// Add a validator to the composite
    ///
    /// Validators are checked in the order they were added.
    pub fn add<V: ConnectionValidator + 'static>(mut self, validator: V) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl ConnectionValidator for CompositeValidator {
    fn validate(&self, candidate: &Connection, doc: &GraphDocument) -> ValidationResult {
        for v in &self.validators {
            let result = v.validate(candidate, doc);
            if !result.is_valid() {
                return result;
            }
        }
        ValidationResult::Valid
    }
}

impl std::fmt::Debug for CompositeValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeValidator")
            .field("validators", &self.validators.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
