//! Error handling and result types for multiway tree operations.
//!
//! Only construction can fail hard. Duplicate inserts and missing deletes are
//! ordinary outcomes reported through `bool` results; the `try_*` variants
//! surface them as [`TreeError`] values for callers that prefer `?`.

/// Error type for tree operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The requested order cannot describe a balanced multiway tree.
    InvalidOrder(String),
    /// The key is already present.
    DuplicateKey,
    /// The key is not present.
    KeyNotFound,
    /// Internal data structure integrity violation.
    DataIntegrityError(String),
    /// Tree corruption detected by the validator.
    CorruptedTree(String),
}

impl TreeError {
    /// Create an InvalidOrder error with context
    pub fn invalid_order(order: usize, min_required: usize) -> Self {
        Self::InvalidOrder(format!(
            "order {} is invalid (minimum required: {})",
            order, min_required
        ))
    }

    /// Create a DataIntegrityError with context
    pub fn data_integrity(context: &str, details: &str) -> Self {
        Self::DataIntegrityError(format!("{}: {}", context, details))
    }

    /// Create a CorruptedTree error with context
    pub fn corrupted_tree(component: &str, details: &str) -> Self {
        Self::CorruptedTree(format!("{} corruption: {}", component, details))
    }

    pub fn is_order_error(&self) -> bool {
        matches!(self, Self::InvalidOrder(_))
    }

    /// True for the informational outcomes (duplicate insert, missing key).
    pub fn is_informational(&self) -> bool {
        matches!(self, Self::DuplicateKey | Self::KeyNotFound)
    }
}

impl std::fmt::Display for TreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeError::InvalidOrder(msg) => write!(f, "Invalid order: {}", msg),
            TreeError::DuplicateKey => write!(f, "Key already exists in tree"),
            TreeError::KeyNotFound => write!(f, "Key not found in tree"),
            TreeError::DataIntegrityError(msg) => write!(f, "Data integrity error: {}", msg),
            TreeError::CorruptedTree(msg) => write!(f, "Corrupted tree: {}", msg),
        }
    }
}

impl std::error::Error for TreeError {}

/// Result type for tree operations that may fail
pub type TreeResult<T> = Result<T, TreeError>;

/// Result type for tree construction
pub type InitResult<T> = Result<T, TreeError>;

/// Result type for tree modification operations
pub type ModifyResult<T> = Result<T, TreeError>;

/// Result extension trait for attaching operation context.
pub trait TreeResultExt<T> {
    /// Convert to a TreeResult with additional context
    fn with_context(self, context: &str) -> TreeResult<T>;

    /// Convert to a TreeResult with operation context
    fn with_operation(self, operation: &str) -> TreeResult<T>;
}

impl<T> TreeResultExt<T> for Result<T, TreeError> {
    fn with_context(self, context: &str) -> TreeResult<T> {
        self.map_err(|e| match e {
            TreeError::InvalidOrder(msg) => TreeError::InvalidOrder(format!("{}: {}", context, msg)),
            TreeError::DuplicateKey => TreeError::DuplicateKey,
            TreeError::KeyNotFound => TreeError::KeyNotFound,
            TreeError::DataIntegrityError(msg) => TreeError::data_integrity(context, &msg),
            TreeError::CorruptedTree(msg) => TreeError::corrupted_tree(context, &msg),
        })
    }

    fn with_operation(self, operation: &str) -> TreeResult<T> {
        self.with_context(&format!("Operation '{}'", operation))
    }
}
