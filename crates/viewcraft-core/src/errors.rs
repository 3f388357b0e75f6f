use viewcraft_core_types::{RequestId, TraceId};
use thiserror::Error;

/// Result type alias using ViewEditorError
pub type Result<T> = std::result::Result<T, ViewEditorError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers can branch on (and that
/// the logging facility records as `err.code`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Construction
    InvalidInput,
    MissingArgument,
    MissingIdentifier,
    EmptyUpdate,
    InvalidComposition,

    // Decode
    UnknownCommand,
    MalformedJson,
    InvalidUndoable,

    // History
    NotInvertible,

    // Editor session
    NoEditorView,
    ReadOnly,

    // Integration/IO
    Config,
    Serialization,
    Persistence,
    ExternalService,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::MissingArgument => "ERR_MISSING_ARGUMENT",
            ExErrorKind::MissingIdentifier => "ERR_MISSING_IDENTIFIER",
            ExErrorKind::EmptyUpdate => "ERR_EMPTY_UPDATE",
            ExErrorKind::InvalidComposition => "ERR_INVALID_COMPOSITION",
            ExErrorKind::UnknownCommand => "ERR_UNKNOWN_COMMAND",
            ExErrorKind::MalformedJson => "ERR_MALFORMED_JSON",
            ExErrorKind::InvalidUndoable => "ERR_INVALID_UNDOABLE",
            ExErrorKind::NotInvertible => "ERR_NOT_INVERTIBLE",
            ExErrorKind::NoEditorView => "ERR_NO_EDITOR_VIEW",
            ExErrorKind::ReadOnly => "ERR_READ_ONLY",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification used for programmatic handling plus the
/// context (operation, command kind, request correlation) needed to debug it.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    command_kind: Option<String>,
    argument: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            command_kind: None,
            argument: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the command kind the error relates to
    pub fn with_command_kind(mut self, kind: impl Into<String>) -> Self {
        self.command_kind = Some(kind.into());
        self
    }

    /// Add the offending argument name
    pub fn with_argument(mut self, arg: impl Into<String>) -> Self {
        self.argument = Some(arg.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn command_kind(&self) -> Option<&str> {
        self.command_kind.as_deref()
    }

    pub fn argument(&self) -> Option<&str> {
        self.argument.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(kind) = &self.command_kind {
            write!(f, " (command: {})", kind)?;
        }
        if let Some(arg) = &self.argument {
            write!(f, " (argument: {})", arg)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for view-editor operations
///
/// Construction and decode failures are returned as values from the command
/// factory; callers branch on them and never dispatch them to the event bus.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewEditorError {
    // ===== Construction Errors =====
    /// A command discriminator was present but a required argument was not
    #[error("Unable to decode {kind}: missing required argument '{arg}'")]
    MissingArgument { kind: String, arg: String },

    /// An argument was present but had the wrong shape
    #[error("Invalid argument '{arg}' for {kind}: {reason}")]
    InvalidArgument {
        kind: String,
        arg: String,
        reason: String,
    },

    /// Remove commands must carry the id of the add command they undo
    #[error("{kind} requires the id of the command it reverses")]
    MissingIdentifier { kind: String },

    /// Update commands need at least one of the old and new values
    #[error("Must have either a new value or an old value when creating {kind}")]
    EmptyUpdate { kind: String },

    #[error("Invalid composition: {reason}")]
    InvalidComposition { reason: String },

    // ===== Decode Errors =====
    #[error("Unhandled command: {discriminator}")]
    UnknownCommand { discriminator: String },

    #[error("Malformed JSON: {reason}")]
    MalformedJson { reason: String },

    #[error("Unable to create undoable: {reason}")]
    InvalidUndoable { reason: String },

    // ===== History Errors =====
    #[error("The '{command_id}' command does not have an undo command")]
    NotInvertible { command_id: String },

    // ===== Editor Session Errors =====
    #[error("No view is being edited")]
    NoEditorView,

    #[error("The view being edited is read-only")]
    ReadOnly,

    // ===== Generic Errors =====
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<ViewEditorError> for ExError {
    fn from(err: ViewEditorError) -> Self {
        match err {
            ViewEditorError::MissingArgument { kind, arg } => {
                ExError::new(ExErrorKind::MissingArgument)
                    .with_op("decode")
                    .with_command_kind(kind)
                    .with_argument(arg)
                    .with_message("Required argument missing")
            }

            ViewEditorError::InvalidArgument { kind, arg, reason } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_command_kind(kind)
                    .with_argument(arg)
                    .with_message(reason)
            }

            ViewEditorError::MissingIdentifier { kind } => {
                ExError::new(ExErrorKind::MissingIdentifier)
                    .with_command_kind(kind)
                    .with_message("Remove commands require the id of the add command")
            }

            ViewEditorError::EmptyUpdate { kind } => ExError::new(ExErrorKind::EmptyUpdate)
                .with_command_kind(kind)
                .with_message("Neither a new nor an old value was supplied"),

            ViewEditorError::InvalidComposition { reason } => {
                ExError::new(ExErrorKind::InvalidComposition).with_message(reason)
            }

            ViewEditorError::UnknownCommand { discriminator } => {
                ExError::new(ExErrorKind::UnknownCommand)
                    .with_op("decode")
                    .with_command_kind(discriminator)
                    .with_message("Unhandled command")
            }

            ViewEditorError::MalformedJson { reason } => {
                ExError::new(ExErrorKind::MalformedJson).with_message(reason)
            }

            ViewEditorError::InvalidUndoable { reason } => {
                ExError::new(ExErrorKind::InvalidUndoable)
                    .with_op("decode_undoable")
                    .with_message(reason)
            }

            ViewEditorError::NotInvertible { command_id } => {
                ExError::new(ExErrorKind::NotInvertible)
                    .with_op("create_undo_command")
                    .with_command_kind(command_id)
                    .with_message("Command does not have an undo command")
            }

            ViewEditorError::NoEditorView => {
                ExError::new(ExErrorKind::NoEditorView).with_message("No view is being edited")
            }

            ViewEditorError::ReadOnly => {
                ExError::new(ExErrorKind::ReadOnly).with_message("View is read-only")
            }

            ViewEditorError::InvalidConfig { reason } => {
                ExError::new(ExErrorKind::Config).with_message(reason)
            }

            ViewEditorError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            ViewEditorError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for ViewEditorError {
    fn from(err: serde_json::Error) -> Self {
        ViewEditorError::MalformedJson {
            reason: err.to_string(),
        }
    }
}
