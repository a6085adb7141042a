//! Code execution trait definition and outcome model.
//!
//! The use case layer dispatches run requests through the `CodeExecutor`
//! trait; the infrastructure layer provides the sandboxed C++ pipeline.
//! Execution never "fails" at this boundary: compile errors, killed
//! processes, and internal faults are all encoded as outcomes so a faulty
//! user program can never crash the coordination service.

use async_trait::async_trait;

use super::value_object::RoomId;

/// One run action, consumed immediately by the orchestrating use case.
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    pub room_id: RoomId,
    pub source: String,
    pub language: String,
}

/// Classification of an execution outcome, carried to clients verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    /// The artifact ran to termination (any exit code, or killed at a bound)
    ExecutionResult,
    /// The toolchain rejected the source; the artifact was never run
    CompilationError,
    /// The sandbox hit an internal fault while preparing or capturing
    RuntimeError,
    /// The requested language is not in the supported set
    UnsupportedLanguage,
    /// Unexpected launch or orchestration fault
    ServerError,
}

impl OutcomeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::ExecutionResult => "execution-result",
            OutcomeKind::CompilationError => "compilation-error",
            OutcomeKind::RuntimeError => "runtime-error",
            OutcomeKind::UnsupportedLanguage => "unsupported-language",
            OutcomeKind::ServerError => "server-error",
        }
    }
}

/// Result of one execution attempt, broadcast to the room and discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub kind: OutcomeKind,
}

impl ExecutionOutcome {
    /// The artifact ran; captured streams are reported as-is.
    pub fn execution(stdout: String, stderr: String) -> Self {
        Self {
            success: true,
            stdout,
            stderr,
            kind: OutcomeKind::ExecutionResult,
        }
    }

    /// The toolchain rejected the source.
    pub fn compilation_error(stderr: String) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr,
            kind: OutcomeKind::CompilationError,
        }
    }

    /// The sandbox hit an internal fault (filesystem, stream capture).
    pub fn runtime_error(message: String) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: message,
            kind: OutcomeKind::RuntimeError,
        }
    }

    /// The requested language has no pipeline.
    pub fn unsupported_language(tag: &str) -> Self {
        Self {
            success: false,
            stdout: format!("Language '{tag}' is not supported yet. Currently supported: C++"),
            stderr: String::new(),
            kind: OutcomeKind::UnsupportedLanguage,
        }
    }

    /// A process could not be launched, or orchestration faulted.
    pub fn server_error(message: String) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: message,
            kind: OutcomeKind::ServerError,
        }
    }
}

/// Languages with an execution pipeline behind the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedLanguage {
    Cpp,
}

impl SupportedLanguage {
    /// Resolve a wire-level language tag. Unknown tags yield `None` and are
    /// rejected before any filesystem or process resource is touched.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "cpp" => Some(Self::Cpp),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Cpp => "cpp",
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodeExecutor: Send + Sync {
    /// Compile and run `source`, reporting every failure as an outcome.
    async fn execute(&self, source: &str) -> ExecutionOutcome;
}
