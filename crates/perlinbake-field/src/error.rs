#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    /// A settings field is out of its legal range. Raised before any buffer is
    /// allocated or any work is dispatched.
    InvalidConfiguration(&'static str),
    /// The requested grid is larger than the host limit or cannot be allocated.
    ResourceExhaustion { width: i32, height: i32 },
    /// A dedicated worker pool could not be started.
    ThreadPool(String),
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldError::InvalidConfiguration(msg) => write!(f, "invalid configuration: {}", msg),
            FieldError::ResourceExhaustion { width, height } => {
                write!(f, "cannot allocate a {}x{} noise field", width, height)
            }
            FieldError::ThreadPool(msg) => write!(f, "fill worker pool failed to start: {}", msg),
        }
    }
}

impl std::error::Error for FieldError {}
