use thiserror::Error;

/// The result type for the `prosite-matcher` crate.
pub type Result<T> = std::result::Result<T, PrositeError>;

/// The error type for the `prosite-matcher` crate.
#[derive(Error, Debug)]
pub struct PrositeError {
    /// The source of the error.
    pub source: Box<PrositeErrorKind>,
}

impl PrositeError {
    /// Create a new `PrositeError`.
    pub fn new(kind: PrositeErrorKind) -> Self {
        PrositeError {
            source: Box::new(kind),
        }
    }
}

impl std::fmt::Display for PrositeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// The error kind type.
#[derive(Error, Debug)]
pub enum PrositeErrorKind {
    /// The pattern violates the PROSITE grammar.
    #[error(transparent)]
    Syntax(#[from] PatternSyntaxError),

    /// An empty sequence or pattern was supplied to the boundary.
    /// Caught before any compilation is attempted.
    #[error("{0} must not be empty")]
    EmptyInput(&'static str),
}

impl From<PatternSyntaxError> for PrositeError {
    fn from(error: PatternSyntaxError) -> Self {
        PrositeError::new(PrositeErrorKind::Syntax(error))
    }
}

/// A syntax error in a PROSITE pattern.
/// It is fatal to the compile call that raised it; no matcher is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at offset {offset}")]
pub struct PatternSyntaxError {
    /// The character offset in the pattern string where the error was found.
    pub offset: usize,
    /// What went wrong at that offset.
    pub kind: SyntaxErrorKind,
}

impl PatternSyntaxError {
    /// Create a new syntax error at the given pattern offset.
    pub fn new(offset: usize, kind: SyntaxErrorKind) -> Self {
        PatternSyntaxError { offset, kind }
    }
}

/// The kinds of syntax errors the pattern parser can report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// A character that has no meaning at this point of the pattern.
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),

    /// A `[` or `{` class that is not closed before the pattern ends.
    #[error("unterminated '{0}' class")]
    UnterminatedClass(char),

    /// An alternative class `[]` with no symbols in it.
    #[error("empty symbol class")]
    EmptyClass,

    /// A symbol inside a class that is not an alphabet member.
    #[error("symbol '{0}' is not part of the alphabet")]
    ForeignSymbol(char),

    /// A repetition range that is not `(n)` or `(n,m)` with digits and n <= m.
    #[error("malformed repetition range")]
    MalformedRepetition,

    /// A `(` repetition that is not closed before the pattern ends.
    #[error("unterminated repetition range")]
    UnterminatedRepetition,
}
