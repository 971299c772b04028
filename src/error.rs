use oxilangtag::LanguageTagParseError;
use oxiri::IriParseError;
use std::fmt;
use std::io;

/// Error returned when driving an [`RdfaParser`](crate::RdfaParser) to completion.
#[derive(Debug, thiserror::Error)]
pub enum RdfaParseError {
    /// I/O error while reading the document or fetching a profile.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// A fatal error recorded while walking the document (§7 `DocumentError`,
    /// or any other message promoted to fatal by `validate` mode).
    #[error(transparent)]
    Syntax(#[from] RdfaSyntaxError),
}

impl From<RdfaParseError> for io::Error {
    #[inline]
    fn from(error: RdfaParseError) -> Self {
        match error {
            RdfaParseError::Io(error) => error,
            RdfaParseError::Syntax(error) => error.into(),
        }
    }
}

/// A position in the source document, when the DOM adapter can supply one.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct TextPosition {
    pub line: u64,
    pub column: u64,
    pub offset: u64,
}

/// A fatal error encountered while processing an RDFa document.
#[derive(Debug)]
pub struct RdfaSyntaxError {
    pub(crate) kind: MessageKind,
    pub(crate) message: String,
    pub(crate) position: Option<TextPosition>,
}

impl fmt::Display for RdfaSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(position) = &self.position {
            write!(
                f,
                "{} at line {}, column {}",
                self.message, position.line, position.column
            )
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for RdfaSyntaxError {}

impl RdfaSyntaxError {
    pub(crate) fn msg(kind: MessageKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            message: msg.into(),
            position: None,
        }
    }

    /// Sets the position of the error.
    pub(crate) fn with_position(mut self, position: TextPosition) -> Self {
        self.position = Some(position);
        self
    }

    /// Returns the location of the error inside of the document, if known.
    pub fn location(&self) -> Option<TextPosition> {
        self.position
    }

    /// The abstract kind of processor message this error corresponds to.
    pub fn kind(&self) -> MessageKind {
        self.kind
    }
}

impl From<RdfaSyntaxError> for io::Error {
    #[inline]
    fn from(error: RdfaSyntaxError) -> Self {
        Self::new(io::ErrorKind::InvalidData, error.to_string())
    }
}

/// The abstract error taxonomy of §7: every diagnostic a processor can emit,
/// whether or not it is fatal, belongs to exactly one of these kinds.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum MessageKind {
    /// Purely informational; never affects output.
    Info,
    /// A non-fatal, non-standard observation.
    Warning,
    /// A recoverable defect in a single statement or attribute.
    Error,
    /// Empty or unparsable input; always fatal.
    DocumentError,
    /// A profile document could not be fetched or parsed.
    ProfileReferenceError,
    /// A CURIE could not be turned into an IRI.
    UnresolvedCurie,
    /// A bare term had no term-map or vocabulary entry.
    UnresolvedTerm,
    /// Literal construction failed (e.g. non-UTF-8 XML literal content).
    LiteralError,
    /// A `prefix` attribute token failed NCName validation.
    PrefixError,
}

impl MessageKind {
    /// Whether this kind of message always aborts the parse, regardless of
    /// `validate` mode (only `DocumentError`, per §7).
    pub fn is_always_fatal(self) -> bool {
        matches!(self, Self::DocumentError)
    }
}

pub(crate) fn invalid_iri(iri: &str, error: IriParseError) -> String {
    format!("error while parsing IRI '{iri}': {error}")
}

pub(crate) fn invalid_language_tag(tag: &str, error: LanguageTagParseError) -> String {
    format!("error while parsing language tag '{tag}': {error}")
}
