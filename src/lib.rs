#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc(html_favicon_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]
#![doc(html_logo_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]

mod context;
mod dom;
mod emitter;
mod error;
mod host;
mod literal;
mod mapping;
mod profile;
mod reader;
mod resolve;
mod traversal;
mod utils;
mod vocab;

pub use crate::context::{Direction, EvaluationContext, IncompleteTriple};
pub use crate::dom::{ChildNode, Document, ElementNode};
pub use crate::emitter::{to_processor_graph, Message, Messages};
pub use crate::error::{MessageKind, RdfaParseError, RdfaSyntaxError, TextPosition};
pub use crate::host::{detect, DetectionHints, HostLanguage, RdfaVersion};
pub use crate::literal::{LiteralInput, LiteralValue};
pub use crate::profile::{
    InMemoryProfileLoader, NullProfileLoader, Profile, ProfileLoader, ProfileReferenceError,
    XHTML_PROFILE_IRI, XML_PROFILE_IRI,
};
pub use crate::reader::{RdfaOutput, RdfaParser};
pub use crate::resolve::{BlankNodeScope, Resource, Restrictions};
pub use crate::traversal::{process_element, StepOutcome};
