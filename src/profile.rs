//! C2 — Profile Loader Interface (§4.2, §6.2).

use crate::error::MessageKind;
use oxiri::Iri;
use oxrdf::NamedNode;
use std::collections::HashMap;
use std::fmt;

/// The data a profile document contributes to the evaluation context: a
/// prefix map, a term map, and an optional default vocabulary (§4.2).
#[derive(Debug, Clone, Default)]
pub struct Profile {
    pub prefixes: HashMap<String, String>,
    pub terms: HashMap<String, NamedNode>,
    pub vocabulary: Option<NamedNode>,
}

/// `find_profile(iri)` failed (§4.2, §7 `ProfileReferenceError`).
#[derive(Debug, Clone)]
pub struct ProfileReferenceError {
    pub profile_iri: String,
    pub message: String,
}

impl fmt::Display for ProfileReferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "could not load RDFa profile '{}': {}",
            self.profile_iri, self.message
        )
    }
}

impl std::error::Error for ProfileReferenceError {}

impl ProfileReferenceError {
    pub fn kind(&self) -> MessageKind {
        MessageKind::ProfileReferenceError
    }
}

/// The narrow interface the traversal engine needs from a profile cache /
/// fetcher (§4.2, §6.2). Implementations typically cache by IRI and add
/// HTTP retry; none of that lives in this crate.
pub trait ProfileLoader {
    /// Fetches and parses the profile document named by `iri`.
    ///
    /// Implementations MUST guard against recursing into the document
    /// currently being parsed: the traversal engine passes `document_base`
    /// so a loader can compare normalised IRIs and refuse self-reference
    /// (§4.2 "self-recursion guard").
    fn find_profile(
        &mut self,
        iri: &Iri<String>,
        document_base: Option<&Iri<String>>,
    ) -> Result<Profile, ProfileReferenceError>;
}

/// A [`ProfileLoader`] that never has anything to offer, for callers that
/// don't need profile support (e.g. tests, or hosts that only use 1.0).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProfileLoader;

impl ProfileLoader for NullProfileLoader {
    fn find_profile(
        &mut self,
        iri: &Iri<String>,
        _document_base: Option<&Iri<String>>,
    ) -> Result<Profile, ProfileReferenceError> {
        Err(ProfileReferenceError {
            profile_iri: iri.as_str().to_owned(),
            message: "no profile loader configured".to_owned(),
        })
    }
}

/// A [`ProfileLoader`] backed by an in-memory fixture, for tests and for
/// hosts that ship the well-known default profiles (xml, xhtml) as static
/// data rather than fetching them over the network.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProfileLoader {
    profiles: HashMap<String, Profile>,
}

impl InMemoryProfileLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(mut self, iri: impl Into<String>, profile: Profile) -> Self {
        self.profiles.insert(iri.into(), profile);
        self
    }
}

impl ProfileLoader for InMemoryProfileLoader {
    fn find_profile(
        &mut self,
        iri: &Iri<String>,
        document_base: Option<&Iri<String>>,
    ) -> Result<Profile, ProfileReferenceError> {
        if let Some(base) = document_base {
            if base.as_str() == iri.as_str() {
                return Err(ProfileReferenceError {
                    profile_iri: iri.as_str().to_owned(),
                    message: "a profile must not reference the document being parsed".to_owned(),
                });
            }
        }
        self.profiles.get(iri.as_str()).cloned().ok_or_else(|| ProfileReferenceError {
            profile_iri: iri.as_str().to_owned(),
            message: "unknown profile".to_owned(),
        })
    }
}

/// The well-known `xml` default profile IRI, merged for every host on any
/// 1.1 document (§4.5 Preamble).
pub const XML_PROFILE_IRI: &str = "http://www.w3.org/2011/rdfa-context/rdfa-1.1";
/// The well-known `xhtml` default profile IRI, additionally merged on HTML
/// hosts (§4.5 Preamble).
pub const XHTML_PROFILE_IRI: &str = "http://www.w3.org/2011/rdfa-context/xhtml-rdfa-1.1";
