use crate::api::Side;
use thiserror::Error;

pub(crate) const NO_ROOT_ELEMENT: &str = "document has no root element";
pub(crate) const UNCLOSED_ELEMENT: &str = "unexpected end of document, unclosed element";
pub(crate) const UNBALANCED_END: &str = "end tag without matching start tag";

/// Result type of this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading BPMN or comparing paths
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to parse XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("failed to parse XML attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("failed to parse XML: {0}")]
    Parse(String),

    #[error("No start events found in {0} BPMN.")]
    NoStartEvent(Side),

    #[error("No standard paths found.")]
    NoStandardPath,

    #[error("No unknown paths found.")]
    NoActualPath,
}
