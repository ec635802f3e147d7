use quick_xml::se::Serializer;
use serde::Serialize;

use super::model::OfxDocument;
use crate::errors::{ConvertError, ConvertResult};

/// OFX 2.2.0 declaration block, emitted verbatim before the document body.
pub const OFX_HEADER: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n",
    "<?OFX OFXHEADER=\"200\" VERSION=\"220\" SECURITY=\"NONE\" ",
    "OLDFILEUID=\"NONE\" NEWFILEUID=\"NONE\"?>\n",
);

/// Serialize the document to an indented OFX 2.2.0 XML string.
pub fn render(document: &OfxDocument) -> ConvertResult<String> {
    let mut body = String::new();
    let mut serializer = Serializer::with_root(&mut body, Some("OFX"))
        .map_err(|e| ConvertError::OfxWriteFailed(e.to_string()))?;
    serializer.indent(' ', 2);
    document
        .serialize(serializer)
        .map_err(|e| ConvertError::OfxWriteFailed(e.to_string()))?;

    Ok(format!("{OFX_HEADER}{body}\n"))
}
