//! The template-rendering seam.

use ews_protocol::{ProtocolResult, Request};

/// Turns a verb request into final wire bytes.
///
/// The engine only hands over a template identifier and named
/// arguments (carried by [`Request`]); it never splices envelope bytes
/// itself. Swapping the renderer is how alternative schema versions or
/// capture-replay harnesses plug in.
pub trait Renderer: Send + Sync {
    /// Renders the request into envelope bytes.
    fn render(&self, request: &Request) -> ProtocolResult<Vec<u8>>;
}

/// The standard renderer: fixed SOAP templates, one per verb.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlRenderer;

impl Renderer for XmlRenderer {
    fn render(&self, request: &Request) -> ProtocolResult<Vec<u8>> {
        request.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ews_protocol::FolderRef;

    #[test]
    fn xml_renderer_delegates_to_templates() {
        let request = Request::BindFolder {
            folder: FolderRef::distinguished("contacts"),
        };
        let bytes = XmlRenderer.render(&request).unwrap();
        let xml = String::from_utf8(bytes).unwrap();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<m:GetFolder>"));
    }
}
