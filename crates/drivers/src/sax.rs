use std::sync::Arc;

use core_types::{DriverSpec, TestHandling};
use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use resources::ResourceLoader;
use selection::{BoxFuture, Driver, DriverError};
use suite::{Test, TestSpec};

/// Why a document was rejected.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),
    #[error("unbound namespace prefix: {0}")]
    UnboundPrefix(String),
    #[error("document has no root element")]
    NoRoot,
    #[error("content after the root element")]
    AfterRoot,
    #[error("text outside the root element")]
    TextOutsideRoot,
    #[error("unclosed element at end of document")]
    Unclosed,
}

/// Stream `text` through quick-xml, stopping at the first error.
///
/// Only what a tokenizer sees is checked: tag structure, attribute syntax,
/// predefined and character references, and, when `namespaces` is set,
/// that element prefixes are bound. The DTD is not read.
pub fn scan(text: &str, namespaces: bool) -> Result<(), ScanError> {
    let mut reader = NsReader::from_str(text);
    reader.config_mut().check_comments = true;
    let decoder = reader.decoder();

    let mut depth = 0usize;
    let mut seen_root = false;
    loop {
        let (resolved, event) = reader.read_resolved_event()?;
        let unbound = match resolved {
            ResolveResult::Unknown(prefix) => Some(String::from_utf8_lossy(&prefix).into_owned()),
            _ => None,
        };
        match event {
            Event::Start(ref start) | Event::Empty(ref start) => {
                if depth == 0 && seen_root {
                    return Err(ScanError::AfterRoot);
                }
                seen_root = true;
                if let Some(prefix) = unbound.filter(|_| namespaces) {
                    return Err(ScanError::UnboundPrefix(prefix));
                }
                for attr in start.attributes() {
                    let attr = attr.map_err(quick_xml::Error::from)?;
                    attr.decode_and_unescape_value(decoder)
                        .map_err(quick_xml::Error::from)?;
                }
                if matches!(event, Event::Start(_)) {
                    depth += 1;
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Text(text) => {
                let text = text.unescape().map_err(quick_xml::Error::from)?;
                if depth == 0 && !text.trim().is_empty() {
                    return Err(ScanError::TextOutsideRoot);
                }
            }
            Event::CData(_) if depth == 0 => return Err(ScanError::TextOutsideRoot),
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(ScanError::NoRoot);
    }
    if depth > 0 {
        return Err(ScanError::Unclosed);
    }
    Ok(())
}

/// A streaming, non-validating parser built on quick-xml.
pub struct QuickXmlDriver {
    spec: DriverSpec,
    loader: Arc<dyn ResourceLoader>,
}

impl QuickXmlDriver {
    pub const NAME: &'static str = "quick-xml";

    pub fn new(loader: Arc<dyn ResourceLoader>) -> Self {
        Self {
            spec: DriverSpec::new(Self::NAME, false, false),
            loader,
        }
    }
}

impl Driver for QuickXmlDriver {
    fn spec(&self) -> &DriverSpec {
        &self.spec
    }

    fn run<'a>(&'a self, test: &'a Test, handling: TestHandling) -> BoxFuture<'a, Result<(), DriverError>> {
        Box::pin(async move {
            let uri = test.resolved_uri()?;
            let source = self.loader.load_file(&uri).await?;
            let outcome = scan(&source, !test.forbids_namespaces());
            if let Err(err) = &outcome {
                log::debug!(target: "drivers", "{}: rejected: {err}", test.id());
            }
            self.process_result(test, handling, outcome.is_ok())
        })
    }
}
