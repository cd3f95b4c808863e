//! Streaming reader for the flattened suite description.
//!
//! The input must be a single document with every external entity already
//! expanded (`xmllint --noent` does this). Only the suite's own vocabulary is
//! understood; this is not a general XML loader.

use std::sync::Arc;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use resources::ResourceLoader;

use crate::element::{Attributes, Element, Id, TEST, TESTCASES, TESTSUITE, TreeBuilder};
use crate::errata::Errata;
use crate::error::SuiteError;
use crate::suite::Suite;

pub struct SuiteParser {
    document_base: String,
    builder: TreeBuilder,
    stack: Vec<Id>,
    top: Option<Id>,
    // Depth inside B/EM markup, whose content is ignored.
    skip: usize,
}

impl SuiteParser {
    /// `document_base` must name the directory that held the top-level suite
    /// file before flattening; fixture paths are resolved against it.
    pub fn new(document_base: impl Into<String>, errata: Arc<Errata>) -> Self {
        Self {
            document_base: document_base.into(),
            builder: TreeBuilder::new(errata),
            stack: Vec::new(),
            top: None,
            skip: 0,
        }
    }

    /// Parse `text` and return its top element, whatever its kind. Fixtures
    /// of the resulting tests are read through `loader`.
    pub fn parse(mut self, text: &str, loader: Arc<dyn ResourceLoader>) -> Result<Element, SuiteError> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().expand_empty_elements = true;

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    let attributes = read_attributes(&reader, &start)?;
                    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                    self.open(&name, attributes)?;
                }
                Event::End(_) => self.close()?,
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(&open) = self.stack.last() {
            return Err(SuiteError::UnclosedElement(self.builder.name(open).to_string()));
        }
        let top = self.top.ok_or(SuiteError::EmptyDocument)?;
        log::debug!(target: "suite.parser", "built {} nodes", self.builder.len());

        let tree = self.builder.finish(loader);
        tree.element(top).ok_or(SuiteError::EmptyDocument)
    }

    fn open(&mut self, name: &str, attributes: Attributes) -> Result<(), SuiteError> {
        if self.skip > 0 {
            self.skip += 1;
            return Ok(());
        }

        let id = match name {
            TEST => self.builder.add_test(attributes, &self.document_base)?,
            TESTCASES | TESTSUITE => self.builder.add_suite(name, attributes, &self.document_base)?,
            // Inline markup in the prose of a TEST.
            "B" | "EM" => {
                self.skip += 1;
                return Ok(());
            }
            other => return Err(SuiteError::UnexpectedElement(other.to_string())),
        };
        log::trace!(target: "suite.parser", "open {name} at depth {}", self.stack.len());

        if let Some(&parent) = self.stack.last() {
            self.builder.append_child(parent, id)?;
        }
        if self.top.is_none() {
            self.top = Some(id);
        }
        self.stack.push(id);
        Ok(())
    }

    fn close(&mut self) -> Result<(), SuiteError> {
        if self.skip > 0 {
            self.skip -= 1;
            return Ok(());
        }
        self.stack.pop().ok_or(SuiteError::StackUnderflow)?;
        Ok(())
    }
}

fn read_attributes(reader: &Reader<&[u8]>, start: &BytesStart<'_>) -> Result<Attributes, SuiteError> {
    let mut attributes = Attributes::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.decode_and_unescape_value(reader.decoder())?;
        attributes.insert(key, value.into_owned());
    }
    Ok(attributes)
}

/// Parse a flattened suite from memory. The top element must be a suite.
pub fn parse_suite(
    text: &str,
    document_base: &str,
    loader: Arc<dyn ResourceLoader>,
    errata: Arc<Errata>,
) -> Result<Suite, SuiteError> {
    let top = SuiteParser::new(document_base, errata).parse(text, loader)?;
    if !top.is_suite() {
        return Err(SuiteError::TopElementNotSuite);
    }
    Suite::try_from(top)
}

/// Load the flattened suite at `suite_file` and parse it.
///
/// The top element must be `TESTSUITE`.
pub async fn load_tests(
    loader: Arc<dyn ResourceLoader>,
    suite_file: &str,
    document_base: &str,
    errata: Arc<Errata>,
) -> Result<Suite, SuiteError> {
    let text = loader.load_file(suite_file).await?;
    let suite = parse_suite(&text, document_base, loader, errata)?;
    if suite.name() != TESTSUITE {
        return Err(SuiteError::TopElementNotTestSuite);
    }
    log::info!(
        target: "suite.parser",
        "loaded {} tests from {suite_file}",
        suite.tests().count()
    );
    Ok(suite)
}

#[cfg(test)]
mod tests {
    use resources::MemoryLoader;

    use super::*;
    use crate::spec::TestSpec;

    fn parse(text: &str) -> Result<Suite, SuiteError> {
        parse_suite(
            text,
            "base",
            Arc::new(MemoryLoader::new()),
            Arc::new(Errata::empty()),
        )
    }

    #[test]
    fn builds_nested_tree() {
        let suite = parse(
            r#"<TESTSUITE PROFILE="p">
                 <TESTCASES xml:base="sub/">
                   <TEST ID="a" TYPE="valid" URI="a.xml" SECTIONS="2.1">Text <EM>with</EM> <B>markup <EM>nested</EM></B>.</TEST>
                   <TEST ID="b" TYPE="not-wf" URI="b.xml" SECTIONS="2.2"/>
                 </TESTCASES>
               </TESTSUITE>"#,
        )
        .unwrap();
        assert_eq!(suite.name(), "TESTSUITE");
        let ids: Vec<String> = suite.tests().map(|t| t.id().to_string()).collect();
        assert_eq!(ids, ["a", "b"]);
        let b = suite.find_test("b").unwrap();
        assert_eq!(b.resolved_uri().unwrap(), "base/sub/b.xml");
        assert_eq!(b.parent().unwrap().name(), "TESTCASES");
    }

    #[test]
    fn unexpected_element_is_fatal() {
        let err = parse("<TESTSUITE><FOO/></TESTSUITE>").unwrap_err();
        assert_eq!(err.to_string(), "unexpected element FOO");
    }

    #[test]
    fn top_element_must_be_a_suite() {
        let text = r#"<TEST ID="a" TYPE="valid" URI="a.xml"/>"#;
        let top = SuiteParser::new("base", Arc::new(Errata::empty()))
            .parse(text, Arc::new(MemoryLoader::new()))
            .unwrap();
        assert!(top.is_test());

        let err = parse(text).unwrap_err();
        assert_eq!(err.to_string(), "the top element must be a suite");
    }

    #[test]
    fn document_without_elements_is_rejected() {
        assert!(matches!(parse("<!-- nothing -->"), Err(SuiteError::EmptyDocument)));
    }

    #[test]
    fn malformed_xml_is_fatal() {
        assert!(matches!(
            parse("<TESTSUITE><TESTCASES></TESTSUITE>"),
            Err(SuiteError::Xml(_))
        ));
    }

    #[test]
    fn stack_underflow_is_reported() {
        let mut parser = SuiteParser::new("base", Arc::new(Errata::empty()));
        assert!(matches!(parser.close(), Err(SuiteError::StackUnderflow)));
    }

    #[test]
    fn attributes_are_unescaped() {
        let suite = parse(
            r#"<TESTSUITE><TEST ID="a&amp;b" TYPE="error" URI="a.xml"/></TESTSUITE>"#,
        )
        .unwrap();
        assert!(suite.find_test("a&b").is_some());
    }

    #[tokio::test]
    async fn load_tests_requires_testsuite_root() {
        let loader: Arc<dyn ResourceLoader> = Arc::new(MemoryLoader::from_entries([
            ("cases.xml", "<TESTCASES/>"),
            ("suite.xml", "<TESTSUITE><TESTCASES/></TESTSUITE>"),
        ]));
        let errata = Arc::new(Errata::empty());
        let err = load_tests(loader.clone(), "cases.xml", "base", errata.clone())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "the top level element must be TESTSUITE");
        let suite = load_tests(loader, "suite.xml", "base", errata).await.unwrap();
        assert_eq!(suite.tests().count(), 0);
    }
}
