use std::fmt;
use std::ops::Deref;
use std::sync::OnceLock;

use core_types::TestType;
use tokio::sync::OnceCell;

use crate::element::{Attributes, Element, NodeKind};
use crate::error::SuiteError;
use crate::sections::{Sections, SectionsError, parse_sections};
use crate::serialized::SerializedTest;
use crate::spec::TestSpec;

/// Properties of a `TEST` node, derived once its attributes are final.
pub(crate) struct TestState {
    id: String,
    test_type: TestType,
    version: Option<String>,
    recommendation: String,
    editions: Option<Vec<String>>,
    entities: String,
    forbids_namespaces: bool,
    sections: OnceLock<Result<Sections, SectionsError>>,
    content: OnceCell<String>,
    has_dtd: OnceCell<bool>,
    has_bom: OnceCell<bool>,
}

fn non_empty<'a>(attributes: &'a Attributes, name: &str) -> Option<&'a str> {
    attributes
        .get(name)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}

impl TestState {
    pub(crate) fn from_attributes(attributes: &Attributes) -> Result<Self, SuiteError> {
        let id = attributes
            .get("ID")
            .ok_or_else(|| SuiteError::missing("ID"))?
            .clone();
        let test_type = attributes
            .get("TYPE")
            .ok_or_else(|| SuiteError::missing("TYPE"))?
            .parse::<TestType>()?;

        let edition = attributes.get("EDITION");
        // Editions only exist for XML 1.0, so an edition without a version
        // pins the test to 1.0.
        let version = match (attributes.get("VERSION"), edition) {
            (Some(version), _) => Some(version.clone()),
            (None, Some(_)) => Some("1.0".to_string()),
            (None, None) => None,
        };
        let editions =
            edition.map(|value| value.split_whitespace().map(str::to_string).collect());

        Ok(Self {
            id,
            test_type,
            version,
            recommendation: non_empty(attributes, "RECOMMENDATION")
                .unwrap_or("XML1.0")
                .to_string(),
            editions,
            entities: non_empty(attributes, "ENTITIES")
                .unwrap_or("none")
                .to_string(),
            forbids_namespaces: attributes
                .get("NAMESPACE")
                .is_some_and(|value| value != "yes"),
            sections: OnceLock::new(),
            content: OnceCell::new(),
            has_dtd: OnceCell::new(),
            has_bom: OnceCell::new(),
        })
    }
}

/// One `TEST` entry of the suite.
///
/// Cloning is cheap; clones share the fixture cache, so `has_dtd` and
/// `has_bom` read the fixture at most once per test however many handles ask.
#[derive(Clone)]
pub struct Test {
    element: Element,
}

impl TryFrom<Element> for Test {
    type Error = SuiteError;

    fn try_from(element: Element) -> Result<Self, Self::Error> {
        if element.is_test() {
            Ok(Self { element })
        } else {
            Err(SuiteError::NotATest(element.name().to_string()))
        }
    }
}

impl Deref for Test {
    type Target = Element;

    fn deref(&self) -> &Element {
        &self.element
    }
}

impl Test {
    fn state(&self) -> &TestState {
        match &self.element.node().kind {
            NodeKind::Test(state) => state,
            _ => unreachable!("test handle on a non-test node"),
        }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    fn parsed_sections(&self) -> Result<&Sections, SuiteError> {
        let raw = self.must_get_attribute("SECTIONS")?;
        self.state()
            .sections
            .get_or_init(|| parse_sections(raw))
            .as_ref()
            .map_err(|err| SuiteError::Sections(*err))
    }

    /// The fixture location: `URI` resolved against this node's base.
    pub fn resolved_uri(&self) -> Result<String, SuiteError> {
        Ok(self.resolve_path(self.must_get_attribute("URI")?))
    }

    /// Text of the fixture, loaded on first use.
    ///
    /// Concurrent callers wait on the same load. A failed load is not cached.
    pub async fn content(&self) -> Result<&str, SuiteError> {
        let state = self.state();
        let text = state
            .content
            .get_or_try_init(|| async {
                let uri = self.resolved_uri()?;
                log::debug!(target: "suite.test", "loading fixture of {}: {uri}", state.id);
                Ok::<_, SuiteError>(self.tree.loader().load_file(&uri).await?)
            })
            .await?;
        Ok(text.as_str())
    }

    /// Every property resolved, the fixture-dependent ones included.
    pub async fn serialized_representation(&self) -> Result<SerializedTest, SuiteError> {
        let parsed = self.parsed_sections()?;
        Ok(SerializedTest {
            id: self.id().to_string(),
            test_type: self.test_type(),
            version: self.version().map(str::to_string),
            recommendation: self.recommendation().to_string(),
            editions: self.editions().map(<[String]>::to_vec),
            sections: parsed.sections.clone(),
            productions: parsed.productions.clone(),
            entities: self.entities().to_string(),
            skip_for_non_validating_parser: self.skip_for_non_validating_parser(),
            forbids_namespaces: self.forbids_namespaces(),
            has_dtd: self.has_dtd().await?,
            has_bom: self.has_bom().await?,
        })
    }
}

impl TestSpec for Test {
    fn id(&self) -> &str {
        &self.state().id
    }

    fn test_type(&self) -> TestType {
        self.state().test_type
    }

    fn version(&self) -> Option<&str> {
        self.state().version.as_deref()
    }

    fn recommendation(&self) -> &str {
        &self.state().recommendation
    }

    fn editions(&self) -> Option<&[String]> {
        self.state().editions.as_deref()
    }

    fn sections(&self) -> Result<&[String], SuiteError> {
        Ok(&self.parsed_sections()?.sections)
    }

    fn productions(&self) -> Result<&[String], SuiteError> {
        Ok(&self.parsed_sections()?.productions)
    }

    fn entities(&self) -> &str {
        &self.state().entities
    }

    fn forbids_namespaces(&self) -> bool {
        self.state().forbids_namespaces
    }

    async fn has_dtd(&self) -> Result<bool, SuiteError> {
        self.state()
            .has_dtd
            .get_or_try_init(|| async {
                let content = self.content().await?;
                Ok::<_, SuiteError>(memchr::memmem::find(content.as_bytes(), b"<!DOCTYPE ").is_some())
            })
            .await
            .copied()
    }

    async fn has_bom(&self) -> Result<bool, SuiteError> {
        self.state()
            .has_bom
            .get_or_try_init(|| async {
                let content = self.content().await?;
                // An undecodable byte order mark comes through as two U+FFFD.
                let mut chars = content.chars();
                Ok::<_, SuiteError>(
                    chars.next() == Some('\u{FFFD}') && chars.next() == Some('\u{FFFD}'),
                )
            })
            .await
            .copied()
    }
}

impl fmt::Debug for Test {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Test")
            .field("id", &self.id())
            .field("type", &self.test_type())
            .field("node", &self.node_id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use resources::MemoryLoader;

    use super::*;
    use crate::element::TreeBuilder;
    use crate::errata::Errata;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn make_test(pairs: &[(&str, &str)]) -> Test {
        make_test_with(pairs, MemoryLoader::new(), Errata::empty())
    }

    fn make_test_with(pairs: &[(&str, &str)], loader: MemoryLoader, errata: Errata) -> Test {
        let mut builder = TreeBuilder::new(Arc::new(errata));
        let mut all = attrs(&[("ID", "t"), ("TYPE", "valid"), ("URI", "t.xml")]);
        all.extend(attrs(pairs));
        let id = builder.add_test(all, "base").unwrap();
        let tree = builder.finish(Arc::new(loader));
        tree.element(id).unwrap().as_test().unwrap()
    }

    #[test]
    fn version_defaults_to_1_0_when_edition_is_set() {
        assert_eq!(make_test(&[("EDITION", "5")]).version(), Some("1.0"));
        assert_eq!(make_test(&[("EDITION", "5"), ("VERSION", "1.1")]).version(), Some("1.1"));
        assert_eq!(make_test(&[]).version(), None);
    }

    #[test]
    fn defaults_for_recommendation_and_entities() {
        let test = make_test(&[]);
        assert_eq!(test.recommendation(), "XML1.0");
        assert_eq!(test.entities(), "none");
        let test = make_test(&[("RECOMMENDATION", ""), ("ENTITIES", "")]);
        assert_eq!(test.recommendation(), "XML1.0");
        assert_eq!(test.entities(), "none");
        let test = make_test(&[("RECOMMENDATION", "NS1.0"), ("ENTITIES", "both")]);
        assert_eq!(test.recommendation(), "NS1.0");
        assert_eq!(test.entities(), "both");
    }

    #[test]
    fn editions_are_whitespace_separated() {
        let test = make_test(&[("EDITION", "1 2  3\t4")]);
        assert_eq!(test.editions().unwrap(), ["1", "2", "3", "4"]);
        assert!(test.includes_edition("3"));
        assert!(!test.includes_edition("5"));
        assert!(make_test(&[]).includes_edition("5"));
    }

    #[test]
    fn empty_edition_lists_no_edition() {
        let test = make_test(&[("EDITION", "")]);
        assert!(test.editions().unwrap().is_empty());
        assert!(!test.includes_edition("5"));
        assert!(!test.includes_edition(""));
        assert_eq!(test.version(), Some("1.0"));
    }

    #[test]
    fn namespace_flag() {
        assert!(!make_test(&[]).forbids_namespaces());
        assert!(!make_test(&[("NAMESPACE", "yes")]).forbids_namespaces());
        assert!(make_test(&[("NAMESPACE", "no")]).forbids_namespaces());
    }

    #[test]
    fn invalid_tests_are_skipped_for_non_validating_parsers() {
        assert!(make_test(&[("TYPE", "invalid")]).skip_for_non_validating_parser());
        assert!(!make_test(&[("TYPE", "not-wf")]).skip_for_non_validating_parser());
    }

    #[test]
    fn sections_are_required_and_cached() {
        let test = make_test(&[]);
        assert_eq!(test.sections().unwrap_err().to_string(), "attribute SECTIONS is not set");

        let test = make_test(&[("SECTIONS", "[a]]")]);
        assert_eq!(test.sections().unwrap_err().to_string(), "extraneous bracket");
        assert_eq!(test.productions().unwrap_err().to_string(), "extraneous bracket");

        let test = make_test(&[("SECTIONS", "2.8 [23]")]);
        assert!(test.includes_sections(&["4.1", "2.8"]).unwrap());
        assert!(test.includes_productions(&["[23]"]).unwrap());
        assert!(!test.includes_productions(&["23"]).unwrap());
    }

    #[test]
    fn errata_patch_attributes_before_derivation() {
        let mut errata = Errata::empty();
        errata.correct("t", "TYPE", "invalid").correct("t", "EDITION", "5");
        let test = make_test_with(&[], MemoryLoader::new(), errata);
        assert_eq!(test.test_type(), TestType::Invalid);
        assert_eq!(test.version(), Some("1.0"));
        assert_eq!(test.attribute("TYPE"), Some("invalid"));
    }

    #[test]
    fn resolved_uri_uses_base() {
        let test = make_test(&[("URI", "sub/t.xml")]);
        assert_eq!(test.resolved_uri().unwrap(), "base/sub/t.xml");
    }

    #[tokio::test]
    async fn fixture_sniffing() {
        let loader = MemoryLoader::from_entries([("base/t.xml", "<!DOCTYPE a [<!ELEMENT a EMPTY>]><a/>")]);
        let test = make_test_with(&[], loader, Errata::empty());
        assert!(test.has_dtd().await.unwrap());
        assert!(!test.has_bom().await.unwrap());

        let loader = MemoryLoader::from_entries([("base/t.xml", "\u{FFFD}\u{FFFD}<\0a\0")]);
        let test = make_test_with(&[], loader, Errata::empty());
        assert!(!test.has_dtd().await.unwrap());
        assert!(test.has_bom().await.unwrap());
    }

    #[tokio::test]
    async fn missing_fixture_is_an_error() {
        let test = make_test(&[]);
        let err = test.has_dtd().await.unwrap_err();
        assert!(matches!(err, SuiteError::Load(_)));
    }

    #[tokio::test]
    async fn serialized_record_carries_every_property() {
        let loader = MemoryLoader::from_entries([("base/t.xml", "<a/>")]);
        let test = make_test_with(
            &[("SECTIONS", "2.2 [2]"), ("EDITION", "5"), ("ENTITIES", "general")],
            loader,
            Errata::empty(),
        );
        let record = test.serialized_representation().await.unwrap();
        assert_eq!(record.id, "t");
        assert_eq!(record.test_type, TestType::Valid);
        assert_eq!(record.version.as_deref(), Some("1.0"));
        assert_eq!(record.editions, Some(vec!["5".to_string()]));
        assert_eq!(record.sections, ["2.2"]);
        assert_eq!(record.productions, ["[2]"]);
        assert_eq!(record.entities, "general");
        assert!(!record.has_dtd);
        assert!(!record.has_bom);
    }
}
