//! A small flattened suite with in-memory fixtures.
//!
//! Ids and layout follow the real W3C suite so selection tables apply to it.

use std::sync::Arc;

use resources::{MemoryLoader, ResourceLoader};
use suite::{Errata, Suite, SuiteError};

pub const SAMPLE_DOCUMENT_BASE: &str = "/suite/xmlconf";
pub const SAMPLE_SUITE_PATH: &str = "/suite/cleaned/xmlconf-flattened.xml";

pub const SAMPLE_SUITE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TESTSUITE PROFILE="Sample XML conformance suite">
  <TESTCASES PROFILE="Sun Microsystems XML Tests" xml:base="sun/">
    <TEST ID="valid-sa-001" TYPE="valid" ENTITIES="none" SECTIONS="3.2.2 [51]" URI="valid/sa/001.xml">
      Test demonstrates an Element Type Declaration with <EM>Mixed Content</EM>.
    </TEST>
    <TEST ID="not-wf-sa-001" TYPE="not-wf" ENTITIES="none" SECTIONS="3.1 [41]" URI="not-wf/sa/001.xml">
      Attribute values must start with attribute names, not "?".
    </TEST>
    <TEST ID="inv-not-sa05" TYPE="invalid" ENTITIES="both" SECTIONS="2.9 [32]" URI="invalid/not-sa05.xml">
      Tests the Standalone Document Declaration VC.
    </TEST>
    <TEST ID="not-wf-sa-168" TYPE="not-wf" ENTITIES="none" SECTIONS="2.2 [2]" URI="not-wf/sa/168.xml">
      Invalid surrogate pair.
    </TEST>
    <TEST ID="not-wf-ext-sa-001" TYPE="not-wf" ENTITIES="both" SECTIONS="4.1 [68]" URI="not-wf/ext-sa/001.xml">
      Tests the <B>No Recursion</B> WFC by having an external general entity be self-recursive.
    </TEST>
    <TEST ID="valid-sa-094" TYPE="valid" ENTITIES="none" SECTIONS="4.3.2 [28]" URI="valid/sa/094.xml">
      Attribute defaults with a DTD.
    </TEST>
  </TESTCASES>
  <TESTCASES PROFILE="IBM XML Conformance Test Suite" xml:base="ibm/">
    <TEST ID="ibm-not-wf-P21-ibm21n02.xml" TYPE="not-wf" ENTITIES="none" SECTIONS="2.7" URI="not-wf/P21/ibm21n02.xml">
      Tests CDEnd with an illegal space.
    </TEST>
    <TEST ID="ibm-invalid-P32-ibm32i03.xml" TYPE="invalid" ENTITIES="both" SECTIONS="2.9" URI="invalid/P32/ibm32i03.xml">
      Tests VC: Standalone Document Declaration.
    </TEST>
    <TEST ID="x-ibm-1-0.5-valid-P04-ibm04v01.xml" TYPE="valid" EDITION="5" ENTITIES="none" SECTIONS="2.3 [4]" URI="valid/P04/ibm04v01.xml">
      Tests NameStartChar as allowed by the fifth edition.
    </TEST>
  </TESTCASES>
  <TESTCASES PROFILE="Richard Tobin's XML 1.0 2nd edition errata test suite" xml:base="eduni/errata-2e/">
    <TEST ID="rmt-e2e-9a" TYPE="valid" ENTITIES="none" SECTIONS="2.9" URI="E9a.xml" EDITION="1 2 3 4">
      An external ATTLIST declaration does not make a document non-standalone.
    </TEST>
    <TEST ID="rmt-e2e-15g" TYPE="valid" ENTITIES="none" SECTIONS="3" URI="E15g.xml">
      Empty content can't contain an entity reference.
    </TEST>
    <TEST ID="rmt-e2e-27" TYPE="not-wf" ENTITIES="none" SECTIONS="2.2" URI="E27.xml" EDITION="1 2 3 4">
      Surrogate characters are not allowed.
    </TEST>
    <TEST ID="rmt-e2e-2a" TYPE="error" ENTITIES="none" SECTIONS="3.2.1" URI="E2a.xml">
      Duplicate token in enumerated attribute declaration.
    </TEST>
  </TESTCASES>
  <TESTCASES PROFILE="Richard Tobin's XML Namespaces 1.0/1.1 test suite" xml:base="eduni/namespaces/">
    <TEST ID="rmt-ns10-013" TYPE="not-wf" RECOMMENDATION="NS1.0" ENTITIES="none" SECTIONS="3" URI="1.0/013.xml">
      Bad QName syntax (multiple colons).
    </TEST>
    <TEST ID="rmt-ns10-043" TYPE="valid" RECOMMENDATION="NS1.0" NAMESPACE="no" ENTITIES="none" SECTIONS="3" URI="1.0/043.xml">
      Element name with a colon but no namespace processing.
    </TEST>
    <TEST ID="rmt-ns11-001" TYPE="valid" RECOMMENDATION="NS1.1" VERSION="1.1" ENTITIES="none" SECTIONS="2.1" URI="1.1/001.xml">
      Namespace undeclaring.
    </TEST>
  </TESTCASES>
  <TESTCASES PROFILE="Byte order marks" xml:base="bom/">
    <TEST ID="bom-utf16-001" TYPE="valid" ENTITIES="none" SECTIONS="4.3.3" URI="utf16.xml">
      UTF-16 document starting with a byte order mark.
    </TEST>
  </TESTCASES>
</TESTSUITE>
"#;

/// Fixture texts, relative to [`SAMPLE_DOCUMENT_BASE`], as a loader decodes them.
pub const SAMPLE_FIXTURES: &[(&str, &str)] = &[
    (
        "sun/valid/sa/001.xml",
        "<!DOCTYPE doc [\n<!ELEMENT doc (#PCDATA)>\n]>\n<doc></doc>\n",
    ),
    ("sun/not-wf/sa/001.xml", "<doc>\n<doc\n?\n<a</a>\n</doc>\n"),
    (
        "sun/invalid/not-sa05.xml",
        "<?xml version=\"1.0\" standalone=\"yes\"?>\n<!DOCTYPE root SYSTEM \"dtd/not-sa05.dtd\">\n<root/>\n",
    ),
    ("sun/not-wf/sa/168.xml", "<doc>\u{FFFD}\u{FFFD}</doc>\n"),
    (
        "sun/not-wf/ext-sa/001.xml",
        "<!DOCTYPE doc [\n<!ENTITY e SYSTEM \"001.ent\">\n]>\n<doc>&e;</doc>\n",
    ),
    (
        "sun/valid/sa/094.xml",
        "<!DOCTYPE doc [\n<!ATTLIST doc a1 CDATA \"v1\">\n<!ELEMENT doc EMPTY>\n]>\n<doc/>\n",
    ),
    ("ibm/not-wf/P21/ibm21n02.xml", "<root><![CDATA[x]] ></root>\n"),
    (
        "ibm/invalid/P32/ibm32i03.xml",
        "<?xml version=\"1.0\" standalone=\"yes\"?>\n<!DOCTYPE root SYSTEM \"ibm32i03.dtd\">\n<root/>\n",
    ),
    ("ibm/valid/P04/ibm04v01.xml", "<doc\u{37F}/>\n"),
    (
        "eduni/errata-2e/E9a.xml",
        "<?xml version=\"1.0\" standalone=\"yes\"?>\n<!DOCTYPE foo SYSTEM \"E9.dtd\">\n<foo/>\n",
    ),
    (
        "eduni/errata-2e/E15g.xml",
        "<!DOCTYPE foo [\n<!ELEMENT foo EMPTY>\n<!ENTITY space \"\">\n]>\n<foo>&space;</foo>\n",
    ),
    ("eduni/errata-2e/E27.xml", "<foo>\u{FFFD}</foo>\n"),
    (
        "eduni/errata-2e/E2a.xml",
        "<!DOCTYPE foo [\n<!ATTLIST foo a (a|b|a) #IMPLIED>\n<!ELEMENT foo EMPTY>\n]>\n<foo/>\n",
    ),
    ("eduni/namespaces/1.0/013.xml", "<a:b:c xmlns:a=\"urn:a\"/>\n"),
    ("eduni/namespaces/1.0/043.xml", "<a:foo/>\n"),
    (
        "eduni/namespaces/1.1/001.xml",
        "<?xml version=\"1.1\"?>\n<foo xmlns:a=\"http://example.org/\"><bar xmlns:a=\"\"/></foo>\n",
    ),
    ("bom/utf16.xml", "\u{FFFD}\u{FFFD}<\0d\0o\0c\0/\0>\0"),
];

/// A loader serving the sample suite document and every fixture.
pub fn sample_loader() -> MemoryLoader {
    let mut loader = MemoryLoader::from_entries([(SAMPLE_SUITE_PATH, SAMPLE_SUITE)]);
    for (path, text) in SAMPLE_FIXTURES {
        loader.insert(format!("{SAMPLE_DOCUMENT_BASE}/{path}"), *text);
    }
    loader
}

/// Load the sample suite through `loader`, which must serve
/// [`SAMPLE_SUITE_PATH`].
pub async fn sample_suite(loader: Arc<dyn ResourceLoader>) -> Result<Suite, SuiteError> {
    suite::load_tests(
        loader,
        SAMPLE_SUITE_PATH,
        SAMPLE_DOCUMENT_BASE,
        Arc::new(Errata::builtin()),
    )
    .await
}
