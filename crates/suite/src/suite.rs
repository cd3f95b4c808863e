use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use crate::element::Element;
use crate::error::SuiteError;
use crate::spec::TestSpec;
use crate::test::Test;

/// Derived test properties that can be tallied over a suite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueryableProperty {
    Version,
    Recommendation,
    Editions,
    Sections,
    Productions,
    Entities,
    TestType,
}

impl QueryableProperty {
    pub const ALL: [QueryableProperty; 7] = [
        Self::Version,
        Self::Recommendation,
        Self::Editions,
        Self::Sections,
        Self::Productions,
        Self::Entities,
        Self::TestType,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Version => "version",
            Self::Recommendation => "recommendation",
            Self::Editions => "editions",
            Self::Sections => "sections",
            Self::Productions => "productions",
            Self::Entities => "entities",
            Self::TestType => "testType",
        }
    }
}

impl fmt::Display for QueryableProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryableProperty {
    type Err = SuiteError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|property| property.as_str() == value)
            .ok_or_else(|| SuiteError::UnknownProperty(value.to_string()))
    }
}

/// A `TESTSUITE` or `TESTCASES` container.
#[derive(Clone)]
pub struct Suite {
    element: Element,
}

impl TryFrom<Element> for Suite {
    type Error = SuiteError;

    fn try_from(element: Element) -> Result<Self, Self::Error> {
        if element.is_suite() {
            Ok(Self { element })
        } else {
            Err(SuiteError::NotASuite(element.name().to_string()))
        }
    }
}

impl Deref for Suite {
    type Target = Element;

    fn deref(&self) -> &Element {
        &self.element
    }
}

impl Suite {
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Descendant tests in document order.
    pub fn tests(&self) -> impl Iterator<Item = Test> + '_ {
        self.walk_child_elements().filter_map(|el| el.as_test())
    }

    pub fn find_test(&self, id: &str) -> Option<Test> {
        self.tests().find(|test| test.id() == id)
    }

    /// Raw values of attribute `name` over every descendant test.
    ///
    /// Suite attributes are all upper case, so `version` finds `VERSION`.
    /// Tests without the attribute contribute `None`.
    pub fn xml_attribute_values(&self, name: &str) -> Vec<Option<String>> {
        let name = name.to_uppercase();
        self.tests()
            .map(|test| test.attribute(&name).map(str::to_string))
            .collect()
    }

    pub fn xml_attribute_stats(&self, name: &str) -> BTreeMap<Option<String>, usize> {
        tools::frequency_map(self.xml_attribute_values(name))
    }

    /// Values of a derived property over every descendant test. List-valued
    /// properties contribute each of their elements.
    pub fn property_values(
        &self,
        property: QueryableProperty,
    ) -> Result<Vec<Option<String>>, SuiteError> {
        let mut values = Vec::new();
        for test in self.tests() {
            match property {
                QueryableProperty::Version => values.push(test.version().map(str::to_string)),
                QueryableProperty::Recommendation => {
                    values.push(Some(test.recommendation().to_string()))
                }
                QueryableProperty::Editions => match test.editions() {
                    Some(editions) => values.extend(editions.iter().cloned().map(Some)),
                    None => values.push(None),
                },
                QueryableProperty::Sections => {
                    values.extend(test.sections()?.iter().cloned().map(Some))
                }
                QueryableProperty::Productions => {
                    values.extend(test.productions()?.iter().cloned().map(Some))
                }
                QueryableProperty::Entities => values.push(Some(test.entities().to_string())),
                QueryableProperty::TestType => {
                    values.push(Some(test.test_type().as_str().to_string()))
                }
            }
        }
        Ok(values)
    }

    pub fn property_stats(
        &self,
        property: QueryableProperty,
    ) -> Result<BTreeMap<Option<String>, usize>, SuiteError> {
        Ok(tools::frequency_map(self.property_values(property)?))
    }
}

impl fmt::Debug for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suite")
            .field("name", &self.name())
            .field("node", &self.node_id())
            .field("children", &self.children().len())
            .finish()
    }
}
