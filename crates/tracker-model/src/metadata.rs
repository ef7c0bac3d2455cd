//! Reference metadata shared read-only by every record in a batch.

use serde::{Deserialize, Serialize};

use crate::enums::{FeatureType, IdScheme, ValidationStrategy, ValueType};

/// A metadata object addressable by uid, code or name.
pub trait Identifiable {
    fn uid(&self) -> &str;

    fn code(&self) -> Option<&str>;

    fn name(&self) -> Option<&str>;

    /// The identifier this object is known by under `scheme`, if it has one.
    fn identifier(&self, scheme: IdScheme) -> Option<&str> {
        match scheme {
            IdScheme::Uid => Some(self.uid()),
            IdScheme::Code => self.code(),
            IdScheme::Name => self.name(),
        }
    }
}

macro_rules! identifiable {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Identifiable for $ty {
                fn uid(&self) -> &str {
                    &self.uid
                }

                fn code(&self) -> Option<&str> {
                    self.code.as_deref()
                }

                fn name(&self) -> Option<&str> {
                    self.name.as_deref()
                }
            }
        )+
    };
}

identifiable!(
    ProgramStage,
    DataElement,
    OrganisationUnit,
    TrackedEntityType,
    AttributeDefinition,
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramStage {
    pub uid: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub repeatable: bool,
    #[serde(default)]
    pub validation_strategy: ValidationStrategy,
    #[serde(default)]
    pub feature_type: FeatureType,
    #[serde(default)]
    pub data_elements: Vec<ProgramStageDataElement>,
}

impl ProgramStage {
    /// Uids of the data elements that must carry a value.
    pub fn compulsory_data_elements(&self) -> impl Iterator<Item = &str> {
        self.data_elements
            .iter()
            .filter(|element| element.compulsory)
            .map(|element| element.data_element.as_str())
    }
}

/// Link between a program stage and one of its data elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramStageDataElement {
    /// Uid of the data element.
    pub data_element: String,
    #[serde(default)]
    pub compulsory: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataElement {
    pub uid: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value_type: ValueType,
    /// Codes of the option set, empty when the element is not coded.
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationUnit {
    pub uid: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Hierarchy path of uids, e.g. `/root/district/facility`.
    #[serde(default)]
    pub path: String,
}

impl OrganisationUnit {
    /// Whether `self` is `ancestor` or lies below it in the hierarchy.
    pub fn is_descendant_of(&self, ancestor: &OrganisationUnit) -> bool {
        self.uid == ancestor.uid
            || self
                .path
                .split('/')
                .any(|segment| segment == ancestor.uid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEntityType {
    pub uid: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub feature_type: FeatureType,
}

/// Definition of a tracked-entity attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDefinition {
    pub uid: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value_type: ValueType,
    /// Values are produced from `text_pattern` by a generator.
    #[serde(default)]
    pub generated: bool,
    #[serde(default)]
    pub unique: bool,
    /// Uniqueness applies within the owner's organisation unit hierarchy
    /// instead of globally.
    #[serde(default)]
    pub org_unit_scope: bool,
    #[serde(default)]
    pub text_pattern: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
}

impl AttributeDefinition {
    pub fn is_file(&self) -> bool {
        self.value_type.is_file()
    }
}

/// A stored file referenced by file-typed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResource {
    pub uid: String,
    /// Already attached to some record.
    #[serde(default)]
    pub assigned: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub uid: String,
    #[serde(default)]
    pub tracked_entity: Option<String>,
    #[serde(default)]
    pub program: Option<String>,
}
