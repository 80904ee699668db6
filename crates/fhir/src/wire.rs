//! Wire types shared by the bundle and observation modules.
//!
//! These are the exact structures serialised to/from JSON. Field order matches the order keys
//! appear in the rendered document, and every struct rejects unknown keys.

use serde::{Deserialize, Serialize};
use serde_json::Number;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub(crate) struct MetaWire {
    pub profile: Vec<String>,
}

impl MetaWire {
    pub fn with_profile(profile: &str) -> Self {
        Self {
            profile: vec![profile.to_string()],
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub(crate) struct IdentifierWire {
    pub system: String,
    pub value: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub(crate) struct CodingWire {
    pub system: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub(crate) struct CodeableConceptWire {
    pub coding: Vec<CodingWire>,
}

impl CodeableConceptWire {
    pub fn single(system: &str, code: &str, display: Option<&str>) -> Self {
        Self {
            coding: vec![CodingWire {
                system: system.to_string(),
                code: code.to_string(),
                display: display.map(str::to_string),
            }],
        }
    }

    /// Returns the first code carrying `system`, if any.
    pub fn code_in(&self, system: &str) -> Option<&str> {
        self.coding
            .iter()
            .find(|c| c.system == system)
            .map(|c| c.code.as_str())
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub(crate) struct ReferenceWire {
    pub reference: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub(crate) struct QuantityWire {
    pub value: Number,
    pub system: String,
    pub code: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub(crate) struct SpecimenCollectionWire {
    #[serde(rename = "collectedDateTime")]
    pub collected_date_time: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub(crate) struct SpecimenWire {
    #[serde(rename = "resourceType")]
    pub resource_type: String,

    pub id: String,

    #[serde(rename = "type")]
    pub specimen_type: CodeableConceptWire,

    pub collection: SpecimenCollectionWire,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub(crate) struct SubjectWire {
    pub identifier: IdentifierWire,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub(crate) struct PerformerWire {
    pub id: String,
    pub identifier: IdentifierWire,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub(crate) struct MethodWire {
    pub text: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub(crate) struct ReferenceRangeWire {
    pub low: QuantityWire,
    pub high: QuantityWire,
    #[serde(rename = "type")]
    pub range_type: CodeableConceptWire,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub(crate) struct ExtensionWire {
    pub url: String,
    #[serde(rename = "valueString")]
    pub value_string: String,
}

/// Wire representation of an observation, used for both the panel and the measurements.
///
/// Members that only one of the two carries are optional and omitted when empty.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub(crate) struct ObservationWire {
    #[serde(rename = "resourceType")]
    pub resource_type: String,

    pub id: String,

    pub meta: MetaWire,

    pub contained: Vec<SpecimenWire>,

    pub status: String,

    pub category: Vec<CodeableConceptWire>,

    pub code: CodeableConceptWire,

    pub subject: SubjectWire,

    pub issued: String,

    pub performer: Vec<PerformerWire>,

    #[serde(
        rename = "valueQuantity",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub value_quantity: Option<QuantityWire>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<MethodWire>,

    pub specimen: ReferenceWire,

    #[serde(
        rename = "referenceRange",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub reference_range: Vec<ReferenceRangeWire>,

    #[serde(rename = "hasMember", default, skip_serializing_if = "Vec::is_empty")]
    pub has_member: Vec<ReferenceWire>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<ExtensionWire>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub(crate) struct EntryWire {
    #[serde(rename = "fullUrl")]
    pub full_url: String,

    pub resource: ObservationWire,
}

/// Wire representation of the whole document.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub(crate) struct BundleWire {
    #[serde(rename = "resourceType")]
    pub resource_type: String,

    pub meta: MetaWire,

    pub identifier: IdentifierWire,

    #[serde(rename = "type")]
    pub bundle_type: String,

    pub entry: Vec<EntryWire>,
}
