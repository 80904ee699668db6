//! Fixed FHIR URLs, code systems and codes used by the hemogram bundle.
//!
//! These mirror the Goiás state health secretariat (SES-GO) profiles the fixtures imitate.

/// Profile declared on every generated bundle.
pub const BUNDLE_PROFILE: &str = "https://fhir.saude.go.gov.br/r4/exame/StructureDefinition/hemograma";

/// Identifier system for the bundle `identifier.value`.
pub const BUNDLE_IDENTIFIER_SYSTEM: &str = "https://fhir.go.gov.br/sid/romulo-rocha";

/// Bundle type of every generated document.
pub const BUNDLE_TYPE: &str = "collection";

/// Profile declared on each single-measurement observation.
pub const SIMPLE_EXAM_PROFILE: &str =
    "https://fhir.saude.go.gov.br/r4/core/StructureDefinition/exame-simples";

/// Profile declared on the panel (summary) observation.
pub const COMPOSITE_EXAM_PROFILE: &str =
    "https://fhir.saude.go.gov.br/r4/core/StructureDefinition/exame-composto";

/// Resource id of the panel observation.
pub const COMPOSITE_EXAM_ID: &str = "exame-composto";

pub const LOINC_SYSTEM: &str = "http://loinc.org";

/// LOINC code of the complete blood count panel.
pub const CBC_PANEL_CODE: &str = "58410-2";
pub const CBC_PANEL_DISPLAY: &str = "Complete blood count (CBC) panel - Blood by Automated count";

pub const OBSERVATION_STATUS: &str = "final";

/// SUS procedure subgroup used as the observation category.
pub const CATEGORY_SYSTEM: &str = "http://www.saude.gov.br/fhir/r4/CodeSystem/BRSubgrupoTabelaSUS";
pub const CATEGORY_CODE: &str = "0202";

/// Subject identifiers are CPF numbers.
pub const CPF_SYSTEM: &str = "https://fhir.saude.go.gov.br/sid/cpf";

pub const PERFORMER_ID: &str = "laboratorio";
pub const CNES_SYSTEM: &str = "https://fhir.saude.go.gov.br/sid/cnes";

/// CNES number of the performing laboratory.
pub const FACILITY_CNES: &str = "2337991";

/// Contained specimen id, referenced as `#amostra`.
pub const SPECIMEN_ID: &str = "amostra";
pub const SPECIMEN_RESOURCE_TYPE: &str = "Specimen";
pub const SPECIMEN_TYPE_SYSTEM: &str = "http://terminology.hl7.org/CodeSystem/v2-0487";
pub const SPECIMEN_TYPE_CODE: &str = "BLD";

pub const METHOD_TEXT: &str = "Automatizado – Cell-Dyn Ruby, Abbott e Microscopia";

pub const UCUM_SYSTEM: &str = "http://unitsofmeasure.org";

pub const REFERENCE_RANGE_MEANING_SYSTEM: &str =
    "http://terminology.hl7.org/CodeSystem/referencerange-meaning";
pub const REFERENCE_RANGE_MEANING_NORMAL: &str = "normal";

/// Extension carrying the free-text neighbourhood of the sample.
pub const NEIGHBOURHOOD_EXTENSION_URL: &str =
    "https://fhir.saude.go.gov.br/r4/core/StructureDefinition/bairro";

/// Rendering used for `issued` and `collectedDateTime`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";
