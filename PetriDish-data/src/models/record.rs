use mongodb::bson::{Bson, Document};
use serde::Serialize;

/// Field names shared by the stored documents and the templates
pub mod fields {
    pub const ID: &str = "_id";
    pub const FULL_NAME: &str = "full_name";
    pub const EMAIL: &str = "email";
    pub const CPF: &str = "cpf";
    pub const DATE: &str = "date";
    pub const SYSTOLIC_PRESSURE: &str = "systolic_pressure";
    pub const DIASTOLIC_PRESSURE: &str = "diastolic_pressure";
}

/// Storage model for a patient registration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientRecord {
    /// Patient full name
    pub full_name: String,

    /// Contact email
    pub email: String,

    /// Brazilian national ID (CPF), stored as typed
    pub cpf: String,
}

/// Storage model for a blood pressure reading
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BloodPressureRecord {
    /// Date of the reading. `None` leaves the key out of the stored document.
    pub date: Option<String>,

    /// Systolic pressure (the higher number), stored as typed
    pub systolic_pressure: String,

    /// Diastolic pressure (the lower number), stored as typed
    pub diastolic_pressure: String,
}

/// Which of the two document shapes a stored document has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Patient,
    BloodPressure,
}

/// A record headed for, or read back from, the shared collection.
///
/// Documents carry no discriminator; the variant is recovered from which
/// fields are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Patient(PatientRecord),
    BloodPressure(BloodPressureRecord),
}

impl Record {
    /// Kind of this record
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Patient(_) => RecordKind::Patient,
            Record::BloodPressure(_) => RecordKind::BloodPressure,
        }
    }

    /// Serialize into the store's document representation
    pub fn to_document(&self) -> Document {
        let mut document = Document::new();
        match self {
            Record::Patient(patient) => {
                document.insert(fields::FULL_NAME, patient.full_name.as_str());
                document.insert(fields::EMAIL, patient.email.as_str());
                document.insert(fields::CPF, patient.cpf.as_str());
            }
            Record::BloodPressure(reading) => {
                if let Some(date) = &reading.date {
                    document.insert(fields::DATE, date.as_str());
                }
                document.insert(fields::SYSTOLIC_PRESSURE, reading.systolic_pressure.as_str());
                document.insert(fields::DIASTOLIC_PRESSURE, reading.diastolic_pressure.as_str());
            }
        }
        document
    }

    /// Guess the shape of a stored document from the keys it holds
    pub fn classify(document: &Document) -> Option<RecordKind> {
        let has_any = |keys: &[&str]| keys.iter().any(|key| document.contains_key(key));

        if has_any(&[fields::FULL_NAME, fields::EMAIL, fields::CPF]) {
            Some(RecordKind::Patient)
        } else if has_any(&[fields::DATE, fields::SYSTOLIC_PRESSURE, fields::DIASTOLIC_PRESSURE]) {
            Some(RecordKind::BloodPressure)
        } else {
            None
        }
    }
}

/// Blood pressure view of any stored document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BloodPressureProjection {
    pub date: String,
    pub systolic_pressure: String,
    pub diastolic_pressure: String,
}

impl BloodPressureProjection {
    /// Project a document onto the three blood pressure keys.
    ///
    /// Never looks at any other key, so patient documents project to all-empty rows.
    pub fn from_document(document: &Document) -> Self {
        Self {
            date: string_field(document, fields::DATE),
            systolic_pressure: string_field(document, fields::SYSTOLIC_PRESSURE),
            diastolic_pressure: string_field(document, fields::DIASTOLIC_PRESSURE),
        }
    }
}

/// One key/value pair of a stored document, rendered for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentField {
    pub name: String,
    pub value: String,
}

/// A document exactly as it came back from the store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredDocument {
    /// Store-assigned identifier, empty if the document has none
    pub id: String,

    /// Shape of the document, if recognizable
    pub kind: Option<RecordKind>,

    /// Every other field, in stored order
    pub fields: Vec<DocumentField>,
}

impl StoredDocument {
    pub fn new(raw: Document) -> Self {
        let id = raw.get(fields::ID).map(display_bson).unwrap_or_default();
        let kind = Record::classify(&raw);
        let fields = raw
            .iter()
            .filter(|(name, _)| name.as_str() != fields::ID)
            .map(|(name, value)| DocumentField {
                name: name.clone(),
                value: display_bson(value),
            })
            .collect();

        Self { id, kind, fields }
    }

    /// Display value of a field, if present
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }
}

/// Read a string field, substituting an empty string for absent or non-string values
pub fn string_field(document: &Document, key: &str) -> String {
    document.get_str(key).map(str::to_owned).unwrap_or_default()
}

/// Render a BSON value the way a person would type it
pub fn display_bson(value: &Bson) -> String {
    match value {
        Bson::String(s) => s.clone(),
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::Null => String::new(),
        other => other.to_string(),
    }
}
