use petri_dish_data::models::{BloodPressureRecord, PatientRecord, Record};

/// Patient registration form as posted to `/submit`.
///
/// Every field is optional on the wire; absent fields are stored as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientForm {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub cpf: Option<String>,
}

impl PatientForm {
    /// Build the form from decoded key/value pairs. A repeated key keeps its
    /// first value and unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "full_name" => &mut form.full_name,
                "email" => &mut form.email,
                "cpf" => &mut form.cpf,
                _ => continue,
            };
            keep_first(slot, value);
        }
        form
    }

    /// Names of the fields that were absent or blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        missing(&[
            ("full_name", &self.full_name),
            ("email", &self.email),
            ("cpf", &self.cpf),
        ])
    }

    pub fn into_record(self) -> Record {
        Record::Patient(PatientRecord {
            full_name: self.full_name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            cpf: self.cpf.unwrap_or_default(),
        })
    }
}

/// Blood pressure form as posted to `/dashboard/submit`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BloodPressureForm {
    /// Posted as `systolicPressure`
    pub systolic_pressure: Option<String>,

    /// Posted as `diastolicPressure`
    pub diastolic_pressure: Option<String>,
}

impl BloodPressureForm {
    /// Build the form from decoded key/value pairs, first value wins
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "systolicPressure" => &mut form.systolic_pressure,
                "diastolicPressure" => &mut form.diastolic_pressure,
                _ => continue,
            };
            keep_first(slot, value);
        }
        form
    }

    /// Names of the fields that were absent or blank, as named on the form
    pub fn missing_fields(&self) -> Vec<&'static str> {
        missing(&[
            ("systolicPressure", &self.systolic_pressure),
            ("diastolicPressure", &self.diastolic_pressure),
        ])
    }

    /// The form has no date input, so the stored reading has no date either.
    pub fn into_record(self) -> Record {
        Record::BloodPressure(BloodPressureRecord {
            date: None,
            systolic_pressure: self.systolic_pressure.unwrap_or_default(),
            diastolic_pressure: self.diastolic_pressure.unwrap_or_default(),
        })
    }
}

fn keep_first(slot: &mut Option<String>, value: impl Into<String>) {
    if slot.is_none() {
        *slot = Some(value.into());
    }
}

fn missing(fields: &[(&'static str, &Option<String>)]) -> Vec<&'static str> {
    fields
        .iter()
        .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
        .map(|(name, _)| *name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use petri_dish_data::bson::doc;

    #[test]
    fn test_complete_patient_form() {
        let form = PatientForm {
            full_name: Some("Ana Silva".to_string()),
            email: Some("ana@example.com".to_string()),
            cpf: Some("12345678900".to_string()),
        };

        assert!(form.missing_fields().is_empty());
        assert_eq!(
            form.into_record().to_document(),
            doc! { "full_name": "Ana Silva", "email": "ana@example.com", "cpf": "12345678900" }
        );
    }

    #[test]
    fn test_absent_patient_fields_become_empty_strings() {
        let form = PatientForm {
            full_name: Some("Ana Silva".to_string()),
            email: None,
            cpf: Some("  ".to_string()),
        };

        assert_eq!(form.missing_fields(), vec!["email", "cpf"]);
        let document = form.into_record().to_document();
        assert_eq!(document.get_str("email").unwrap(), "");
        assert_eq!(document.get_str("cpf").unwrap(), "  ");
    }

    #[test]
    fn test_repeated_key_keeps_first_value() {
        let form = PatientForm::from_pairs([
            ("full_name", "Ana Silva"),
            ("cpf", "123"),
            ("email", "ana@example.com"),
            ("cpf", "456"),
            ("unexpected", "ignored"),
        ]);

        assert_eq!(form.full_name.as_deref(), Some("Ana Silva"));
        assert_eq!(form.email.as_deref(), Some("ana@example.com"));
        assert_eq!(form.cpf.as_deref(), Some("123"));
    }

    #[test]
    fn test_blood_pressure_pairs_use_posted_names() {
        let form = BloodPressureForm::from_pairs([
            ("systolicPressure", "120"),
            ("systolic_pressure", "999"),
        ]);

        assert_eq!(form.systolic_pressure.as_deref(), Some("120"));
        assert_eq!(form.diastolic_pressure, None);
        assert_eq!(form.missing_fields(), vec!["diastolicPressure"]);
    }

    #[test]
    fn test_blood_pressure_form_never_writes_date() {
        let form = BloodPressureForm {
            systolic_pressure: Some("120".to_string()),
            diastolic_pressure: None,
        };

        assert_eq!(form.missing_fields(), vec!["diastolicPressure"]);
        assert_eq!(
            form.into_record().to_document(),
            doc! { "systolic_pressure": "120", "diastolic_pressure": "" }
        );
    }
}
