use biapp_clinical::patient::{PatientDraft, validate_patient};
use biapp_core::models::patient::{Patient, Sex};
use jiff::civil::{Date, date};
use serde_json::json;

const TODAY: Date = date(2025, 6, 15);

fn valid_draft() -> PatientDraft {
    PatientDraft {
        document_number: " 12345678 ".to_string(),
        first_name: "  Ana ".to_string(),
        last_name: "Quispe".to_string(),
        birth_date: "1988-04-02".to_string(),
        sex: Some(Sex::F),
        weight_kg: "61.5".to_string(),
        height_cm: "158".to_string(),
        email: "ana@example.pe".to_string(),
        phone: "987 654 321".to_string(),
        notes: "   ".to_string(),
    }
}

#[test]
fn valid_patient_yields_trimmed_payload() {
    let payload = validate_patient(&valid_draft(), TODAY).unwrap();
    assert_eq!(payload.document_number.as_deref(), Some("12345678"));
    assert_eq!(payload.first_name, "Ana");
    assert_eq!(payload.birth_date, Some(date(1988, 4, 2)));
    assert_eq!(payload.sex, Some(Sex::F));
    assert_eq!(payload.weight_kg, Some(61.5));
    assert_eq!(payload.height_cm, Some(158.0));
    assert_eq!(payload.phone.as_deref(), Some("987 654 321"));
    assert_eq!(payload.notes, None);
}

#[test]
fn minimal_patient_defaults_sex() {
    let draft = PatientDraft {
        first_name: "Luis".to_string(),
        last_name: "Rojas".to_string(),
        ..PatientDraft::default()
    };
    let payload = validate_patient(&draft, TODAY).unwrap();
    assert_eq!(payload.sex, Some(Sex::O));
    assert_eq!(payload.document_number, None);
    assert_eq!(payload.birth_date, None);
    assert_eq!(payload.weight_kg, None);
    assert_eq!(payload.email, None);
}

#[test]
fn each_bad_field_is_reported() {
    let draft = PatientDraft {
        document_number: "1234567".to_string(),
        phone: "9876543210".to_string(),
        email: "ana@example".to_string(),
        weight_kg: "0".to_string(),
        ..valid_draft()
    };
    let errors = validate_patient(&draft, TODAY).unwrap_err();
    assert_eq!(errors.len(), 4, "{errors}");
    assert!(errors.messages[0].contains("8 digits"));
    assert!(errors.messages[1].contains("Weight"));
    assert!(errors.messages[2].contains("e-mail"));
    assert!(errors.messages[3].contains("9 digits"));
}

#[test]
fn names_are_required() {
    let draft = PatientDraft {
        first_name: " ".to_string(),
        last_name: String::new(),
        ..valid_draft()
    };
    let errors = validate_patient(&draft, TODAY).unwrap_err();
    assert_eq!(
        errors.messages,
        vec!["First name is required.", "Last name is required."]
    );
}

#[test]
fn birth_date_rules() {
    let check = |birth: &str| {
        let draft = PatientDraft {
            birth_date: birth.to_string(),
            ..valid_draft()
        };
        validate_patient(&draft, TODAY)
    };

    assert!(check("2025-06-15").is_ok());
    assert!(check("1905-06-15").is_ok());
    assert!(check("2025-06-16").unwrap_err().messages[0].contains("future"));
    assert!(check("1905-06-14").unwrap_err().messages[0].contains("120 years"));
    assert!(check("15/06/1990").unwrap_err().messages[0].contains("not valid"));
}

#[test]
fn measurement_bounds() {
    let check = |weight: &str, height: &str| {
        let draft = PatientDraft {
            weight_kg: weight.to_string(),
            height_cm: height.to_string(),
            ..valid_draft()
        };
        validate_patient(&draft, TODAY)
    };

    assert!(check("400", "30").is_ok());
    assert!(check("0.5", "250").is_ok());
    assert!(check("400.1", "158").is_err());
    assert!(check("70", "29.9").is_err());
    assert!(check("70", "251").is_err());
    let errors = check("heavy", "tall").unwrap_err();
    assert_eq!(
        errors.messages,
        vec!["Weight must be a number.", "Height must be a number."]
    );
}

#[test]
fn stored_patient_round_trips_through_the_form() {
    let patient: Patient = serde_json::from_value(json!({
        "id": 3,
        "document_number": "87654321",
        "first_name": "Rosa",
        "last_name": "Huamán",
        "birth_date": "1979-11-30T00:00:00.000000Z",
        "sex": "F",
        "weight_kg": "70.00",
        "height_cm": 162,
        "email": null,
        "phone": "912345678",
        "notes": null
    }))
    .unwrap();

    let draft = PatientDraft::from_patient(&patient);
    assert_eq!(draft.birth_date, "1979-11-30");
    assert_eq!(draft.weight_kg, "70");
    assert_eq!(draft.email, "");

    let payload = validate_patient(&draft, TODAY).unwrap();
    assert_eq!(payload.last_name, "Huamán");
    assert_eq!(payload.birth_date, Some(date(1979, 11, 30)));
}
