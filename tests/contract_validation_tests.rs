mod common;

use common::sample_contract;
use rastreamento_server::contract::validation::{
    validate_document, validate_imei, validate_license_plate, validate_postal_code,
    ValidationErrors, Validator,
};

#[test]
fn sample_record_is_valid() {
    assert!(sample_contract().validate().is_ok());
}

#[test]
fn blank_name_is_reported_with_the_field_tag() {
    let mut record = sample_contract();
    record.name = "   ".to_string();

    let summary = record.validate().unwrap_err();
    assert!(summary.contains("[name]"), "{summary}");
    assert!(summary.contains("1 erro(s)"), "{summary}");
}

#[test]
fn multiple_failures_are_numbered() {
    let mut record = sample_contract();
    record.name.clear();
    record.imei = "123".to_string();
    record.license_plate = "XYZ".to_string();

    let summary = record.validate().unwrap_err();
    assert!(summary.contains("3 erro(s)"), "{summary}");
    assert!(summary.contains("1. "), "{summary}");
    assert!(summary.contains("3. "), "{summary}");
}

#[test]
fn document_accepts_cpf_and_cnpj_digit_counts() {
    for (value, ok) in [
        ("123.456.789-09", true),
        ("12345678909", true),
        ("12.345.678/0001-95", true),
        ("1234567890", false),
        ("123456789012345", false),
    ] {
        let mut errors = ValidationErrors::new();
        validate_document(value, "document", &mut errors);
        assert_eq!(errors.is_empty(), ok, "{value}");
    }
}

#[test]
fn license_plate_accepts_both_formats() {
    for (value, ok) in [
        ("ABC-1234", true),
        ("ABC1234", true),
        ("ABC1D23", true),
        ("AB-1234", false),
        ("abc1d23", false),
        ("ABC12345", false),
    ] {
        let mut errors = ValidationErrors::new();
        validate_license_plate(value, "licensePlate", &mut errors);
        assert_eq!(errors.is_empty(), ok, "{value}");
    }
}

#[test]
fn imei_requires_fifteen_digits() {
    let mut errors = ValidationErrors::new();
    validate_imei("490154203237518", "imei", &mut errors);
    assert!(errors.is_empty());

    let mut errors = ValidationErrors::new();
    validate_imei("49015420323751", "imei", &mut errors);
    assert_eq!(errors.len(), 1);
}

#[test]
fn postal_code_accepts_optional_dash() {
    for (value, ok) in [("01234-567", true), ("01234567", true), ("0123-4567", false)] {
        let mut errors = ValidationErrors::new();
        validate_postal_code(value, "zipCode", &mut errors);
        assert_eq!(errors.is_empty(), ok, "{value}");
    }
}

#[test]
fn signature_fields_are_not_required() {
    let mut record = sample_contract();
    record.ip_address = None;
    record.signature_date = None;
    record.geolocation = None;
    assert!(record.validate().is_ok());
}
