mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use common::sample_contract;
use lopdf::Document;
use rastreamento_server::contract::common::FixedClock;
use rastreamento_server::contract::ContractAssembler;

fn pinned_assembler() -> ContractAssembler {
    let date = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
    ContractAssembler::with_clock(Arc::new(FixedClock(date)))
}

fn extract_text(pdf: &[u8]) -> String {
    let document = Document::load_mem(pdf).expect("output must parse as PDF");
    document.extract_text(&[1]).expect("page text must decode")
}

#[test]
fn output_is_a_pdf() {
    let result = pinned_assembler().assemble(&sample_contract()).unwrap();
    assert!(result.pdf.starts_with(b"%PDF"));
    assert_eq!(result.filename, "contrato-maria-silva.pdf");
}

#[test]
fn assembly_is_deterministic() {
    let assembler = pinned_assembler();
    let record = sample_contract();

    let first = assembler.assemble(&record).unwrap();
    let second = assembler.assemble(&record).unwrap();
    assert_eq!(first.pdf, second.pdf);
}

#[test]
fn key_fields_are_extractable_from_the_rendered_page() {
    let record = sample_contract();
    let result = pinned_assembler().assemble(&record).unwrap();
    let text = extract_text(&result.pdf);

    assert!(text.contains(&record.name), "missing name");
    assert!(text.contains(&record.document), "missing document");
    assert!(text.contains(&record.license_plate), "missing plate");
    assert!(text.contains(&record.imei), "missing IMEI");
}

#[test]
fn blank_dates_fall_back_to_the_injected_clock() {
    let record = sample_contract();
    assert!(record.registration_date.is_empty());
    assert!(record.signature_date.is_none());

    let result = pinned_assembler().assemble(&record).unwrap();
    assert_eq!(result.issue_date, "15/03/2026");

    let text = extract_text(&result.pdf);
    assert!(text.contains("15/03/2026"), "{text}");
}

#[test]
fn explicit_dates_are_kept() {
    let mut record = sample_contract();
    record.registration_date = "01/02/2025".to_string();
    record.signature_date = Some("02/02/2025".to_string());

    let result = pinned_assembler().assemble(&record).unwrap();
    assert_eq!(result.issue_date, "01/02/2025");

    let text = extract_text(&result.pdf);
    assert!(text.contains("01/02/2025"));
    assert!(text.contains("02/02/2025"));
}

#[test]
fn unsigned_contract_omits_signature_metadata() {
    let record = sample_contract();
    let result = pinned_assembler().assemble(&record).unwrap();
    let text = extract_text(&result.pdf);

    assert!(!text.contains("IP do Assinante"));
    assert!(text.contains("Assinatura"));
}

#[test]
fn signed_contract_includes_ip_and_geolocation() {
    let mut record = sample_contract();
    record.ip_address = Some("203.0.113.7".to_string());
    record.geolocation = Some("Sao Paulo, SP, Brazil".to_string());

    let result = pinned_assembler().assemble(&record).unwrap();
    let text = extract_text(&result.pdf);

    assert!(text.contains("203.0.113.7"));
    assert!(text.contains("Sao Paulo, SP, Brazil"));
}

#[test]
fn empty_name_falls_back_in_the_filename() {
    let mut record = sample_contract();
    record.name = String::new();

    let result = pinned_assembler().assemble(&record).unwrap();
    assert_eq!(result.filename, "contrato-contrato.pdf");
}
