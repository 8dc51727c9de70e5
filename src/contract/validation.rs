//! Field validation for contract records.
//!
//! Mirrors the checks the front end applies while typing, so a hand-crafted
//! request cannot reach the assembler with unusable data. Messages are in
//! Portuguese because they are shown to the operator as-is.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref POSTAL_CODE: Regex = Regex::new(r"^\d{5}-?\d{3}$").unwrap();
    // Old format ABC-1234 and Mercosul format ABC1D23.
    static ref PLATE_OLD: Regex = Regex::new(r"^[A-Z]{3}-?\d{4}$").unwrap();
    static ref PLATE_MERCOSUL: Regex = Regex::new(r"^[A-Z]{3}\d[A-Z]\d{2}$").unwrap();
}

/// Trait for request types that can be validated before use.
pub trait Validator {
    /// Validate the state of the object.
    fn validate(&self) -> Result<(), String>;
}

/// Validation failure for a single field.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The wire name of the field that failed
    pub field: String,
    /// Human-readable message in Portuguese
    pub message: String,
    /// Suggestion for how to fix the error
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn empty_field(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} não pode ficar em branco", label)).with_suggestion(format!(
            "Preencha o campo {} com um valor válido",
            label.to_lowercase()
        ))
    }

    pub fn invalid_document(field: &str) -> Self {
        Self::new(field, "CPF/CNPJ deve ter 11 ou 14 dígitos")
            .with_suggestion("Confira o documento, exemplo: 123.456.789-09")
    }

    pub fn invalid_email(field: &str) -> Self {
        Self::new(field, "Email inválido")
            .with_suggestion("Use o formato nome@dominio.com")
    }

    pub fn invalid_phone(field: &str) -> Self {
        Self::new(field, "Telefone deve ter 10 ou 11 dígitos com DDD")
            .with_suggestion("Exemplo: (11) 98765-4321")
    }

    pub fn invalid_postal_code(field: &str) -> Self {
        Self::new(field, "CEP inválido").with_suggestion("Use o formato 01234-567")
    }

    pub fn invalid_license_plate(field: &str) -> Self {
        Self::new(field, "Placa inválida")
            .with_suggestion("Use o formato antigo ABC-1234 ou Mercosul ABC1D23")
    }

    pub fn invalid_imei(field: &str) -> Self {
        Self::new(field, "IMEI deve ter exatamente 15 dígitos")
            .with_suggestion("O IMEI está impresso na etiqueta do rastreador")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors with formatted output.
#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Numbered summary suitable for an HTTP 400 body.
    pub fn summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }

        let mut parts = vec![format!(
            "Validação falhou: {} erro(s) encontrado(s)\n",
            self.errors.len()
        )];

        for (i, error) in self.errors.iter().enumerate() {
            parts.push(format!("{}. {}", i + 1, error));
        }

        parts.join("\n")
    }

    /// Convert to Result - Ok if no errors, Err with the summary otherwise.
    pub fn into_result(self) -> Result<(), String> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.summary())
        }
    }
}

fn digits_of(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Validate that a string is not empty after trimming.
pub fn validate_required(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::empty_field(field, label));
    }
}

/// Validate CPF (11 digits) or CNPJ (14 digits), punctuation ignored.
pub fn validate_document(value: &str, field: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::empty_field(field, "CPF/CNPJ"));
        return;
    }

    let digits = digits_of(value);
    if digits.len() != 11 && digits.len() != 14 {
        errors.add(ValidationError::invalid_document(field));
    }
}

pub fn validate_email(value: &str, field: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::empty_field(field, "Email"));
        return;
    }

    if !EMAIL.is_match(value.trim()) {
        errors.add(ValidationError::invalid_email(field));
    }
}

/// Validate a local phone number: 10 or 11 digits including the area code.
///
/// The country code is not required here; the dispatcher normalizes to
/// international form on its own.
pub fn validate_local_phone(value: &str, field: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::empty_field(field, "Telefone"));
        return;
    }

    let digits = digits_of(value);
    if digits.len() < 10 || digits.len() > 11 {
        errors.add(ValidationError::invalid_phone(field));
    }
}

pub fn validate_postal_code(value: &str, field: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::empty_field(field, "CEP"));
        return;
    }

    if !POSTAL_CODE.is_match(value.trim()) {
        errors.add(ValidationError::invalid_postal_code(field));
    }
}

pub fn validate_license_plate(value: &str, field: &str, errors: &mut ValidationErrors) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(ValidationError::empty_field(field, "Placa"));
        return;
    }

    if !PLATE_OLD.is_match(trimmed) && !PLATE_MERCOSUL.is_match(trimmed) {
        errors.add(ValidationError::invalid_license_plate(field));
    }
}

/// Validate IMEI format (15 digits), punctuation ignored.
pub fn validate_imei(value: &str, field: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::empty_field(field, "IMEI"));
        return;
    }

    if digits_of(value).len() != 15 {
        errors.add(ValidationError::invalid_imei(field));
    }
}
