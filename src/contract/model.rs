use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{
    validate_document, validate_email, validate_imei, validate_license_plate,
    validate_local_phone, validate_postal_code, validate_required, ValidationErrors, Validator,
};

/// A digital tracking-service agreement as submitted by the front end.
///
/// All fields are plain strings; the record is never mutated after it reaches
/// the assembler. Blank date fields are filled from the injected clock at
/// assembly time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContractRecord {
    /// CPF (11 digits) or CNPJ (14 digits), with or without punctuation.
    pub document: String,
    pub name: String,
    pub email: String,
    pub phone: String,

    pub street: String,
    pub number: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,

    pub vehicle_model: String,
    pub license_plate: String,
    pub tracker_model: String,
    /// Tracker IMEI, 15 digits.
    pub imei: String,

    /// Locale-formatted issue date (`dd/mm/yyyy`); blank means "today".
    #[serde(default)]
    pub registration_date: String,
    pub installation_location: String,

    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub signature_date: Option<String>,
    #[serde(default)]
    pub geolocation: Option<String>,
}

impl Validator for ContractRecord {
    /// Validate all fields the front end is expected to have filled in.
    ///
    /// Signature fields are deliberately not checked: a contract is assembled
    /// both before and after signature capture.
    fn validate(&self) -> Result<(), String> {
        let mut errors = ValidationErrors::new();

        validate_required(&self.name, "name", "Nome", &mut errors);
        validate_document(&self.document, "document", &mut errors);
        validate_email(&self.email, "email", &mut errors);
        validate_local_phone(&self.phone, "phone", &mut errors);

        validate_required(&self.street, "street", "Rua", &mut errors);
        validate_required(&self.number, "number", "Número", &mut errors);
        validate_required(&self.neighborhood, "neighborhood", "Bairro", &mut errors);
        validate_required(&self.city, "city", "Cidade", &mut errors);
        validate_required(&self.state, "state", "Estado", &mut errors);
        validate_postal_code(&self.zip_code, "zipCode", &mut errors);

        validate_required(
            &self.vehicle_model,
            "vehicleModel",
            "Modelo do Veículo",
            &mut errors,
        );
        validate_license_plate(&self.license_plate, "licensePlate", &mut errors);
        validate_required(
            &self.tracker_model,
            "trackerModel",
            "Modelo do Rastreador",
            &mut errors,
        );
        validate_imei(&self.imei, "imei", &mut errors);

        validate_required(
            &self.installation_location,
            "installationLocation",
            "Local de Instalação",
            &mut errors,
        );

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_record() -> ContractRecord {
        ContractRecord {
            document: "123.456.789-09".to_string(),
            name: "Maria Silva".to_string(),
            email: "maria@example.com".to_string(),
            phone: "(11) 98765-4321".to_string(),
            street: "Rua das Flores".to_string(),
            number: "42".to_string(),
            neighborhood: "Centro".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
            zip_code: "01234-567".to_string(),
            vehicle_model: "Fiat Uno".to_string(),
            license_plate: "ABC1D23".to_string(),
            tracker_model: "GT06".to_string(),
            imei: "490154203237518".to_string(),
            registration_date: String::new(),
            installation_location: "Oficina Central".to_string(),
            ip_address: None,
            signature_date: None,
            geolocation: None,
        }
    }

    #[test]
    fn filled_record_passes_validation() {
        assert!(Validator::validate(&filled_record()).is_ok());
    }

    #[test]
    fn record_deserializes_from_camel_case() {
        let json = r#"{
            "document": "12345678909",
            "name": "Maria Silva",
            "email": "maria@example.com",
            "phone": "11987654321",
            "street": "Rua das Flores",
            "number": "42",
            "neighborhood": "Centro",
            "city": "São Paulo",
            "state": "SP",
            "zipCode": "01234-567",
            "vehicleModel": "Fiat Uno",
            "licensePlate": "ABC-1234",
            "trackerModel": "GT06",
            "imei": "490154203237518",
            "installationLocation": "Oficina Central"
        }"#;

        let record: ContractRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.zip_code, "01234-567");
        assert_eq!(record.license_plate, "ABC-1234");
        assert!(record.signature_date.is_none());
    }
}
