//! Contract document assembly.
//!
//! Lays a `ContractRecord` out on a single A4 page at fixed coordinates:
//! title, issue date, client block, vehicle block, tracker block, the
//! standard five contract clauses, and the signature block. The template
//! assumes the content fits the page; overly long values clip.

use std::sync::Arc;

use super::common::{format_brazilian_date, sanitize_filename, Clock, SystemClock};
use super::model::ContractRecord;
use super::pdf::{Face, PageBuilder};
use super::{AssembleError, AssembledContract};

const TITLE: &str = "CONTRATO DE PRESTAÇÃO DE SERVIÇOS DE RASTREAMENTO VEICULAR";

const TERMS: [&str; 5] = [
    "1. O presente contrato tem por objeto a prestação de serviços de rastreamento veicular.",
    "2. O serviço será prestado através do rastreador instalado no veículo descrito acima.",
    "3. O CONTRATANTE compromete-se a manter seus dados cadastrais atualizados.",
    "4. O prazo de vigência do presente contrato é de 12 (doze) meses, renovável por igual período.",
    "5. O valor do serviço será cobrado mensalmente, conforme plano contratado.",
];

// Light gray used for the separator and signature rules.
const RULE_GRAY: u8 = 210;

/// Renders contract records into the standard agreement document.
pub struct ContractAssembler {
    clock: Arc<dyn Clock>,
}

impl Default for ContractAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl ContractAssembler {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Build an assembler with an explicit clock, used by tests to pin the
    /// fallback dates.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Assemble the contract document. Pure with respect to its input; the
    /// clock is only consulted for date fields left blank on the record.
    pub fn assemble(&self, contract: &ContractRecord) -> Result<AssembledContract, AssembleError> {
        let today = format_brazilian_date(self.clock.today());

        let issue_date = if contract.registration_date.trim().is_empty() {
            today.clone()
        } else {
            contract.registration_date.trim().to_string()
        };
        let signature_date = contract
            .signature_date
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| today.clone());

        let mut page = PageBuilder::new();

        page.text_centered(105.0, 20.0, 16.0, Face::Bold, TITLE);
        page.text_centered(
            105.0,
            30.0,
            10.0,
            Face::Regular,
            &format!("Data de Emissão: {issue_date}"),
        );
        page.line(20.0, 35.0, 190.0, 35.0, RULE_GRAY);

        page.text(20.0, 45.0, 14.0, Face::Bold, "Dados do Cliente:");
        page.text(20.0, 55.0, 10.0, Face::Regular, &format!("Nome: {}", contract.name));
        page.text(
            20.0,
            62.0,
            10.0,
            Face::Regular,
            &format!("CPF/CNPJ: {}", contract.document),
        );
        page.text(
            20.0,
            69.0,
            10.0,
            Face::Regular,
            &format!("Telefone: {}", contract.phone),
        );
        page.text(
            20.0,
            76.0,
            10.0,
            Face::Regular,
            &format!("Email: {}", contract.email),
        );
        page.text(
            20.0,
            83.0,
            10.0,
            Face::Regular,
            &format!(
                "Endereço: {}, {}, {}, {} - {}, {}",
                contract.street,
                contract.number,
                contract.neighborhood,
                contract.city,
                contract.state,
                contract.zip_code
            ),
        );

        page.text(20.0, 98.0, 14.0, Face::Bold, "Dados do Veículo:");
        page.text(
            20.0,
            108.0,
            10.0,
            Face::Regular,
            &format!("Modelo: {}", contract.vehicle_model),
        );
        page.text(
            20.0,
            115.0,
            10.0,
            Face::Regular,
            &format!("Placa: {}", contract.license_plate),
        );

        page.text(20.0, 130.0, 14.0, Face::Bold, "Dados do Rastreador:");
        page.text(
            20.0,
            140.0,
            10.0,
            Face::Regular,
            &format!("Modelo: {}", contract.tracker_model),
        );
        page.text(
            20.0,
            147.0,
            10.0,
            Face::Regular,
            &format!("IMEI: {}", contract.imei),
        );
        page.text(
            20.0,
            154.0,
            10.0,
            Face::Regular,
            &format!("Local de Instalação: {}", contract.installation_location),
        );

        page.text(20.0, 169.0, 14.0, Face::Bold, "Termos e Condições:");
        let mut y = 179.0;
        for clause in TERMS {
            page.text(20.0, y, 9.0, Face::Regular, clause);
            y += 7.0;
        }

        page.text(20.0, 220.0, 14.0, Face::Bold, "Assinatura:");
        page.text(
            20.0,
            230.0,
            10.0,
            Face::Regular,
            &format!("Data: {signature_date}"),
        );
        if let Some(ip) = contract.ip_address.as_deref().filter(|s| !s.trim().is_empty()) {
            page.text(
                20.0,
                237.0,
                10.0,
                Face::Regular,
                &format!("IP do Assinante: {ip}"),
            );
        }
        if let Some(geo) = contract.geolocation.as_deref().filter(|s| !s.trim().is_empty()) {
            page.text(
                20.0,
                244.0,
                10.0,
                Face::Regular,
                &format!("Localização: {geo}"),
            );
        }

        page.line(20.0, 260.0, 100.0, 260.0, RULE_GRAY);
        page.text_centered(60.0, 270.0, 10.0, Face::Regular, &contract.name);

        let pdf = page.into_document(self.clock.today())?;
        let filename = format!(
            "contrato-{}.pdf",
            sanitize_filename(&contract.name, "contrato")
        );

        Ok(AssembledContract {
            filename,
            pdf,
            issue_date,
        })
    }
}
