use actix_web::{web, HttpResponse, Responder};

use crate::contract::model::ContractRecord;
use crate::contract::validation::Validator;
use crate::contract::AssembledContract;
use crate::{AppState, ErrorResponse};

fn pdf_response(document: AssembledContract, disposition: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            "Content-Disposition",
            format!("{}; filename=\"{}\"", disposition, document.filename),
        ))
        .body(document.pdf)
}

fn assemble_checked(state: &web::Data<AppState>, record: &ContractRecord, disposition: &str) -> HttpResponse {
    if let Err(summary) = record.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&summary));
    }

    match state.assembler.assemble(record) {
        Ok(document) => {
            log::info!(
                "Assembled contract PDF {} ({} bytes)",
                document.filename,
                document.pdf.len()
            );
            pdf_response(document, disposition)
        }
        Err(e) => {
            log::error!("Contract PDF assembly failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&e.to_string()))
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Contract Service",
    post,
    path = "/contracts/pdf",
    request_body = ContractRecord,
    responses(
        (status = 200, description = "Contract PDF for download", body = Vec<u8>, content_type = "application/pdf"),
        (status = 400, description = "Record failed validation", body = ErrorResponse),
        (status = 500, description = "Rendering failed", body = ErrorResponse)
    )
)]
pub async fn generate_contract_pdf(
    state: web::Data<AppState>,
    record: web::Json<ContractRecord>,
) -> impl Responder {
    assemble_checked(&state, &record.into_inner(), "attachment")
}

#[utoipa::path(
    context_path = "/api",
    tag = "Contract Service",
    post,
    path = "/contracts/pdf/inline",
    request_body = ContractRecord,
    responses(
        (status = 200, description = "Contract PDF for in-browser viewing or printing", body = Vec<u8>, content_type = "application/pdf"),
        (status = 400, description = "Record failed validation", body = ErrorResponse),
        (status = 500, description = "Rendering failed", body = ErrorResponse)
    )
)]
pub async fn preview_contract_pdf(
    state: web::Data<AppState>,
    record: web::Json<ContractRecord>,
) -> impl Responder {
    assemble_checked(&state, &record.into_inner(), "inline")
}
