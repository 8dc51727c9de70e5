use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::DispatchError;
use crate::{AppState, ErrorResponse};

#[derive(Debug, Deserialize, ToSchema)]
pub struct NotifyRequest {
    /// Recipient phone number; formatting characters and a missing country
    /// code are tolerated.
    pub phone: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotifyResponse {
    pub status: String,
    pub attempts: u32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InstanceStateResponse {
    pub connected: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QrCodeResponse {
    /// QR payload, or a URL where the code can be fetched.
    pub qrcode: String,
}

#[utoipa::path(
    context_path = "/api",
    tag = "WhatsApp Service",
    post,
    path = "/contracts/{id}/notify",
    request_body = NotifyRequest,
    params(
        ("id" = String, Path, description = "Contract identifier embedded in the message")
    ),
    responses(
        (status = 200, description = "Notification delivered", body = NotifyResponse),
        (status = 400, description = "Invalid phone number", body = ErrorResponse),
        (status = 502, description = "Delivery failed after all attempts", body = ErrorResponse)
    )
)]
pub async fn notify_contract(
    state: web::Data<AppState>,
    path: web::Path<String>,
    request: web::Json<NotifyRequest>,
) -> impl Responder {
    let contract_id = path.into_inner();

    match state
        .dispatcher
        .send_contract_notification(&request.phone, &contract_id)
        .await
    {
        Ok(delivery) => HttpResponse::Ok().json(NotifyResponse {
            status: "sent".to_string(),
            attempts: delivery.attempts,
        }),
        Err(DispatchError::InvalidPhoneNumber(_)) => HttpResponse::BadRequest().json(
            ErrorResponse::bad_request("Número de telefone inválido. Formato esperado: 5511987654321"),
        ),
        Err(e @ DispatchError::DeliveryFailed { .. }) => {
            HttpResponse::BadGateway().json(ErrorResponse::bad_gateway(&e.to_string()))
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "WhatsApp Service",
    get,
    path = "/whatsapp/state",
    responses(
        (status = 200, description = "Connection state of the messaging instance", body = InstanceStateResponse),
        (status = 502, description = "Messaging API unreachable", body = ErrorResponse)
    )
)]
pub async fn instance_state(state: web::Data<AppState>) -> impl Responder {
    match state.dispatcher.connection_state().await {
        Ok(connected) => HttpResponse::Ok().json(InstanceStateResponse { connected }),
        Err(e) => {
            log::error!("WhatsApp connection state check failed: {}", e);
            HttpResponse::BadGateway().json(ErrorResponse::bad_gateway(&e))
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "WhatsApp Service",
    get,
    path = "/whatsapp/qr",
    responses(
        (status = 200, description = "Pairing QR code for the messaging instance", body = QrCodeResponse),
        (status = 502, description = "QR code refused or API unreachable", body = ErrorResponse)
    )
)]
pub async fn instance_qr_code(state: web::Data<AppState>) -> impl Responder {
    match state.dispatcher.qr_code().await {
        Ok(Some(qrcode)) => HttpResponse::Ok().json(QrCodeResponse { qrcode }),
        Ok(None) => HttpResponse::BadGateway().json(ErrorResponse::bad_gateway(
            "A API de mensagens recusou a geração do QR code",
        )),
        Err(e) => {
            log::error!("WhatsApp QR code request failed: {}", e);
            HttpResponse::BadGateway().json(ErrorResponse::bad_gateway(&e))
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "WhatsApp Service",
    post,
    path = "/whatsapp/restart",
    responses(
        (status = 200, description = "Instance restart accepted"),
        (status = 502, description = "Restart rejected or API unreachable", body = ErrorResponse)
    )
)]
pub async fn restart_instance(state: web::Data<AppState>) -> impl Responder {
    match state.dispatcher.restart_instance().await {
        Ok(true) => HttpResponse::Ok().finish(),
        Ok(false) => HttpResponse::BadGateway().json(ErrorResponse::bad_gateway(
            "A API de mensagens recusou o reinício da instância",
        )),
        Err(e) => {
            log::error!("WhatsApp instance restart failed: {}", e);
            HttpResponse::BadGateway().json(ErrorResponse::bad_gateway(&e))
        }
    }
}
