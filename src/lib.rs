use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use env_logger::Env;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod contract;
pub mod phone;
pub mod whatsapp;

use crate::contract::ContractAssembler;
use crate::whatsapp::{NotificationDispatcher, WhatsAppConfig};

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }

    pub fn bad_gateway(message: &str) -> Self {
        Self::new("BadGateway", message)
    }
}

/// Shared application services: the PDF assembler and the WhatsApp dispatcher.
///
/// Both are stateless between requests; no interior mutability is needed.
pub struct AppState {
    pub assembler: ContractAssembler,
    pub dispatcher: NotificationDispatcher,
}

impl AppState {
    pub fn new(config: WhatsAppConfig) -> Self {
        Self {
            assembler: ContractAssembler::new(),
            dispatcher: NotificationDispatcher::new(config),
        }
    }

    /// Assemble the state from prebuilt services, used by tests to inject
    /// fake transports and clocks.
    pub fn with_parts(assembler: ContractAssembler, dispatcher: NotificationDispatcher) -> Self {
        Self {
            assembler,
            dispatcher,
        }
    }
}

/// Register the API routes; shared between the server and the handler tests.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/contracts/pdf")
            .route(web::post().to(contract::handlers::generate_contract_pdf)),
    )
    .service(
        web::resource("/contracts/pdf/inline")
            .route(web::post().to(contract::handlers::preview_contract_pdf)),
    )
    .service(
        web::resource("/contracts/{id}/notify")
            .route(web::post().to(whatsapp::handlers::notify_contract)),
    )
    .service(
        web::resource("/whatsapp/state").route(web::get().to(whatsapp::handlers::instance_state)),
    )
    .service(
        web::resource("/whatsapp/qr").route(web::get().to(whatsapp::handlers::instance_qr_code)),
    )
    .service(
        web::resource("/whatsapp/restart")
            .route(web::post().to(whatsapp::handlers::restart_instance)),
    );
}

pub async fn run() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    #[derive(OpenApi)]
    #[openapi(
        paths(
            crate::contract::handlers::generate_contract_pdf,
            crate::contract::handlers::preview_contract_pdf,
            crate::whatsapp::handlers::notify_contract,
            crate::whatsapp::handlers::instance_state,
            crate::whatsapp::handlers::instance_qr_code,
            crate::whatsapp::handlers::restart_instance
        ),
        components(
            schemas(
                contract::model::ContractRecord,
                whatsapp::handlers::NotifyRequest,
                whatsapp::handlers::NotifyResponse,
                whatsapp::handlers::InstanceStateResponse,
                whatsapp::handlers::QrCodeResponse,
                ErrorResponse,
            )
        ),
        tags(
            (name = "Contract Service", description = "Contract PDF assembly endpoints."),
            (name = "WhatsApp Service", description = "Contract notification and instance endpoints.")
        ),
        servers(
            (url = "https://sistema-rastreamento.com.br", description = "Production server"),
            (url = "http://127.0.0.1:8080", description = "Localhost Staging server")
        )
    )]
    struct ApiDoc;

    dotenvy::dotenv().ok(); // Load .env file
    let whatsapp_config = match WhatsAppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!(
                "Failed to load WhatsApp configuration. Please check your .env. Error: {}",
                e
            );
            std::process::exit(1);
        }
    };
    let app_state = web::Data::new(AppState::new(whatsapp_config));

    let prometheus = PrometheusMetricsBuilder::new("rastreamento_server")
        .endpoint("/metrics")
        .build()
        .expect("Failed to create Prometheus metrics middleware");

    log::info!("Starting server at http://0.0.0.0:8080");

    HttpServer::new(move || {
        let app_state = app_state.clone();
        let prometheus = prometheus.clone();
        let cors = Cors::default()
            .allowed_origin("https://sistema-rastreamento.com.br")
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://127.0.0.1:8080")
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::ACCEPT,
                header::CONTENT_TYPE,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(app_state)
            .service(web::scope("/api").configure(configure_api))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind(("0.0.0.0", 8080))?
    .run()
    .await
}
