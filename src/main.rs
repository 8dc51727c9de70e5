#[actix_web::main]
async fn main() -> std::io::Result<()> {
    rastreamento_server::run().await
}
