#[actix_web::main]
async fn main() -> std::io::Result<()> {
    seo_fruit_lib::run().await
}
