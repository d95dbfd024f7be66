use std::{error::Error, net::SocketAddr, sync::Arc};

use clientela::{infrastructure::customer::MySqlCustomerRepository, AppConfig};
use clientela_web::routes;
use tracing::{error, info, Level};

#[tokio::main]
async fn main() {
    match AppConfig::load() {
        Ok(config) => {
            tracing_subscriber::fmt()
                .with_max_level(Level::from(&config.logger.level))
                .init();
            if let Err(error) = serve(&config).await {
                error!("application error: {}", error);
            }
        }
        Err(error) => {
            tracing_subscriber::fmt::init();
            error!("application error: {}", error)
        }
    }
}

async fn serve(config: &AppConfig) -> Result<(), Box<dyn Error>> {
    let repository = MySqlCustomerRepository::connect(&config.database).await?;
    let app = routes::router(Arc::new(repository));
    let addr: SocketAddr = config.http.listen.parse()?;
    info!("listening on {}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
