use std::net::SocketAddr;
use std::sync::Arc;

use crate::ServeArgs;
use crate::config::Settings;
use crate::render::Renderer;
use crate::server::{self, App};

pub async fn run(args: &ServeArgs) -> Result<(), anyhow::Error> {
    let config_path = super::resolve_config_path(&args.config_file)?;
    let settings = Arc::new(Settings::load(&config_path)?);

    let renderer = Renderer::new(Arc::clone(&settings))?;
    let app = Arc::new(App {
        settings: Arc::clone(&settings),
        renderer,
    });
    let router = server::router(app);

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    let display_host = if args.bind == "0.0.0.0" {
        "localhost"
    } else {
        &args.bind
    };

    println!("Serving {} at http://{}:{}", settings.site.title, display_host, args.port);
    println!("Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
