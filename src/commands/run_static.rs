use std::net::SocketAddr;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::RunStaticArgs;
use crate::config::Settings;

pub async fn run(args: &RunStaticArgs) -> Result<(), anyhow::Error> {
    let config_path = super::resolve_config_path(&args.config_file)?;
    let settings = Settings::load(&config_path)?;

    let output_dir = settings.output_dir();
    anyhow::ensure!(
        output_dir.is_dir(),
        "no static build at {}; run `quill build` first",
        output_dir.display()
    );

    // Frozen pages live at {url}/index.html; unmatched paths get the frozen
    // 404 page.
    let serve_dir = ServeDir::new(&output_dir)
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new(output_dir.join("404.html")));
    let app = Router::new().fallback_service(serve_dir);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let display_host = if args.host == "0.0.0.0" {
        "localhost"
    } else {
        &args.host
    };

    println!(
        "Serving static build from {} at http://{}:{}",
        output_dir.display(),
        display_host,
        args.port
    );
    println!("Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
