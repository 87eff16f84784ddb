use std::sync::Arc;

use crate::BuildArgs;
use crate::config::Settings;
use crate::freeze::Freezer;
use crate::render::Renderer;

pub fn run(args: &BuildArgs) -> Result<(), anyhow::Error> {
    let config_path = super::resolve_config_path(&args.config_file)?;
    let settings = Arc::new(Settings::load(&config_path)?);

    println!("Freezing site...");
    let renderer = Renderer::new(Arc::clone(&settings))?;
    let summary = Freezer::new(&settings, &renderer).build()?;

    println!(
        "Wrote {} pages, {} documents, {} static files to {}",
        summary.pages,
        summary.documents,
        summary.static_files,
        settings.output_dir().display()
    );

    Ok(())
}
