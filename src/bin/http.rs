#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use class_schedule::{
        ClassCatalog, Settings, http_api,
        persistence::{load_catalog_from_csv, load_catalog_from_json},
        telemetry,
    };

    let settings = Settings::load()?;
    telemetry::init(&settings.log.level);
    let addr = settings.http_addr()?;

    let catalog = match settings.storage.path.as_deref() {
        Some(path) if path.exists() => {
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if is_csv {
                load_catalog_from_csv(path)?
            } else {
                load_catalog_from_json(path)?
            }
        }
        _ => ClassCatalog::new(),
    };

    println!("class-schedule HTTP API listening on http://{addr}");
    http_api::serve(addr, catalog).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
