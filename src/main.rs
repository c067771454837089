use anyhow::Context;
use shelf_app::Storage;
use shelf_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load shelf settings")?;
    shelf_telemetry::init(&settings.telemetry);

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.endpoint(),
        "shelf-app bootstrap starting"
    );

    shelf_app::serve(settings, Storage::Postgres).await
}
