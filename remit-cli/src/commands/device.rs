//! Device command - show the device identifier and country.

use anyhow::Result;
use serde_json::json;

use crate::Cli;
use crate::app::App;
use crate::output::emit;

/// Runs the device command.
pub async fn run(cli: &Cli) -> Result<()> {
    let app = App::init(cli)?;
    let device_id = app.device.device_id();
    let country = app.device.device_country(&app.country_resolver()).await;

    let data = json!({
        "device_id": device_id,
        "country": country,
    });
    emit(cli, &data, |t| t.format_device(&device_id, &country))
}
