//! Maintenance actions

use anyhow::Result;
use colored::Colorize;
use zapret_platform::require_elevation;
use zapret_platform::service::DRIVER_NAME;

use super::with_service;

/// Kill every winws process
pub async fn stop_winws() -> Result<()> {
    with_service(|service| service.stop_winws()).await?;
    println!("{} winws.exe stopped", "✓".green());
    Ok(())
}

/// Stop and delete the WinDivert driver
pub async fn remove_driver() -> Result<()> {
    require_elevation("remove the driver")?;
    with_service(|service| service.remove_driver()).await?;
    println!("{} {} driver removed", "✓".green(), DRIVER_NAME.cyan());
    Ok(())
}
