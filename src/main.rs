use anyhow::Result;
use misi_hijau::app::App;
use misi_hijau::constants::LOOP_TIME;
use misi_hijau::platform;
use tracing::info;

pub fn main() -> Result<()> {
    platform::init_tracing("info")?;

    let mut app = App::new()?;
    info!(loop_time = ?LOOP_TIME, "Starting game loop");

    while app.run() {}
    Ok(())
}
