use anyhow::Result;

use trip_spotlight::store::{self, kv, status::CITY_IMAGE_PREFIX};
use trip_spotlight::ui;

use crate::cli::Ctx;
use crate::cli::args::CacheCmd;

pub fn run(ctx: &Ctx, cmd: &CacheCmd) -> Result<()> {
    match cmd {
        CacheCmd::Status => store::status::run(&ctx.store_path),
        CacheCmd::Clear { yes } => clear(ctx, *yes),
    }
}

fn clear(ctx: &Ctx, yes: bool) -> Result<()> {
    let con = ctx.open_store()?;
    let cached = kv::count_prefix(&con, CITY_IMAGE_PREFIX)?;
    if cached == 0 {
        ui::info("No cached city images");
        return Ok(());
    }

    if !yes && !ui::confirm(&format!("Remove {cached} cached city images?"))? {
        ui::info("Nothing changed");
        return Ok(());
    }

    let removed = kv::remove_prefix(&con, CITY_IMAGE_PREFIX)?;
    ui::success(format!("Removed {removed} cached city images"));
    Ok(())
}
