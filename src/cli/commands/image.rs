use anyhow::Result;
use rusqlite::Connection;

use trip_spotlight::api::ApiClient;
use trip_spotlight::clock::SystemClock;
use trip_spotlight::images::{
    BackendProvider, ImageCache, ImageProvider, ImageResolver, ResolvedImage, WikipediaProvider,
    placeholder_for,
};
use trip_spotlight::model::AgentTheme;
use trip_spotlight::ui;

use crate::cli::Ctx;

/// Full chain: local cache, Wikipedia, backend proxy.
pub fn resolve(
    ctx: &Ctx,
    con: &Connection,
    client: &ApiClient,
    city: &str,
    country: Option<&str>,
) -> Option<ResolvedImage> {
    let wiki = match WikipediaProvider::new(&ctx.config) {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!(error = %e, "Wikipedia lookups disabled");
            None
        }
    };
    let backend = BackendProvider::new(client);

    let mut resolver = ImageResolver::new(ImageCache::new(con, SystemClock));
    if let Some(w) = &wiki {
        resolver = resolver.with_provider(w as &dyn ImageProvider);
    }
    resolver = resolver.with_provider(&backend);

    resolver.resolve(city, country)
}

pub fn print_resolved(city: &str, image: Option<&ResolvedImage>, theme: Option<AgentTheme>) {
    match image {
        Some(img) => {
            let origin = if img.from_cache { "cache" } else { "fetched" };
            println!("{city}: {} [{} / {origin}]", img.url, img.source);
        }
        None => {
            let p = placeholder_for(theme);
            println!(
                "{city}: {} placeholder (gradient {} → {})",
                p.icon, p.gradient.0, p.gradient.1
            );
        }
    }
}

pub fn run(ctx: &Ctx, city: &str, country: Option<&str>) -> Result<()> {
    let con = ctx.open_store()?;
    let client = ctx.api(&con)?;

    let image = resolve(ctx, &con, &client, city, country);
    if image.is_none() {
        ui::warning(format!("No image found for {city}"));
    }
    print_resolved(city, image.as_ref(), None);
    Ok(())
}
