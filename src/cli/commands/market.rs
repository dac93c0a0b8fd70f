use anyhow::{Context, Result};

use trip_spotlight::api::types::{MarketplaceQuery, MarketplaceRoute, PublishRequest};
use trip_spotlight::ui;

use crate::cli::Ctx;
use crate::cli::args::MarketCmd;
use crate::cli::color::Colors;
use crate::cli::formatting::truncate_ellipsis;

pub fn run(ctx: &Ctx, cmd: &MarketCmd) -> Result<()> {
    match cmd {
        MarketCmd::List {
            search,
            theme,
            page,
            limit,
        } => list(
            ctx,
            MarketplaceQuery {
                search: search.clone(),
                theme: *theme,
                page: Some(*page),
                limit: Some(*limit),
            },
        ),
        MarketCmd::Show { slug } => show(ctx, slug),
        MarketCmd::Clone { slug } => clone(ctx, slug),
        MarketCmd::Publish {
            route_id,
            title,
            description,
        } => publish(ctx, route_id, title, description.as_deref()),
    }
}

pub fn summary_line(r: &MarketplaceRoute) -> String {
    let rating = r
        .rating
        .map(|x| format!("★ {x:.1}"))
        .unwrap_or_else(|| "★ -".into());
    format!(
        "{:<24} {:<34} {} → {}  {}  ({} clones)",
        truncate_ellipsis(&r.slug, 24),
        truncate_ellipsis(&r.title, 34),
        r.origin,
        r.destination,
        rating,
        r.clone_count
    )
}

fn list(ctx: &Ctx, query: MarketplaceQuery) -> Result<()> {
    let con = ctx.open_store()?;
    let client = ctx.api(&con)?;

    let out = client
        .marketplace_routes(&query)
        .context("Unable to load the marketplace")?;

    if out.routes.is_empty() {
        ui::info("No routes match");
        return Ok(());
    }
    for r in &out.routes {
        println!("{}", summary_line(r));
    }
    println!();
    println!(
        "Page {} · {} of {} routes",
        out.page.max(1),
        out.routes.len(),
        out.total
    );
    Ok(())
}

fn show(ctx: &Ctx, slug: &str) -> Result<()> {
    let con = ctx.open_store()?;
    let client = ctx.api(&con)?;

    let r = client
        .marketplace_route(slug)
        .with_context(|| format!("Unable to load route '{slug}'"))?;
    let c = Colors::stdout();

    println!("{}", c.info(&r.title));
    println!(
        "{} → {}",
        c.origin(&r.origin),
        c.destination(&r.destination)
    );
    if let Some(d) = &r.description {
        println!("{d}");
    }
    if !r.themes.is_empty() {
        println!("{}", c.dim(format!("themes: {}", r.themes.join(", "))));
    }
    for v in &r.variants {
        let names: Vec<&str> = v.waypoints.iter().map(|w| w.name.as_str()).collect();
        println!("  {:<13} {}", v.agent.label(), names.join(" → "));
    }
    Ok(())
}

fn clone(ctx: &Ctx, slug: &str) -> Result<()> {
    let con = ctx.open_store()?;
    let client = ctx.authed_api(&con)?;

    let saved = client
        .clone_route(slug)
        .with_context(|| format!("Unable to clone '{slug}'"))?;
    ui::success(format!("Cloned into your routes (id {})", saved.id));
    Ok(())
}

fn publish(ctx: &Ctx, route_id: &str, title: &str, description: Option<&str>) -> Result<()> {
    let con = ctx.open_store()?;
    let client = ctx.authed_api(&con)?;

    let r = client
        .publish_route(&PublishRequest {
            route_id: route_id.to_string(),
            title: title.trim().to_string(),
            description: description.map(str::to_string),
        })
        .with_context(|| format!("Unable to publish route {route_id}"))?;
    ui::success(format!("Published as '{}'", r.slug));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_handles_missing_rating() {
        let r = MarketplaceRoute {
            slug: "paris-barcelona-food".into(),
            title: "Eat your way south".into(),
            description: None,
            origin: "Paris".into(),
            destination: "Barcelona".into(),
            themes: vec![],
            clone_count: 4,
            rating: None,
            variants: vec![],
        };
        let line = summary_line(&r);
        assert!(line.contains("Paris → Barcelona"));
        assert!(line.contains("★ -"));
        assert!(line.ends_with("(4 clones)"));
    }
}
