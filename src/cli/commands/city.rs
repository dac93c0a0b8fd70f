use anyhow::{Context, Result};

use trip_spotlight::api::types::{CityDetails, CityDetailsRequest, PlaceSummary};
use trip_spotlight::ui;

use crate::cli::Ctx;
use crate::cli::color::Colors;
use crate::cli::formatting::{print_kv_block_colored_keys, truncate_ellipsis};

fn places(items: &[PlaceSummary]) -> String {
    if items.is_empty() {
        return "-".to_string();
    }
    items
        .iter()
        .map(|p| {
            let mut line = p.name.clone();
            if let Some(price) = &p.price_range {
                line.push_str(&format!(" ({price})"));
            }
            if let Some(d) = &p.description {
                line.push_str(&format!(" - {}", truncate_ellipsis(d, 60)));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn lines_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join("\n")
    }
}

pub fn detail_pairs(d: &CityDetails) -> Vec<(&'static str, String)> {
    vec![
        ("City", d.city.clone()),
        ("Country", d.country.clone().unwrap_or_else(|| "-".into())),
        ("About", d.description.clone().unwrap_or_else(|| "-".into())),
        ("Highlights", lines_or_dash(&d.highlights)),
        ("Restaurants", places(&d.restaurants)),
        ("Stays", places(&d.accommodations)),
        (
            "Events",
            lines_or_dash(
                &d.events
                    .iter()
                    .map(|e| match &e.date {
                        Some(date) => format!("{} ({date})", e.name),
                        None => e.name.clone(),
                    })
                    .collect::<Vec<_>>(),
            ),
        ),
    ]
}

pub fn run(ctx: &Ctx, name: &str, country: Option<&str>) -> Result<()> {
    let con = ctx.open_store()?;
    let client = ctx.api(&con)?;

    let details = client
        .city_details(&CityDetailsRequest {
            city: name.to_string(),
            country: country.map(str::to_string),
        })
        .with_context(|| format!("Unable to load details for {name}"))?;

    let c = Colors::stdout();
    print_kv_block_colored_keys(&detail_pairs(&details), |k| c.info(k));

    for w in &details.warnings {
        ui::warning(w);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trip_spotlight::api::types::CityEvent;

    #[test]
    fn empty_sections_render_as_dash() {
        let d = CityDetails {
            city: "Girona".into(),
            events: vec![CityEvent {
                name: "Temps de Flors".into(),
                date: Some("May".into()),
            }],
            ..Default::default()
        };
        let pairs = detail_pairs(&d);
        assert_eq!(pairs[1].1, "-");
        assert_eq!(pairs[4].1, "-");
        assert_eq!(pairs[6].1, "Temps de Flors (May)");
    }
}
