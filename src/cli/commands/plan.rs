use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;

use trip_spotlight::api::results::parse_generated;
use trip_spotlight::api::types::{GenerateRouteRequest, JobProgress};
use trip_spotlight::api::{JobPoller, PollConfig, PollError};
use trip_spotlight::clock::ThreadSleeper;
use trip_spotlight::session::{self, SpotlightData};
use trip_spotlight::ui;
use trip_spotlight::validate::validate_route_request;

use crate::cli::Ctx;
use crate::cli::args::PlanArgs;
use crate::cli::color::Colors;
use crate::cli::formatting::eta;

pub fn parse_nights(items: &[String]) -> Result<BTreeMap<String, u32>> {
    let mut out = BTreeMap::new();
    for item in items {
        let Some((city, n)) = item.rsplit_once('=') else {
            bail!("Invalid --nights value '{item}' (expected CITY=N)");
        };
        let city = city.trim();
        if city.is_empty() {
            bail!("Invalid --nights value '{item}' (missing city)");
        }
        let n: u32 = n
            .trim()
            .parse()
            .with_context(|| format!("Invalid night count in '{item}'"))?;
        out.insert(city.to_string(), n);
    }
    Ok(out)
}

pub fn build_request(args: &PlanArgs) -> Result<GenerateRouteRequest> {
    let mut agents = Vec::with_capacity(args.agents.len());
    for a in &args.agents {
        if !agents.contains(a) {
            agents.push(*a);
        }
    }

    Ok(GenerateRouteRequest {
        origin: args.from.trim().to_string(),
        destination: args.to.trim().to_string(),
        stops: args.stops,
        budget: args.budget,
        agents,
        night_allocation: parse_nights(&args.nights)?,
    })
}

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(100);
    if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}% {msg}") {
        pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏ "));
    }
    pb
}

fn progress_message(p: &JobProgress) -> String {
    let mut parts = Vec::new();
    if let Some(phase) = p.phase.as_deref().or(p.message.as_deref()) {
        parts.push(phase.to_string());
    }
    if let Some(agent) = &p.current_agent {
        parts.push(format!("agent: {agent} ({}/{})", p.completed, p.total));
    }
    if let Some(secs) = p.estimated_time_remaining {
        parts.push(format!("~{} left", eta(secs)));
    }
    parts.join(" | ")
}

pub fn run(ctx: &Ctx, args: &PlanArgs) -> Result<()> {
    let request = build_request(args)?;
    if let Err(e) = validate_route_request(&request) {
        bail!("{}", e.message);
    }

    let con = ctx.open_store()?;
    let client = ctx.api(&con)?;

    let job = client
        .generate_route(&request)
        .context("Unable to start route generation")?;
    ui::info(format!(
        "Planning {} → {} ({} stops, {} themes)",
        request.origin,
        request.destination,
        request.stops,
        request.agents.len()
    ));

    let pb = progress_bar();
    let poller = JobPoller::new(&client, ThreadSleeper, PollConfig::from(&ctx.config), &job.job_id);
    let outcome = poller.run(|p| {
        pb.set_position(p.percent_complete.clamp(0.0, 100.0) as u64);
        pb.set_message(progress_message(p));
    });
    pb.finish_and_clear();

    let route = match outcome {
        Ok(route) => route,
        Err(e @ PollError::TimedOut { .. }) => {
            ui::error(e.to_string());
            return Err(e.into());
        }
        Err(e) => return Err(e).context("Route generation did not complete"),
    };

    let (variants, errors) = parse_generated(&route);
    let c = Colors::stdout();

    println!(
        "Route: {} → {}",
        c.origin(&route.origin),
        c.destination(&route.destination)
    );
    for (i, v) in variants.iter().enumerate() {
        let names: Vec<&str> = v.waypoints.iter().map(|w| w.name.as_str()).collect();
        println!("  {}. {:<13} {}", i + 1, v.agent.label(), names.join(" → "));
    }
    for e in &errors {
        ui::warning(format!("{} recommendations unavailable: {}", e.agent, e.reason));
    }

    session::save_spotlight(
        &con,
        &SpotlightData {
            request,
            route,
            generated_at: chrono::Utc::now(),
        },
    )?;

    if variants.is_empty() {
        ui::warning("No usable variants were generated");
    } else {
        ui::success("Saved. Run `trip_spotlight spotlight` to explore and customise it.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trip_spotlight::api::types::BudgetLevel;
    use trip_spotlight::model::AgentTheme;

    fn args() -> PlanArgs {
        PlanArgs {
            from: " Paris ".into(),
            to: "Barcelona".into(),
            stops: 3,
            budget: BudgetLevel::Budget,
            agents: vec![AgentTheme::Food, AgentTheme::Food, AgentTheme::Culture],
            nights: vec!["Lyon=2".into(), "Aix-en-Provence = 1".into()],
        }
    }

    #[test]
    fn request_trims_and_parses_nights() {
        let req = build_request(&args()).unwrap();
        assert_eq!(req.origin, "Paris");
        assert_eq!(req.agents, [AgentTheme::Food, AgentTheme::Culture]);
        assert_eq!(req.night_allocation.get("Lyon"), Some(&2));
        assert_eq!(req.night_allocation.get("Aix-en-Provence"), Some(&1));
    }

    #[test]
    fn malformed_nights_are_rejected() {
        assert!(parse_nights(&["Lyon".into()]).is_err());
        assert!(parse_nights(&["=2".into()]).is_err());
        assert!(parse_nights(&["Lyon=two".into()]).is_err());
    }

    #[test]
    fn progress_message_joins_known_parts() {
        let p = JobProgress {
            total: 5,
            completed: 2,
            current_agent: Some("food".into()),
            percent_complete: 40.0,
            estimated_time_remaining: Some(75.0),
            phase: Some("Running agents".into()),
            message: None,
        };
        assert_eq!(
            progress_message(&p),
            "Running agents | agent: food (2/5) | ~1m 15s left"
        );
    }
}
