use anyhow::{Context, Result, anyhow, bail};
use rusqlite::Connection;
use std::io::{self, BufRead, Write};

use trip_spotlight::api::results::parse_generated;
use trip_spotlight::api::types::{SaveRouteRequest, TripDetails};
use trip_spotlight::editing::geo::path_length_km;
use trip_spotlight::editing::{RouteEditTracker, best_insertion};
use trip_spotlight::model::{AgentTheme, Waypoint};
use trip_spotlight::session::{self, SpotlightData};
use trip_spotlight::ui;
use trip_spotlight::validate::validate_trip_details;

use crate::cli::Ctx;
use crate::cli::color::Colors;
use crate::cli::commands::{budget, image};

const HELP: &str = "\
Commands:
  show                                  list every variant (+ marks cities you added)
  add <variant> <city> [--at N] [--lat X --lng Y]
                                        add a city; without --at it goes where it adds the least distance
  replace <variant> <stop> <city> [--lat X --lng Y]
                                        swap stop N (1-based) for another city
  undo                                  revert the latest change
  reset [--yes]                         drop every change
  history                               list changes, newest first
  budget [--days N] [--travelers N]     estimate costs for the current variants
  image <variant>                       resolve photos for a variant's cities
  save <name>                           save the current variants to your account
  help | quit
<variant> is a number from `show` or a theme name (e.g. food).";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Show,
    Add {
        variant: usize,
        waypoint: Waypoint,
        /// Splice position, 0-based.
        at: Option<usize>,
    },
    Replace {
        variant: usize,
        index: usize,
        waypoint: Waypoint,
    },
    Undo,
    Reset {
        confirmed: bool,
    },
    History,
    Budget {
        days: u32,
        travelers: u32,
    },
    Image {
        variant: usize,
    },
    Save {
        name: String,
    },
    Help,
    Quit,
}

fn variant_index(token: &str, agents: &[AgentTheme]) -> Result<usize> {
    if let Ok(n) = token.parse::<usize>() {
        if n == 0 || n > agents.len() {
            bail!("Variant {n} does not exist (1..={})", agents.len());
        }
        return Ok(n - 1);
    }
    let theme: AgentTheme = token.parse().map_err(|e: String| anyhow!(e))?;
    agents
        .iter()
        .position(|a| *a == theme)
        .ok_or_else(|| anyhow!("No {} variant in this route", theme.label()))
}

fn one_based(token: &str, what: &str) -> Result<usize> {
    match token.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => bail!("{what} must be a positive number, got '{token}'"),
    }
}

const SWITCHES: [&str; 1] = ["yes"];

/// Splits `--flag value` pairs (and bare switches) from positional words.
fn split_flags(tokens: &[String]) -> Result<(Vec<String>, Vec<(String, String)>)> {
    let mut words = Vec::new();
    let mut flags = Vec::new();
    let mut it = tokens.iter();
    while let Some(t) = it.next() {
        if let Some(flag) = t.strip_prefix("--") {
            if SWITCHES.contains(&flag) {
                flags.push((flag.to_string(), String::new()));
                continue;
            }
            let value = it
                .next()
                .ok_or_else(|| anyhow!("--{flag} needs a value"))?;
            flags.push((flag.to_string(), value.clone()));
        } else {
            words.push(t.clone());
        }
    }
    Ok((words, flags))
}

fn flag<'a>(flags: &'a [(String, String)], name: &str) -> Option<&'a str> {
    flags
        .iter()
        .rev()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn reject_unknown(flags: &[(String, String)], allowed: &[&str]) -> Result<()> {
    if let Some((k, _)) = flags.iter().find(|(k, _)| !allowed.contains(&k.as_str())) {
        bail!("Unknown option --{k}");
    }
    Ok(())
}

fn parse_num<T: std::str::FromStr>(flags: &[(String, String)], name: &str) -> Result<Option<T>> {
    flag(flags, name)
        .map(|v| {
            v.parse::<T>()
                .map_err(|_| anyhow!("--{name}: '{v}' is not a valid number"))
        })
        .transpose()
}

fn waypoint_from(name_words: &[String], flags: &[(String, String)]) -> Result<Waypoint> {
    let name = name_words.join(" ");
    let name = name.trim();
    if name.is_empty() {
        bail!("Missing city name");
    }
    let wp = Waypoint::new(name);
    match (parse_num::<f64>(flags, "lat")?, parse_num::<f64>(flags, "lng")?) {
        (Some(lat), Some(lng)) => Ok(wp.with_coordinates(lat, lng)),
        (None, None) => Ok(wp),
        _ => bail!("--lat and --lng go together"),
    }
}

/// Parses one REPL line. `agents` are the loaded variants, in display order.
pub fn parse_command(line: &str, agents: &[AgentTheme]) -> Result<Option<Command>> {
    let tokens = shell_words::split(line).context("Parse error")?;
    let Some((head, rest)) = tokens.split_first() else {
        return Ok(None);
    };
    let (words, flags) = split_flags(rest)?;

    let cmd = match head.to_lowercase().as_str() {
        "show" | "ls" => Command::Show,
        "add" | "insert" => {
            reject_unknown(&flags, &["at", "lat", "lng"])?;
            let Some((variant, name)) = words.split_first() else {
                bail!("Usage: add <variant> <city> [--at N] [--lat X --lng Y]");
            };
            Command::Add {
                variant: variant_index(variant, agents)?,
                waypoint: waypoint_from(name, &flags)?,
                at: flag(&flags, "at")
                    .map(|v| one_based(v, "--at"))
                    .transpose()?,
            }
        }
        "replace" => {
            reject_unknown(&flags, &["lat", "lng"])?;
            let [variant, stop, name @ ..] = words.as_slice() else {
                bail!("Usage: replace <variant> <stop> <city>");
            };
            Command::Replace {
                variant: variant_index(variant, agents)?,
                index: one_based(stop, "Stop")?,
                waypoint: waypoint_from(name, &flags)?,
            }
        }
        "undo" => Command::Undo,
        "reset" => {
            reject_unknown(&flags, &["yes"])?;
            if !words.is_empty() {
                bail!("Usage: reset [--yes]");
            }
            Command::Reset {
                confirmed: flag(&flags, "yes").is_some(),
            }
        }
        "history" => Command::History,
        "budget" => {
            reject_unknown(&flags, &["days", "travelers"])?;
            Command::Budget {
                days: parse_num(&flags, "days")?.unwrap_or(7),
                travelers: parse_num(&flags, "travelers")?.unwrap_or(2),
            }
        }
        "image" | "images" => {
            let [variant] = words.as_slice() else {
                bail!("Usage: image <variant>");
            };
            Command::Image {
                variant: variant_index(variant, agents)?,
            }
        }
        "save" => {
            let name = words.join(" ");
            if name.trim().is_empty() {
                bail!("Usage: save <name>");
            }
            Command::Save {
                name: name.trim().to_string(),
            }
        }
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("Unknown command '{other}' (try `help`)"),
    };
    Ok(Some(cmd))
}

struct Session<'a> {
    ctx: &'a Ctx,
    con: Connection,
    data: SpotlightData,
    tracker: RouteEditTracker,
    colors: Colors,
}

impl Session<'_> {
    fn agents(&self) -> Vec<AgentTheme> {
        (0..self.tracker.variant_count())
            .filter_map(|i| self.tracker.original(i).ok())
            .map(|v| v.agent)
            .collect()
    }

    fn show(&self) -> Result<()> {
        let c = &self.colors;
        println!(
            "{} → {}",
            c.origin(&self.data.route.origin),
            c.destination(&self.data.route.destination)
        );

        for i in 0..self.tracker.variant_count() {
            let agent = self.tracker.original(i)?.agent;
            let list = self.tracker.waypoints(i)?;
            let mut header = format!("[{}] {}", i + 1, agent.label());
            if self.tracker.is_modified(i) {
                header.push_str(&c.warn(" (modified)"));
            }
            let coords: Vec<_> = list.iter().map(|w| w.coordinates).collect();
            if let Some(km) = path_length_km(&coords) {
                header.push_str(&c.dim(format!("  ~{km:.0} km")));
            }
            println!("{header}");

            for (n, w) in list.iter().enumerate() {
                if self.tracker.is_user_added(i, &w.name)? {
                    println!(
                        "   {:>2}. {} {}",
                        n + 1,
                        c.user_added("+"),
                        c.user_added(w.fmt_short())
                    );
                } else {
                    println!("   {:>2}.   {}", n + 1, w.fmt_short());
                }
            }
        }

        if self.tracker.change_count() > 0 {
            println!(
                "{}",
                c.dim(format!("{} changes made", self.tracker.change_count()))
            );
        }
        Ok(())
    }

    fn add(&mut self, variant: usize, waypoint: Waypoint, at: Option<usize>) -> Result<()> {
        let (position, added_km) = match at {
            Some(p) => (p, None),
            None => {
                let choice = best_insertion(self.tracker.waypoints(variant)?, &waypoint);
                (choice.position, choice.added_km)
            }
        };
        let action = self.tracker.insert_city(variant, waypoint, position)?;
        ui::success(action);
        if let Some(km) = added_km {
            println!("{}", self.colors.dim(format!("adds ~{km:.0} km")));
        }
        Ok(())
    }

    fn budget(&self, days: u32, travelers: u32) -> Result<()> {
        if let Err(e) = validate_trip_details(days, travelers) {
            bail!("{}", e.message);
        }
        let client = self.ctx.api(&self.con)?;
        let details = TripDetails {
            duration: days,
            travelers,
            budget_level: self.data.request.budget,
        };
        budget::budget_variants(&client, &self.tracker.snapshot(), details);
        Ok(())
    }

    fn images(&self, variant: usize) -> Result<()> {
        let client = self.ctx.api(&self.con)?;
        let agent = self.tracker.original(variant)?.agent;
        for w in self.tracker.waypoints(variant)? {
            let img = image::resolve(self.ctx, &self.con, &client, &w.name, None);
            image::print_resolved(&w.name, img.as_ref(), Some(agent));
        }
        Ok(())
    }

    fn save(&self, name: String) -> Result<()> {
        let client = self.ctx.authed_api(&self.con)?;
        let saved = client
            .save_route(&SaveRouteRequest {
                name,
                origin: self.data.route.origin.clone(),
                destination: self.data.route.destination.clone(),
                variants: self.tracker.snapshot(),
                modified: self.tracker.has_modifications(),
            })
            .context("Unable to save the route")?;
        ui::success(format!("Route saved (id {})", saved.id));
        Ok(())
    }

    fn history(&self) {
        if self.tracker.history().is_empty() {
            ui::info("No changes yet");
            return;
        }
        for entry in self.tracker.history().iter().rev() {
            println!(
                "{}  [{}] {}",
                self.colors
                    .dim(entry.timestamp.format("%H:%M:%S").to_string()),
                entry.agent_index + 1,
                entry.action
            );
        }
    }

    /// Returns false when the session should end.
    fn execute(&mut self, cmd: Command) -> Result<bool> {
        match cmd {
            Command::Show => self.show()?,
            Command::Add {
                variant,
                waypoint,
                at,
            } => self.add(variant, waypoint, at)?,
            Command::Replace {
                variant,
                index,
                waypoint,
            } => {
                let action = self.tracker.replace_city(variant, index, waypoint)?;
                ui::success(action);
            }
            Command::Undo => match self.tracker.undo() {
                Some(undone) => ui::info(format!("Undid: {}", undone.action)),
                None => ui::info("Nothing to undo"),
            },
            Command::Reset { .. } => {
                if self.tracker.reset_to_original() {
                    ui::success("Restored the original route");
                } else {
                    ui::info("No changes to reset");
                }
            }
            Command::History => self.history(),
            Command::Budget { days, travelers } => self.budget(days, travelers)?,
            Command::Image { variant } => self.images(variant)?,
            Command::Save { name } => self.save(name)?,
            Command::Help => println!("{HELP}"),
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }
}

fn prompt(changes: usize) -> io::Result<()> {
    if changes > 0 {
        print!("spotlight ({changes} changes)> ");
    } else {
        print!("spotlight> ");
    }
    io::stdout().flush()
}

pub fn run(ctx: &Ctx) -> Result<()> {
    let con = ctx.open_store()?;
    let Some(data) = session::load_spotlight(&con)? else {
        bail!("No generated route yet. Run `trip_spotlight plan --from <A> --to <B>` first.");
    };

    let (variants, errors) = parse_generated(&data.route);
    for e in &errors {
        ui::warning(format!("{} recommendations unavailable: {}", e.agent, e.reason));
    }
    if variants.is_empty() {
        bail!("The stored route has no usable variants");
    }

    let mut s = Session {
        ctx,
        con,
        data,
        tracker: RouteEditTracker::new(variants),
        colors: Colors::stdout(),
    };
    s.show()?;
    println!();
    println!("{}", s.colors.dim("Type `help` for commands."));

    let interactive = atty::is(atty::Stream::Stdin);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        if interactive {
            prompt(s.tracker.change_count())?;
        }
        let Some(line) = lines.next().transpose()? else {
            break;
        };

        let cmd = match parse_command(&line, &s.agents()) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                ui::error(format!("{e:#}"));
                continue;
            }
        };

        // Stdin is already locked by `lines`, so the answer is read from it directly.
        if cmd == (Command::Reset { confirmed: false }) && s.tracker.has_modifications() {
            print!("Discard {} changes? [y/N]: ", s.tracker.change_count());
            io::stdout().flush()?;
            let answer = lines.next().transpose()?.unwrap_or_default();
            if !ui::is_yes(&answer) {
                ui::info("Nothing changed");
                continue;
            }
        }

        match s.execute(cmd) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => ui::error(format!("{e:#}")),
        }
    }

    if s.tracker.has_modifications() {
        ui::info(format!(
            "Session ended with {} unsaved changes",
            s.tracker.change_count()
        ));
    }
    Ok(())
}
