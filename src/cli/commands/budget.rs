use anyhow::{Result, bail};

use trip_spotlight::api::budget::{VariantBudget, budgets_for_variants};
use trip_spotlight::api::results::parse_generated;
use trip_spotlight::api::ApiClient;
use trip_spotlight::api::types::{BudgetLevel, Confidence, TripDetails};
use trip_spotlight::model::RouteVariant;
use trip_spotlight::session;
use trip_spotlight::ui;
use trip_spotlight::validate::validate_trip_details;

use crate::cli::Ctx;
use crate::cli::args::BudgetArgs;
use crate::cli::color::Colors;
use crate::cli::formatting::money;

pub fn trip_details(args: &BudgetArgs, plan_level: BudgetLevel) -> Result<TripDetails> {
    if let Err(e) = validate_trip_details(args.days, args.travelers) {
        bail!("{}", e.message);
    }
    Ok(TripDetails {
        duration: args.days,
        travelers: args.travelers,
        budget_level: args.level.unwrap_or(plan_level),
    })
}

pub fn print_budgets(budgets: &[VariantBudget]) {
    let c = Colors::stdout();

    for b in budgets {
        match b {
            VariantBudget::Ready { agent, breakdown } => {
                let cur = breakdown.currency.as_deref();
                let confidence = breakdown.confidence.map_or("-", Confidence::as_str);

                println!(
                    "{:<13} total {}  (confidence: {})",
                    agent.label(),
                    c.info(money(breakdown.grand_total(), cur)),
                    c.confidence(confidence)
                );
                for (label, amount) in [
                    ("transport", breakdown.transportation.total),
                    ("lodging", breakdown.accommodation.total),
                    ("dining", breakdown.dining.total),
                    ("activities", breakdown.activities.total),
                    ("misc", breakdown.misc.total),
                ] {
                    println!("    {:<11} {}", label, money(amount, cur));
                }
                for tip in &breakdown.savings_tips {
                    println!("    {}", c.dim(format!("tip: {tip}")));
                }
            }
            VariantBudget::Unavailable { agent, reason } => {
                println!(
                    "{:<13} {}",
                    agent.label(),
                    c.warn(format!("budget unavailable ({reason})"))
                );
            }
        }
    }
}

pub fn budget_variants(client: &ApiClient, variants: &[RouteVariant], details: TripDetails) {
    let budgets = budgets_for_variants(client, variants, details);
    print_budgets(&budgets);

    let failed = budgets.iter().filter(|b| b.breakdown().is_none()).count();
    if failed > 0 {
        ui::warning(format!(
            "{failed} of {} budgets could not be calculated",
            budgets.len()
        ));
    }
}

pub fn run(ctx: &Ctx, args: &BudgetArgs) -> Result<()> {
    let con = ctx.open_store()?;
    let Some(data) = session::load_spotlight(&con)? else {
        bail!("No generated route yet. Run `trip_spotlight plan --from <A> --to <B>` first.");
    };

    let details = trip_details(args, data.request.budget)?;
    let (variants, _) = parse_generated(&data.route);
    if variants.is_empty() {
        bail!("The stored route has no usable variants");
    }

    let client = ctx.api(&con)?;
    budget_variants(&client, &variants, details);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_defaults_to_the_planned_one() {
        let args = BudgetArgs {
            days: 5,
            travelers: 3,
            level: None,
        };
        let d = trip_details(&args, BudgetLevel::Luxury).unwrap();
        assert_eq!(d.budget_level, BudgetLevel::Luxury);
        assert_eq!((d.duration, d.travelers), (5, 3));

        let args = BudgetArgs {
            level: Some(BudgetLevel::Budget),
            ..args
        };
        assert_eq!(
            trip_details(&args, BudgetLevel::Luxury).unwrap().budget_level,
            BudgetLevel::Budget
        );
    }

    #[test]
    fn out_of_range_trip_is_rejected() {
        let args = BudgetArgs {
            days: 0,
            travelers: 2,
            level: None,
        };
        assert!(trip_details(&args, BudgetLevel::Moderate).is_err());
    }
}
