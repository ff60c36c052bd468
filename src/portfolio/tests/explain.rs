use super::common::*;
use crate::portfolio::{Category, SpendProfile};

#[test]
fn fee_lands_on_the_first_category_a_card_serves() {
    let engine = engine();
    let cards = vec![card(
        "Everything",
        "Chase",
        95.0,
        vec![
            percentage(4.0, Category::Travel),
            percentage(4.0, Category::GroceriesDining),
        ],
    )];
    let profile = SpendProfile::new()
        .with(Category::Travel, 2000.0)
        .with(Category::GroceriesDining, 2000.0);

    let solution = engine.optimize(&cards, &profile, 700).expect("solvable");

    let travel = &solution.breakdown[&Category::Travel];
    let dining = &solution.breakdown[&Category::GroceriesDining];
    assert_close(travel.fee_attributed, 95.0);
    assert_close(dining.fee_attributed, 0.0);
    assert_close(travel.net_contribution, 2000.0 * 0.04 - 95.0);
    assert_close(dining.net_contribution, 2000.0 * 0.04);
}

#[test]
fn net_contributions_sum_to_the_net_value_exactly() {
    let engine = engine();
    let cards = vec![
        card(
            "Everything",
            "Chase",
            95.0,
            vec![
                multiplier(5.0, "points", Category::Travel),
                multiplier(3.0, "points", Category::GroceriesDining),
            ],
        ),
        card(
            "Free Basic",
            "Discover",
            0.0,
            vec![percentage(1.5, Category::AllPurchases)],
        ),
    ];
    let profile = SpendProfile::new()
        .with(Category::Travel, 3000.0)
        .with(Category::GroceriesDining, 2000.0)
        .with(Category::GasUtilities, 800.0)
        .with(Category::AllPurchases, 1200.0);

    let solution = engine.optimize(&cards, &profile, 700).expect("solvable");

    let total: f64 = solution
        .breakdown
        .values()
        .map(|line| line.net_contribution)
        .sum();
    assert_close(total, solution.net_value);
}

#[test]
fn unassigned_categories_keep_zeroed_audit_lines() {
    let engine = engine();
    let mut premium = card(
        "Reserve Elite",
        "Chase",
        550.0,
        vec![percentage(10.0, Category::Travel)],
    );
    premium.min_score = 790;
    let profile = SpendProfile::new()
        .with(Category::Travel, 3000.0)
        .with(Category::GasUtilities, 500.0);

    let solution = engine.optimize(&[premium], &profile, 700).expect("solvable");

    assert_eq!(solution.breakdown.len(), 2);
    for (category, line) in &solution.breakdown {
        assert_eq!(line.card, None, "{category} should be unassigned");
        assert_close(line.net_contribution, 0.0);
        assert_close(line.fee_attributed, 0.0);
        assert_eq!(line.formula, "unassigned");
    }
    assert_close(
        solution.breakdown[&Category::Travel].spend,
        3000.0,
    );
}

#[test]
fn breakdown_covers_every_profile_category() {
    let engine = engine();
    let cards = vec![card(
        "Travel Only",
        "Chase",
        0.0,
        vec![percentage(2.0, Category::Travel)],
    )];
    let profile = SpendProfile::new()
        .with(Category::Travel, 1000.0)
        .with(Category::RetailEntertainment, 700.0);

    let solution = engine.optimize(&cards, &profile, 700).expect("solvable");

    assert_eq!(solution.breakdown.len(), 2);
    assert_close(solution.breakdown[&Category::Travel].net_contribution, 20.0);
    // Nothing values retail spend, so that line contributes nothing either way.
    assert_close(
        solution.breakdown[&Category::RetailEntertainment].net_contribution,
        0.0,
    );
    assert_close(solution.net_value, 20.0);
}

#[test]
fn formula_strings_match_the_audited_arithmetic() {
    let engine = engine();
    let mut promo = card(
        "Sapphire Preferred",
        "Chase",
        95.0,
        vec![
            multiplier(5.0, "points", Category::Travel),
            trigger(60000.0, "points", Category::Travel),
        ],
    );
    promo.min_spend = 4000.0;

    let solution = engine
        .optimize(&[promo], &travel_profile(4000.0), 700)
        .expect("solvable");

    let travel = &solution.breakdown[&Category::Travel];
    assert_close(travel.raw_reward, 360.0);
    assert_close(travel.trigger_bonus, 1080.0);
    assert_close(travel.total_reward, 1440.0);
    assert_close(travel.net_contribution, 1345.0);
    assert_eq!(travel.formula, "4000.00 * 0.0900 + 1080.00 - 95.00");
    assert_close(solution.net_value, 1345.0);
}
