//! Visualization of mining output using Plotters

use plotters::prelude::*;

use crate::eval::EvaluationReport;
use crate::miner::FrequentItemsets;
use crate::rules::AssociationRule;

/// Color palette cycled across bars
const BAR_COLORS: [RGBColor; 5] = [RED, BLUE, GREEN, MAGENTA, CYAN];

/// How many rules the lift chart and console listing show
const TOP_RULES: usize = 10;

/// Render a bar chart of the top rules by lift.
///
/// Rules are ranked by lift descending; with no rules the chart is skipped
/// rather than failing, since an empty rule set is a valid mining outcome.
pub fn create_rule_lift_chart(
    rules: &[AssociationRule],
    output_path: &str,
) -> crate::Result<()> {
    let top = top_rules_by_lift(rules, TOP_RULES);
    if top.is_empty() {
        println!("No rules to chart, skipping: {}", output_path);
        return Ok(());
    }

    let max_lift = top
        .iter()
        .map(|rule| rule.lift)
        .fold(f64::NEG_INFINITY, f64::max);

    let root = BitMapBackend::new(output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Top Association Rules by Lift", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..top.len() as f64, 0f64..(max_lift * 1.1))?;

    chart
        .configure_mesh()
        .x_desc("Rule rank")
        .y_desc("Lift")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    for (idx, rule) in top.iter().enumerate() {
        let color = &BAR_COLORS[idx % BAR_COLORS.len()];
        chart.draw_series(std::iter::once(Rectangle::new(
            [(idx as f64 + 0.1, 0.0), (idx as f64 + 0.9, rule.lift)],
            color.filled(),
        )))?;
    }

    root.present()?;
    println!("Rule lift chart saved to: {}", output_path);

    Ok(())
}

/// Render a bar chart of frequent single-genre support values.
pub fn create_genre_support_chart(
    frequent: &FrequentItemsets,
    output_path: &str,
) -> crate::Result<()> {
    let singles = frequent.of_size(1);
    if singles.is_empty() {
        println!("No frequent genres to chart, skipping: {}", output_path);
        return Ok(());
    }

    let root = BitMapBackend::new(output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Frequent Genre Support", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..singles.len() as f64, 0f64..1.0f64)?;

    chart
        .configure_mesh()
        .x_desc("Genre rank (by support)")
        .y_desc("Support")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    for (idx, (_, support)) in singles.iter().enumerate() {
        let color = &BAR_COLORS[idx % BAR_COLORS.len()];
        chart.draw_series(std::iter::once(Rectangle::new(
            [(idx as f64 + 0.1, 0.0), (idx as f64 + 0.9, *support)],
            color.filled(),
        )))?;
    }

    root.present()?;
    println!("Genre support chart saved to: {}", output_path);

    Ok(())
}

/// Print mining and evaluation statistics to console.
pub fn print_mining_statistics(
    frequent: &FrequentItemsets,
    rules: &[AssociationRule],
    report: &EvaluationReport,
) {
    println!("\n=== Mining Statistics ===");
    println!("Total frequent itemsets: {}", frequent.len());
    for k in 1..=frequent.max_size() {
        println!("  {}-itemsets: {}", k, frequent.of_size(k).len());
    }

    println!("\nTop genres by support:");
    for (itemset, support) in frequent.of_size(1).iter().take(TOP_RULES) {
        println!("  {}: {:.3}", itemset, support);
    }

    println!("\nTop rules by lift:");
    for rule in top_rules_by_lift(rules, TOP_RULES) {
        println!(
            "  {{{}}} => {{{}}} (supp={:.3}, conf={:.3}, lift={:.3})",
            rule.antecedent, rule.consequent, rule.support, rule.confidence, rule.lift
        );
    }

    println!("\nEvaluation:");
    println!("  Precision: {:.3}", report.precision);
    println!("  Recall:    {:.3}", report.recall);
    println!("  Coverage:  {:.3}", report.coverage);
    println!("  Users evaluated: {}", report.users_evaluated);
}

/// Generate the full visualization report: rule chart, genre chart, console
/// statistics.
pub fn generate_visualization_report(
    frequent: &FrequentItemsets,
    rules: &[AssociationRule],
    report: &EvaluationReport,
    base_output_path: &str,
) -> crate::Result<()> {
    create_rule_lift_chart(rules, base_output_path)?;

    let genre_chart_path = base_output_path.replace(".png", "_genres.png");
    create_genre_support_chart(frequent, &genre_chart_path)?;

    print_mining_statistics(frequent, rules, report);

    Ok(())
}

fn top_rules_by_lift(rules: &[AssociationRule], limit: usize) -> Vec<&AssociationRule> {
    let mut ranked: Vec<&AssociationRule> = rules.iter().collect();
    ranked.sort_by(|a, b| {
        b.lift
            .partial_cmp(&a.lift)
            .expect("Lift values must be valid f64 (not NaN)")
    });
    ranked.truncate(limit);
    ranked
}
