use bitebot_lookup::{SearchOutcome, SearchResult, Source};
use bitebot_nutrients::{NutrientKey, NutrientVector, Portion, Serving};
use std::fmt::Write;

fn format_value(key: NutrientKey, value: f64) -> String {
    format!("{value} {}", key.unit())
}

fn heading(result: &SearchResult) -> String {
    let mut line = result.name.clone();
    if let Some(brand) = &result.brand {
        let _ = write!(line, " ({brand})");
    }
    if let Some(quantity) = &result.quantity {
        let _ = write!(line, ", {quantity}");
    }
    let tag = match result.source {
        Source::Reference => "usda",
        Source::Catalog => "off",
    };
    let _ = write!(line, "  [{tag} {}]", result.key);
    if let Some(grade) = &result.nutriscore {
        let _ = write!(line, " nutri-score {grade}");
    }
    line
}

/// One-line macro summary, e.g. `calories 120 kcal | protein_g 22.5 g`
pub fn macro_line(vector: &NutrientVector) -> String {
    let parts: Vec<String> = NutrientKey::MACROS
        .iter()
        .filter_map(|&key| vector.get(key).map(|v| format!("{key} {}", format_value(key, v))))
        .collect();
    if parts.is_empty() {
        "no macronutrient data".to_string()
    } else {
        parts.join(" | ")
    }
}

/// Macros first, then every other present nutrient in schema order
pub fn nutrient_table(vector: &NutrientVector) -> String {
    let mut out = String::new();
    let macros = NutrientKey::MACROS
        .iter()
        .filter_map(|&key| vector.get(key).map(|value| (key, value)));
    let others = vector.iter().filter(|(key, _)| !key.is_macro());
    for (key, value) in macros.chain(others) {
        let _ = writeln!(out, "  {:<18} {:>12}", key.as_str(), format_value(key, value));
    }
    if out.is_empty() {
        out.push_str("  (no nutrient data)\n");
    }
    out
}

fn portion_lines(portions: &[Portion]) -> String {
    let mut out = String::new();
    for portion in portions {
        let _ = writeln!(out, "    - {}: {} g", portion.label, portion.grams);
    }
    out
}

pub fn render_outcome(outcome: &SearchOutcome, show_portions: bool) -> String {
    if outcome.is_empty() {
        return "No matches found.\n".to_string();
    }
    let mut out = String::new();
    for (n, result) in outcome.results.iter().enumerate() {
        let _ = writeln!(out, "{:>2}. {}", n + 1, heading(result));
        let _ = writeln!(out, "    per 100 g: {}", macro_line(&result.per_100g));
        if show_portions && !result.portions.is_empty() {
            out.push_str("    portions:\n");
            out.push_str(&portion_lines(&result.portions));
        }
    }
    out
}

pub fn render_food(result: &SearchResult, show_portions: bool) -> String {
    let mut out = format!("{}\nPer 100 g:\n", heading(result));
    out.push_str(&nutrient_table(&result.per_100g));
    if show_portions {
        if result.portions.is_empty() {
            out.push_str("Portions: none listed\n");
        } else {
            out.push_str("Portions:\n");
            out.push_str(&portion_lines(&result.portions));
        }
    }
    out
}

pub fn render_serving(result: &SearchResult, serving: &Serving) -> String {
    let mut out = format!("{}\nFor {} g:\n", heading(result), serving.grams());
    out.push_str(&nutrient_table(serving.nutrients()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(entries: &[(NutrientKey, f64)]) -> NutrientVector {
        NutrientVector::try_from(entries.to_vec()).unwrap()
    }

    #[test]
    fn macros_are_listed_before_other_nutrients() {
        let table = nutrient_table(&vector(&[
            (NutrientKey::SodiumMg, 42.8),
            (NutrientKey::ProteinG, 6.3),
        ]));
        let protein = table.find("protein_g").unwrap();
        let sodium = table.find("sodium_mg").unwrap();
        assert!(protein < sodium);
        assert!(table.contains("42.8 mg"));
    }

    #[test]
    fn table_and_summary_agree_on_macro_order() {
        let vector = vector(&[
            (NutrientKey::SugarG, 4.0),
            (NutrientKey::FiberG, 2.0),
            (NutrientKey::FatG, 1.5),
            (NutrientKey::Calories, 90.0),
        ]);
        let table = nutrient_table(&vector);
        let rows: Vec<&str> = table
            .lines()
            .filter_map(|line| line.split_whitespace().next())
            .collect();
        assert_eq!(rows, vec!["calories", "fat_g", "fiber_g", "sugar_g"]);
        assert_eq!(
            macro_line(&vector),
            "calories 90 kcal | fat_g 1.5 g | fiber_g 2 g | sugar_g 4 g"
        );
    }

    #[test]
    fn macro_line_reports_missing_data() {
        assert_eq!(macro_line(&NutrientVector::new()), "no macronutrient data");
        assert_eq!(
            macro_line(&vector(&[(NutrientKey::Calories, 120.0), (NutrientKey::FatG, 2.5)])),
            "calories 120 kcal | fat_g 2.5 g"
        );
    }
}
