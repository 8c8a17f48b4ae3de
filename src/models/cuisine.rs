/// Cuisine vocabulary the image-label search matches against. Labels coming
/// out of the classifier are free-form strings; only the ones that line up
/// with an entry here (case-insensitively) are used as filters.
pub const CUISINES: &[&str] = &[
    "American",
    "Asian",
    "Bakery",
    "BBQ",
    "Beverages",
    "Biryani",
    "Burger",
    "Cafe",
    "Chinese",
    "Continental",
    "Desserts",
    "European",
    "Fast Food",
    "French",
    "Healthy Food",
    "Ice Cream",
    "Indian",
    "Italian",
    "Japanese",
    "Korean",
    "Lebanese",
    "Mediterranean",
    "Mexican",
    "Mithai",
    "North Indian",
    "Pizza",
    "Salad",
    "Sandwich",
    "Seafood",
    "South Indian",
    "Street Food",
    "Sushi",
    "Tea",
    "Thai",
    "Vietnamese",
];

/// Filters classifier labels down to known cuisines, returning the canonical
/// casing from the vocabulary. Order of the incoming labels is preserved and
/// duplicates are dropped.
pub fn match_labels(labels: &[String]) -> Vec<String> {
    let mut matched: Vec<String> = Vec::new();
    for label in labels {
        let label = label.trim();
        let hit = CUISINES
            .iter()
            .find(|cuisine| cuisine.eq_ignore_ascii_case(label));
        if let Some(cuisine) = hit {
            if !matched.iter().any(|m| m == cuisine) {
                matched.push((*cuisine).to_string());
            }
        }
    }
    matched
}
