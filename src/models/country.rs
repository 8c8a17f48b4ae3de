/// Country codes present in the restaurant dataset. The table is a fixed
/// lookup handed to whichever component needs it, never mutated at runtime.
pub const COUNTRIES: &[(i32, &str)] = &[
    (1, "India"),
    (14, "Australia"),
    (30, "Brazil"),
    (37, "Canada"),
    (94, "Indonesia"),
    (148, "New Zealand"),
    (162, "Philippines"),
    (166, "Qatar"),
    (184, "Singapore"),
    (189, "South Africa"),
    (191, "Sri Lanka"),
    (208, "Turkey"),
    (214, "UAE"),
    (215, "United Kingdom"),
    (216, "United States"),
];

pub fn country_name(code: i32) -> Option<&'static str> {
    COUNTRIES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Country codes whose name starts with the given input, case-insensitively.
/// An empty result means the listing applies no country filter at all, which
/// mirrors how the directory has always treated unrecognized country names.
pub fn codes_matching_prefix(input: &str) -> Vec<i32> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return Vec::new();
    }
    COUNTRIES
        .iter()
        .filter(|(_, name)| name.to_lowercase().starts_with(&input))
        .map(|(code, _)| *code)
        .collect()
}
