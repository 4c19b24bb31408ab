/// Country names accepted for regional catalog hosts
const COUNTRY_CODES: &[(&str, &str)] = &[
    ("switzerland", "ch"),
    ("swiss", "ch"),
    ("germany", "de"),
    ("german", "de"),
    ("france", "fr"),
    ("french", "fr"),
    ("italy", "it"),
    ("italian", "it"),
    ("uk", "uk"),
    ("united kingdom", "uk"),
    ("us", "us"),
    ("usa", "us"),
];

/// Regional host code for a country name; unknown names pass through lower-cased.
#[must_use]
pub fn country_code(country: &str) -> String {
    let name = country.trim().to_lowercase();
    COUNTRY_CODES
        .iter()
        .find(|(known, _)| *known == name)
        .map_or(name.clone(), |(_, code)| (*code).to_string())
}
