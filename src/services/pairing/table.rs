use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::models::CocktailPairing;
use crate::services::pairing::PairingResolver;

fn pairing(name: &str, recipe: &[&str], why: &str) -> CocktailPairing {
    CocktailPairing {
        name: name.to_string(),
        recipe: recipe.iter().map(|line| line.to_string()).collect(),
        why: why.to_string(),
    }
}

/// Known-title table. Lookup is exact and case-sensitive; the table is
/// immutable for the lifetime of the process.
static PAIRINGS: Lazy<HashMap<&'static str, CocktailPairing>> = Lazy::new(|| {
    HashMap::from([
        (
            "Casablanca",
            pairing(
                "French 75",
                &[
                    "1 oz gin",
                    "1/2 oz lemon juice",
                    "1/2 oz simple syrup",
                    "3 oz Champagne",
                    "Lemon twist",
                ],
                "Classic, elegant, and timeless—like the film's romance and wartime poise.",
            ),
        ),
        (
            "Pulp Fiction",
            pairing(
                "White Russian",
                &["2 oz vodka", "1 oz coffee liqueur", "1 oz heavy cream"],
                "A cheeky nod to the film's pop-culture cool and offbeat humor.",
            ),
        ),
        (
            "Inception",
            pairing(
                "Negroni",
                &["1 oz gin", "1 oz Campari", "1 oz sweet vermouth", "Orange peel"],
                "Layered, bitter-sweet complexity mirrors the film's nested dreamscapes.",
            ),
        ),
        (
            "The Godfather",
            pairing(
                "Godfather",
                &["1.5 oz Scotch", "1.5 oz amaretto", "Orange twist (optional)"],
                "Namesake cocktail—smooth with a quiet authority, fitting the family saga.",
            ),
        ),
        (
            "Schindler's List",
            pairing(
                "Mocktail - Pomegranate Spritz",
                &[
                    "2 oz pomegranate juice",
                    "1 oz soda water",
                    "Squeeze of lemon",
                    "Rosemary sprig",
                ],
                "Respectful, sober pairing—somber tones with a subtle, reflective profile.",
            ),
        ),
    ])
});

fn default_pairing() -> CocktailPairing {
    pairing(
        "Old Fashioned",
        &[
            "2 oz bourbon",
            "2 dashes Angostura bitters",
            "1 sugar cube",
            "Orange peel",
        ],
        "A versatile classic that pairs with many narratives—simple, bold, and storied.",
    )
}

/// Total lookup: the default pairing stands in for every unknown title
pub fn pairing_for_title(title: &str) -> CocktailPairing {
    PAIRINGS.get(title).cloned().unwrap_or_else(default_pairing)
}

/// The default resolver, backed by the static table
pub struct TablePairingResolver;

#[async_trait::async_trait]
impl PairingResolver for TablePairingResolver {
    async fn resolve(&self, title: &str) -> CocktailPairing {
        pairing_for_title(title)
    }

    fn name(&self) -> &'static str {
        "table"
    }
}
