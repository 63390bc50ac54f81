/// Cocktail pairing abstraction
///
/// Maps a movie title to a cocktail recommendation. Resolution is total:
/// every implementation must return a pairing for any title, falling back to
/// the designated default rather than failing. The built-in table resolver is
/// the source of truth; an external pairing service can be swapped in by
/// configuration as an alternate implementation of the same contract.
use crate::models::CocktailPairing;

pub mod remote;
pub mod table;

pub use remote::RemotePairingResolver;
pub use table::TablePairingResolver;

/// Trait for pairing resolvers
#[async_trait::async_trait]
pub trait PairingResolver: Send + Sync {
    /// Resolve a cocktail pairing for a movie title. Always succeeds.
    async fn resolve(&self, title: &str) -> CocktailPairing;

    /// Resolver name for logging and debugging
    fn name(&self) -> &'static str;
}
