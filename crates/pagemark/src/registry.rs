use pagemark_core::{error::ConfigurationError, sort::BoundaryChain};
use std::{
    collections::HashMap,
    sync::{Arc, LazyLock, PoisonError, RwLock},
};

///
/// ChainKey
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
struct ChainKey {
    query_id: String,
    sort: String,
}

// Process-wide compiled-chain cache. Sort configuration is static for the
// life of the process, so entries are written once and read many times.
static CHAINS: LazyLock<RwLock<HashMap<ChainKey, Arc<BoundaryChain>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Resolve the compiled chain for `(query_id, sort)`, building it on first
/// use.
///
/// Concurrent first-use races may duplicate the build, but only a fully
/// built chain is ever published and the first published chain wins.
pub(crate) fn resolve_chain(
    query_id: &str,
    sort: &str,
    build: impl FnOnce() -> Result<BoundaryChain, ConfigurationError>,
) -> Result<Arc<BoundaryChain>, ConfigurationError> {
    let key = ChainKey {
        query_id: query_id.to_string(),
        sort: sort.to_string(),
    };

    if let Some(chain) = CHAINS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
    {
        return Ok(chain.clone());
    }

    let built = Arc::new(build()?);

    let mut chains = CHAINS.write().unwrap_or_else(PoisonError::into_inner);
    Ok(chains.entry(key).or_insert(built).clone())
}

///
/// TESTS
///
