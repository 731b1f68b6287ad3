//! Text-in, text-out entry points.
//!
//! These are the two operations a foreign caller needs: reduce an
//! automaton given in Timbuk format, and check inclusion between two such
//! automata with the default [`InclusionParams`].

use log::debug;

use crate::alphabet::Alphabet;
use crate::error::Result;
use crate::inclusion::{self, InclusionParams};
use crate::timbuk;

/// Parses `target`, reduces it and serializes the result.
///
/// State names survive the reduction: every merged state is named after the
/// lowest-numbered original state of its class.
pub fn reduce(target: &str) -> Result<String> {
    let (parsed, alphabet) = timbuk::parse(target)?;
    let (reduced, map) = parsed.aut.reduce_with_map();
    let dict = parsed.dict.translate(&map, reduced.state_count());
    Ok(timbuk::serialize(&parsed.name, &reduced, &dict, &alphabet))
}

/// Returns true iff the language of `subsumer` is included in the language of `includer`.
pub fn check_inclusion(subsumer: &str, includer: &str) -> Result<bool> {
    check_inclusion_with(subsumer, includer, &InclusionParams::default())
}

/// Like [`check_inclusion`] with explicit parameters.
pub fn check_inclusion_with(subsumer: &str, includer: &str, params: &InclusionParams) -> Result<bool> {
    let mut alphabet = Alphabet::new();
    let smaller = timbuk::parse_into(subsumer, &mut alphabet)?;
    let bigger = timbuk::parse_into(includer, &mut alphabet)?;
    debug!(
        "check_inclusion: {} ({} states) <= {} ({} states)",
        smaller.name,
        smaller.aut.state_count(),
        bigger.name,
        bigger.aut.state_count()
    );
    Ok(inclusion::check_inclusion(&smaller.aut, &bigger.aut, params))
}
