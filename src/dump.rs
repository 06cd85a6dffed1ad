//! Diagnostic listing of a map's buckets.

use crate::chain_map::ChainMap;
use core::fmt;

/// `Display` adaptor returned by [`ChainMap::dump`].
///
/// Writes one `Slot: <index>` line per bucket, followed by ` Empty` for an
/// empty bucket or a ` * key: <key>, value: <value>` line per entry in
/// chain order. Only reads the map.
pub struct Dump<'a, S> {
    map: &'a ChainMap<S>,
}

impl<'a, S> Dump<'a, S> {
    pub(crate) fn new(map: &'a ChainMap<S>) -> Self {
        Dump { map }
    }
}

impl<S> fmt::Display for Dump<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, chain) in self.map.buckets() {
            writeln!(f, "Slot: {index}")?;
            let mut chain = chain.peekable();
            if chain.peek().is_none() {
                writeln!(f, " Empty")?;
                continue;
            }
            for (key, value) in chain {
                writeln!(f, " * key: {key}, value: {value}")?;
            }
        }
        Ok(())
    }
}
