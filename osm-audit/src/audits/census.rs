//! Element name census.

use super::{run_pass, Audit};
use crate::core::ElementCensus;
use crate::prelude::*;
use std::io::BufRead;

/// Counts occurrences of every element name.
#[derive(Debug, Clone, Default)]
pub struct ElementCounter {
    census: ElementCensus,
}

impl ElementCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Audit for ElementCounter {
    type Output = ElementCensus;

    fn name(&self) -> &str {
        "element_census"
    }

    fn observe(&mut self, element: &Element) -> Result<()> {
        self.census.record(&element.name);
        Ok(())
    }

    fn outcomes(&self) -> u64 {
        self.census.total()
    }

    fn finish(self) -> ElementCensus {
        self.census
    }
}

/// Counts the elements of `document` by name.
pub fn count_elements<R: BufRead>(document: R) -> Result<ElementCensus> {
    run_pass(ElementCounter::new(), ElementWalker::new(document))
}
