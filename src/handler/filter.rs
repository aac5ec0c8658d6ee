//! Predicate-based filtering, for conditions channel membership can't
//! express (content matching, depth limits, producer thread).

use super::Handler;
use crate::error::Error;
use crate::record::Record;

/// How multiple predicates combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combination {
    /// Every predicate must admit the record.
    #[default]
    Conjunction,
    /// Any one predicate admitting the record is enough.
    Disjunction,
}

type Predicate = Box<dyn Fn(&Record) -> bool + Send>;

/// Admits records by composing arbitrary boolean predicates. Forced records
/// bypass the predicates entirely, and structural signals always pass,
/// exactly like the channel-based visibility stage.
pub struct FilterHandler {
    predicates: Vec<Predicate>,
    combination: Combination,
}

impl FilterHandler {
    #[must_use]
    pub fn new(combination: Combination) -> Self {
        Self {
            predicates: Vec::new(),
            combination,
        }
    }

    /// Adds one predicate to the combination.
    #[must_use]
    pub fn with(mut self, predicate: impl Fn(&Record) -> bool + Send + 'static) -> Self {
        self.predicates.push(Box::new(predicate));
        self
    }

    fn admits(&self, record: &Record) -> bool {
        if record.force() {
            return true;
        }
        match self.combination {
            Combination::Conjunction => self.predicates.iter().all(|p| p(record)),
            Combination::Disjunction => self.predicates.iter().any(|p| p(record)),
        }
    }
}

impl Handler for FilterHandler {
    fn handle(&mut self, record: &Record) -> Result<Vec<Record>, Error> {
        if self.admits(record) {
            Ok(vec![record.clone()])
        } else {
            Ok(Vec::new())
        }
    }
}
