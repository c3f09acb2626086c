use std::error::Error;
use std::fmt::{self, Formatter};
use std::time::Duration;

use futures::future::BoxFuture;

use crate::config::RunConfig;
use crate::report::CheckResult;
use crate::request;
use crate::runner::RequestContext;

/// Entry point invoked once per worker iteration. A transport-level failure
/// is returned as the error; anything that produced a response becomes a
/// [CheckResult]. The mapping from scenario to entry is a plain function
/// pointer, so a missing entry is a compile error rather than a dispatch
/// failure at run time.
pub type EntryFn = for<'a> fn(&'a RequestContext) -> BoxFuture<'a, reqwest::Result<CheckResult>>;

/// A named traffic pattern with its own concurrency and duration, immutable
/// once registered.
#[derive(Clone)]
pub struct Scenario {
    pub name: &'static str,
    pub concurrency: usize,
    pub duration: Duration,
    pub start_offset: Duration,
    pub entry: EntryFn,
}

impl Scenario {
    pub fn new(
        name: &'static str,
        concurrency: usize,
        duration: Duration,
        start_offset: Duration,
        entry: EntryFn,
    ) -> Self {
        Self {
            name,
            concurrency,
            duration,
            start_offset,
            entry,
        }
    }
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("concurrency", &self.concurrency)
            .field("duration", &self.duration)
            .field("start_offset", &self.start_offset)
            .finish()
    }
}

#[derive(Debug, PartialEq)]
pub struct DuplicateScenarioError {
    pub name: &'static str,
}

impl Error for DuplicateScenarioError {}

impl fmt::Display for DuplicateScenarioError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "scenario already registered: name={}", self.name)
    }
}

/// Holds the fixed set of scenarios in registration order. The order only
/// affects launch logging; every scenario starts at its own offset.
#[derive(Debug, Default)]
pub struct Registry {
    scenarios: Vec<Scenario>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The two fixed traffic patterns of this generator: 20 posting workers
    /// and 10 querying workers, both for the configured duration at offset 0.
    pub fn with_fixed_scenarios(config: &RunConfig) -> Result<Self, DuplicateScenarioError> {
        let mut registry = Self::new();
        registry.register(Scenario::new(
            "post_updates",
            20,
            config.default_duration,
            Duration::ZERO,
            request::post_updates,
        ))?;
        registry.register(Scenario::new(
            "get_alerts",
            10,
            config.default_duration,
            Duration::ZERO,
            request::get_alerts,
        ))?;
        Ok(registry)
    }

    pub fn register(&mut self, scenario: Scenario) -> Result<(), DuplicateScenarioError> {
        if self.scenarios.iter().any(|s| s.name == scenario.name) {
            return Err(DuplicateScenarioError {
                name: scenario.name,
            });
        }
        self.scenarios.push(scenario);
        Ok(())
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn into_scenarios(self) -> Vec<Scenario> {
        self.scenarios
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(name: &'static str) -> Scenario {
        Scenario::new(
            name,
            1,
            Duration::from_secs(1),
            Duration::ZERO,
            request::get_alerts,
        )
    }

    #[test]
    fn duplicate_name_test() {
        let mut registry = Registry::new();
        registry.register(scenario("a")).unwrap();
        registry.register(scenario("b")).unwrap();

        let err = registry.register(scenario("a")).unwrap_err();
        assert_eq!(err, DuplicateScenarioError { name: "a" });
        assert_eq!(format!("{}", err), "scenario already registered: name=a");
        // The failed registration must not have touched the set.
        assert_eq!(registry.scenarios().len(), 2);
    }

    #[test]
    fn registration_order_test() {
        let mut registry = Registry::new();
        for name in ["c", "a", "b"] {
            registry.register(scenario(name)).unwrap();
        }

        let names = registry
            .scenarios()
            .iter()
            .map(|s| s.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn fixed_scenarios_test() {
        let config = RunConfig::from_base_url("http://localhost:8080").unwrap();
        let registry = Registry::with_fixed_scenarios(&config).unwrap();
        let scenarios = registry.scenarios();

        assert_eq!(scenarios.len(), 2);
        assert_eq!(scenarios[0].name, "post_updates");
        assert_eq!(scenarios[0].concurrency, 20);
        assert_eq!(scenarios[1].name, "get_alerts");
        assert_eq!(scenarios[1].concurrency, 10);
        for s in scenarios {
            assert_eq!(s.duration, Duration::from_secs(30));
            assert_eq!(s.start_offset, Duration::ZERO);
        }
    }
}
