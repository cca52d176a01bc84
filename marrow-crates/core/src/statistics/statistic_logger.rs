use std::fmt::Display;

use itertools::Itertools;

use super::statistic_logging::log_statistic;
#[cfg(doc)]
use crate::propagation::Propagator;

/// Logs statistics under a common name prefix; used for the statistics of the engine and of
/// individual [`Propagator`]s.
#[derive(Debug, Default, Clone)]
pub struct StatisticLogger {
    /// The prefix which will be attached to the statistic name
    name_prefix: String,
}

impl StatisticLogger {
    pub fn new<Input: IntoIterator<Item = impl Display>>(name_prefix: Input) -> Self {
        Self {
            name_prefix: name_prefix.into_iter().join("_"),
        }
    }

    /// Returns a logger whose prefix is the current one extended with `addition_to_prefix`.
    pub fn attach_to_prefix(&self, addition_to_prefix: impl Display) -> Self {
        let name_prefix = if self.name_prefix.is_empty() {
            addition_to_prefix.to_string()
        } else {
            format!("{}_{}", self.name_prefix, addition_to_prefix)
        };

        Self { name_prefix }
    }

    pub fn name_prefix(&self) -> &str {
        &self.name_prefix
    }

    pub fn log_statistic(&self, value: impl Display) {
        log_statistic(&self.name_prefix, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_are_joined_with_underscores() {
        let logger = StatisticLogger::new(["engine", "linear"]);

        assert_eq!("engine_linear", logger.name_prefix());
        assert_eq!(
            "engine_linear_num_calls",
            logger.attach_to_prefix("num_calls").name_prefix()
        );
    }

    #[test]
    fn attaching_to_an_empty_prefix_does_not_start_with_a_separator() {
        let logger = StatisticLogger::default().attach_to_prefix("num_conflicts");

        assert_eq!("num_conflicts", logger.name_prefix());
    }
}
