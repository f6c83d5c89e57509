//! FILENAME: core/engine/src/config.rs
//! PURPOSE: Evaluator settings and the NaN / error policy they select.

use calcexp_parser::{EvaluationError, EvaluationResult};
use serde::{Deserialize, Serialize};

use crate::logging::log_debug;

/// How an evaluator treats NaN results and failures.
///
/// | allow_nan | never_throws | NaN result | failure              |
/// |-----------|--------------|------------|----------------------|
/// | false     | any          | NaN error  | NaN error (cause kept) |
/// | true      | false        | NaN        | original error       |
/// | true      | true         | NaN        | NaN                  |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EvaluatorConfig {
    pub allow_nan: bool,
    pub never_throws: bool,
}

impl EvaluatorConfig {
    pub fn new(allow_nan: bool, never_throws: bool) -> Self {
        EvaluatorConfig {
            allow_nan,
            never_throws,
        }
    }

    /// Turns the raw outcome of the grammar into what `evaluate` returns.
    pub fn settle(&self, outcome: EvaluationResult<f64>) -> EvaluationResult<f64> {
        match outcome {
            Ok(value) if value.is_nan() && !self.allow_nan => Err(EvaluationError::not_a_number(None)),
            Ok(value) => Ok(value),
            Err(e) if self.allow_nan && self.never_throws => {
                log_debug!("EVAL", "failure masked as NaN: {}", e);
                Ok(f64::NAN)
            }
            Err(e) if !self.allow_nan => Err(EvaluationError::not_a_number(Some(e))),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calcexp_parser::EvaluationErrorKind;

    #[test]
    fn default_forbids_nan_and_throws() {
        let config = EvaluatorConfig::default();
        assert!(!config.allow_nan);
        assert!(!config.never_throws);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: EvaluatorConfig = serde_json::from_str(r#"{ "allowNan": true }"#).unwrap();
        assert_eq!(config, EvaluatorConfig::new(true, false));

        let config: EvaluatorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EvaluatorConfig::default());
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(EvaluatorConfig::new(true, true)).unwrap();
        assert_eq!(json, serde_json::json!({ "allowNan": true, "neverThrows": true }));
    }

    #[test]
    fn nan_result_is_an_error_by_default() {
        let err = EvaluatorConfig::default().settle(Ok(f64::NAN)).unwrap_err();
        assert!(err.is_not_a_number());
        assert!(err.cause().is_none());
    }

    #[test]
    fn failure_is_reported_as_nan_error_with_cause() {
        let err = EvaluatorConfig::default()
            .settle(Err(EvaluationError::syntax("Unclosed parenthesis")))
            .unwrap_err();
        assert!(err.is_not_a_number());
        assert_eq!(err.cause().unwrap().to_string(), "Unclosed parenthesis");
    }

    #[test]
    fn allow_nan_propagates_original_failure() {
        let config = EvaluatorConfig::new(true, false);
        assert!(config.settle(Ok(f64::NAN)).unwrap().is_nan());

        let err = config.settle(Err(EvaluationError::syntax("bad"))).unwrap_err();
        assert_eq!(err.kind(), EvaluationErrorKind::Syntax);
    }

    #[test]
    fn never_throws_masks_failures() {
        let config = EvaluatorConfig::new(true, true);
        assert!(config.settle(Err(EvaluationError::syntax("bad"))).unwrap().is_nan());
    }

    #[test]
    fn never_throws_without_allow_nan_still_fails() {
        let config = EvaluatorConfig::new(false, true);
        let err = config.settle(Err(EvaluationError::syntax("bad"))).unwrap_err();
        assert!(err.is_not_a_number());
    }

    #[test]
    fn reentrant_error_follows_policy() {
        let silent = EvaluatorConfig::new(true, true);
        assert!(silent.settle(Err(EvaluationError::reentrant())).unwrap().is_nan());

        let err = EvaluatorConfig::default()
            .settle(Err(EvaluationError::reentrant()))
            .unwrap_err();
        assert!(err.is_not_a_number());
        let cause = err.cause().unwrap().downcast_ref::<EvaluationError>().unwrap();
        assert_eq!(cause.kind(), EvaluationErrorKind::Reentrant);
    }
}
