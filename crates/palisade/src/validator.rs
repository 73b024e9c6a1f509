//! Pluggable configuration validation.
//!
//! A [`ChainValidator`] inspects a fully assembled dispatcher exactly once,
//! during construction, and may abort startup by returning an error. It is
//! the extension seam for cross-cutting sanity checks the core itself does
//! not enforce, such as "every chain must be reachable" or "no duplicate
//! matchers". The default is [`NoopValidator`], which accepts anything.

use crate::dispatcher::Dispatcher;
use crate::error::ConfigResult;

/// Validation strategy run once while a dispatcher is constructed.
///
/// Implementations get read access to the dispatcher (and through it the
/// registry snapshot) and reject bad configurations with
/// [`ConfigError::rejected`](crate::error::ConfigError::rejected).
pub trait ChainValidator<Rq, Rs> {
    /// Inspects the assembled dispatcher; return an error to abort startup.
    fn validate(&self, dispatcher: &Dispatcher<Rq, Rs>) -> ConfigResult<()>;
}

/// The default validator: accepts every configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopValidator;

impl<Rq, Rs> ChainValidator<Rq, Rs> for NoopValidator {
    fn validate(&self, _dispatcher: &Dispatcher<Rq, Rs>) -> ConfigResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::matcher::AnyRequest;
    use crate::registry::ChainRegistry;

    struct Request;
    struct Response;

    #[test]
    fn noop_validator_accepts_everything() {
        let registry = ChainRegistry::<Request, Response>::builder()
            .build()
            .unwrap();
        let dispatcher = Dispatcher::new(registry);
        assert!(NoopValidator.validate(&dispatcher).is_ok());
    }

    #[test]
    fn custom_validator_can_reject() {
        // Requires at least one registered chain.
        struct NonEmpty;

        impl<Rq, Rs> ChainValidator<Rq, Rs> for NonEmpty {
            fn validate(&self, dispatcher: &Dispatcher<Rq, Rs>) -> ConfigResult<()> {
                if dispatcher.registry().is_empty() {
                    return Err(ConfigError::rejected("no chains registered"));
                }
                Ok(())
            }
        }

        let empty = ChainRegistry::<Request, Response>::builder()
            .build()
            .unwrap();
        let err = Dispatcher::with_validator(empty, &NonEmpty).unwrap_err();
        assert!(matches!(err, ConfigError::Rejected(_)));

        let populated = ChainRegistry::<Request, Response>::builder()
            .chain(AnyRequest, vec![])
            .build()
            .unwrap();
        assert!(Dispatcher::with_validator(populated, &NonEmpty).is_ok());
    }
}
