use divvy_domain::{ItemizedShares, Money, SettlementContext, UnknownItemizedShares};
use rust_decimal::Decimal;
use std::{env, str::FromStr};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub const EPSILON_VAR: &str = "DIVVY_EPSILON";
pub const SHARE_TOLERANCE_VAR: &str = "DIVVY_SHARE_TOLERANCE";
pub const PERCENT_TOLERANCE_VAR: &str = "DIVVY_PERCENT_TOLERANCE";
pub const ITEMIZED_SHARES_VAR: &str = "DIVVY_ITEMIZED_SHARES";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a decimal number (found '{value}'): {source}")]
    InvalidNumber {
        var: &'static str,
        value: String,
        #[source]
        source: rust_decimal::Error,
    },
    #[error("{var}: {source}")]
    InvalidItemizedShares {
        var: &'static str,
        #[source]
        source: UnknownItemizedShares,
    },
}

/// Application configuration
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AppConfig {
    pub context: SettlementContext,
}

impl AppConfig {
    /// Loads `.env` if present, then reads the `DIVVY_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    /// Unset or blank variables keep the standard value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |var: &'static str| {
            lookup(var)
                .map(|raw| raw.trim().to_owned())
                .filter(|raw| !raw.is_empty())
        };
        let mut context = SettlementContext::standard();

        if let Some(raw) = value(EPSILON_VAR) {
            context.epsilon = Money::from_decimal(parse_decimal(EPSILON_VAR, raw)?).abs();
        }
        if let Some(raw) = value(SHARE_TOLERANCE_VAR) {
            context.share_tolerance =
                Money::from_decimal(parse_decimal(SHARE_TOLERANCE_VAR, raw)?).abs();
        }
        if let Some(raw) = value(PERCENT_TOLERANCE_VAR) {
            context.percentage_tolerance = parse_decimal(PERCENT_TOLERANCE_VAR, raw)?.abs();
        }
        if let Some(raw) = value(ITEMIZED_SHARES_VAR) {
            context.itemized_shares = ItemizedShares::from_str(&raw).map_err(|source| {
                ConfigError::InvalidItemizedShares {
                    var: ITEMIZED_SHARES_VAR,
                    source,
                }
            })?;
        }

        tracing::debug!(
            epsilon = %context.epsilon,
            share_tolerance = %context.share_tolerance,
            percentage_tolerance = %context.percentage_tolerance,
            itemized_shares = ?context.itemized_shares,
            "Configuration loaded"
        );

        Ok(Self { context })
    }
}

fn parse_decimal(var: &'static str, value: String) -> Result<Decimal, ConfigError> {
    Decimal::from_str(&value).map_err(|source| ConfigError::InvalidNumber { var, value, source })
}

/// Initialize logging and tracing. `RUST_LOG` overrides the default `warn` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |var| {
            pairs
                .iter()
                .find(|(name, _)| *name == var)
                .map(|(_, value)| (*value).to_owned())
        }
    }

    #[rstest]
    #[case::unset(&[])]
    #[case::blank(&[(EPSILON_VAR, "  "), (ITEMIZED_SHARES_VAR, "")])]
    fn falls_back_to_standard_context(#[case] pairs: &[(&str, &str)]) {
        let config = AppConfig::from_lookup(lookup(pairs)).unwrap();
        assert_eq!(config.context, SettlementContext::standard());
    }

    #[test]
    fn reads_every_variable() {
        let pairs = [
            (EPSILON_VAR, "0.001"),
            (SHARE_TOLERANCE_VAR, "-0.1"),
            (PERCENT_TOLERANCE_VAR, "1"),
            (ITEMIZED_SHARES_VAR, "Per-Item"),
        ];
        let context = AppConfig::from_lookup(lookup(&pairs)).unwrap().context;

        assert_eq!(context.epsilon, Money::from_decimal(dec!(0.001)));
        assert_eq!(context.share_tolerance, Money::from_decimal(dec!(0.1)));
        assert_eq!(context.percentage_tolerance, dec!(1));
        assert_eq!(context.itemized_shares, ItemizedShares::PerItem);
    }

    #[rstest]
    #[case::epsilon(EPSILON_VAR, "a cent")]
    #[case::percent(PERCENT_TOLERANCE_VAR, "0,5")]
    fn rejects_unparsable_numbers(#[case] var: &'static str, #[case] value: &str) {
        let pairs = [(var, value)];
        let err = AppConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { var: v, .. } if v == var));
    }

    #[test]
    fn rejects_unknown_itemized_mode() {
        let pairs = [(ITEMIZED_SHARES_VAR, "by-weight")];
        let err = AppConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidItemizedShares { .. }));
    }
}
