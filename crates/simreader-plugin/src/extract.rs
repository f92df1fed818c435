// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-field safe extraction.
//
// Every platform read passes through one of these helpers. A failed read
// never leaves this module: text degrades to `None`, flags degrade to
// `false`, and an empty string is the same as no value.

use simreader_bridge::traits::FieldRead;
use simreader_core::error::Result;
use simreader_core::{OperatorIdentity, TelephonyField};
use tracing::debug;

/// Length of a mobile country code.
const MCC_LEN: usize = 3;

/// Treat `""` as absent.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Absorb a text read into an optional value.
pub fn safe_text(field: TelephonyField, read: FieldRead<String>) -> Option<String> {
    match read {
        Ok(value) => non_empty(value),
        Err(e) => {
            debug!(field = %field, error = %e, "field read failed, reporting absent");
            None
        }
    }
}

/// Absorb a boolean read; failures report `false`.
pub fn safe_flag(field: TelephonyField, read: Result<bool>) -> bool {
    read.unwrap_or_else(|e| {
        debug!(field = %field, error = %e, "flag read failed, reporting false");
        false
    })
}

/// Mobile country and network codes of one operator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperatorCodes {
    pub mcc: Option<String>,
    pub mnc: Option<String>,
}

impl OperatorCodes {
    /// Split a combined operator string such as `"310260"`.
    ///
    /// The first three characters are the MCC; the rest, if any, is the MNC.
    /// Strings shorter than three characters carry neither.
    pub fn split(combined: &str) -> Self {
        match combined.char_indices().nth(MCC_LEN) {
            Some((at, _)) => Self {
                mcc: Some(combined[..at].to_string()),
                mnc: Some(combined[at..].to_string()),
            },
            None if combined.chars().count() == MCC_LEN => Self {
                mcc: Some(combined.to_string()),
                mnc: None,
            },
            None => Self::default(),
        }
    }

    /// Normalize whichever shape the platform reported.
    pub fn from_identity(identity: OperatorIdentity) -> Self {
        match identity {
            OperatorIdentity::Combined(combined) => match non_empty(Some(combined)) {
                Some(combined) => Self::split(&combined),
                None => Self::default(),
            },
            OperatorIdentity::Split { mcc, mnc } => Self {
                mcc: non_empty(mcc),
                mnc: non_empty(mnc),
            },
        }
    }

    /// MCC followed by MNC, or `None` when both are missing.
    pub fn joined(&self) -> Option<String> {
        let joined = format!(
            "{}{}",
            self.mcc.as_deref().unwrap_or_default(),
            self.mnc.as_deref().unwrap_or_default()
        );
        non_empty(Some(joined))
    }
}

/// Absorb an operator read into its codes.
pub fn safe_operator(field: TelephonyField, read: FieldRead<OperatorIdentity>) -> OperatorCodes {
    match read {
        Ok(Some(identity)) => OperatorCodes::from_identity(identity),
        Ok(None) => OperatorCodes::default(),
        Err(e) => {
            debug!(field = %field, error = %e, "operator read failed, reporting absent");
            OperatorCodes::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simreader_core::SimReaderError;

    #[test]
    fn empty_string_is_absent() {
        assert_eq!(safe_text(TelephonyField::CarrierName, Ok(Some(String::new()))), None);
        assert_eq!(
            safe_text(TelephonyField::CarrierName, Ok(Some("Orange".into()))),
            Some("Orange".into())
        );
    }

    #[test]
    fn failed_text_read_is_absent() {
        let read = Err(SimReaderError::Telephony("SecurityException".into()));
        assert_eq!(safe_text(TelephonyField::PhoneNumber, read), None);
    }

    #[test]
    fn failed_flag_read_is_false() {
        let read = Err(SimReaderError::Telephony("boom".into()));
        assert!(!safe_flag(TelephonyField::NetworkRoaming, read));
        assert!(safe_flag(TelephonyField::NetworkRoaming, Ok(true)));
    }

    #[test]
    fn full_operator_splits_into_mcc_and_mnc() {
        let codes = OperatorCodes::split("310260");
        assert_eq!(codes.mcc.as_deref(), Some("310"));
        assert_eq!(codes.mnc.as_deref(), Some("260"));
    }

    #[test]
    fn short_operator_has_no_codes() {
        assert_eq!(OperatorCodes::split("31"), OperatorCodes::default());
        assert_eq!(OperatorCodes::split(""), OperatorCodes::default());
    }

    #[test]
    fn four_character_operator_has_one_digit_mnc() {
        let codes = OperatorCodes::split("3102");
        assert_eq!(codes.mcc.as_deref(), Some("310"));
        assert_eq!(codes.mnc.as_deref(), Some("2"));
    }

    #[test]
    fn three_character_operator_has_mcc_only() {
        let codes = OperatorCodes::split("310");
        assert_eq!(codes.mcc.as_deref(), Some("310"));
        assert_eq!(codes.mnc, None);
    }

    #[test]
    fn split_identity_normalizes_each_part() {
        let codes = OperatorCodes::from_identity(OperatorIdentity::Split {
            mcc: Some("234".into()),
            mnc: Some(String::new()),
        });
        assert_eq!(codes.mcc.as_deref(), Some("234"));
        assert_eq!(codes.mnc, None);
        assert_eq!(codes.joined().as_deref(), Some("234"));
    }

    #[test]
    fn joined_is_absent_when_both_codes_are() {
        assert_eq!(OperatorCodes::default().joined(), None);
    }
}
