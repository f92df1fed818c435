// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Network info assembly and radio technology naming.

use simreader_bridge::traits::TelephonyContext;
use simreader_core::error::Result;
use simreader_core::{AvailabilityRule, NetworkInfo, OperatorIdentity, RawRadioTechnology};

use crate::extract::{OperatorCodes, non_empty};

/// Reported when the technology is missing or not in the table.
pub const UNKNOWN_NETWORK_TYPE: &str = "UNKNOWN";

/// `TelephonyManager.NETWORK_TYPE_*` → display name.
const ANDROID_NETWORK_TYPES: &[(i32, &str)] = &[
    (1, "GPRS"),
    (2, "EDGE"),
    (3, "UMTS"),
    (4, "CDMA"),
    (5, "EVDO_0"),
    (6, "EVDO_A"),
    (7, "1xRTT"),
    (8, "HSDPA"),
    (9, "HSUPA"),
    (10, "HSPA"),
    (11, "IDEN"),
    (12, "EVDO_B"),
    (13, "LTE"),
    (14, "EHRPD"),
    (15, "HSPAP"),
    (20, "5G"),
];

/// `CTRadioAccessTechnology*` → display name.
const IOS_RADIO_TECHNOLOGIES: &[(&str, &str)] = &[
    ("CTRadioAccessTechnologyGPRS", "GPRS"),
    ("CTRadioAccessTechnologyEdge", "EDGE"),
    ("CTRadioAccessTechnologyWCDMA", "WCDMA"),
    ("CTRadioAccessTechnologyHSDPA", "HSDPA"),
    ("CTRadioAccessTechnologyHSUPA", "HSUPA"),
    ("CTRadioAccessTechnologyCDMA1x", "CDMA1x"),
    ("CTRadioAccessTechnologyCDMAEVDORev0", "CDMAEVDORev0"),
    ("CTRadioAccessTechnologyCDMAEVDORevA", "CDMAEVDORevA"),
    ("CTRadioAccessTechnologyCDMAEVDORevB", "CDMAEVDORevB"),
    ("CTRadioAccessTechnologyeHRPD", "eHRPD"),
    ("CTRadioAccessTechnologyLTE", "LTE"),
    ("CTRadioAccessTechnologyNRNSA", "5G"),
    ("CTRadioAccessTechnologyNR", "5G"),
];

/// Display name for a raw technology identifier. Never fails.
pub fn network_type_name(raw: &RawRadioTechnology) -> &'static str {
    let found = match raw {
        RawRadioTechnology::Android(id) => ANDROID_NETWORK_TYPES
            .iter()
            .find(|(code, _)| code == id)
            .map(|(_, name)| *name),
        RawRadioTechnology::Ios(id) => IOS_RADIO_TECHNOLOGIES
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, name)| *name),
    };
    found.unwrap_or(UNKNOWN_NETWORK_TYPE)
}

/// MCC+MNC as one code. A combined code is reported as the platform gave it,
/// whatever its length; separate parts are joined.
fn operator_code(identity: OperatorIdentity) -> Option<String> {
    match identity {
        OperatorIdentity::Combined(code) => non_empty(Some(code)),
        split @ OperatorIdentity::Split { .. } => OperatorCodes::from_identity(split).joined(),
    }
}

/// Read the current network attachment.
///
/// Read failures propagate; the caller reports them as `NETWORK_ERROR`.
pub fn assemble(ctx: &dyn TelephonyContext, rule: AvailabilityRule) -> Result<NetworkInfo> {
    let operator_name = non_empty(ctx.network_operator_name()?);
    let operator = ctx.network_operator()?.and_then(operator_code);
    let network_type = ctx
        .radio_technology()?
        .as_ref()
        .map_or(UNKNOWN_NETWORK_TYPE, network_type_name);

    let is_network_available = match rule {
        AvailabilityRule::OperatorCode => operator.is_some(),
        AvailabilityRule::CarrierName => operator_name.is_some(),
    };

    Ok(NetworkInfo::new(
        operator_name,
        operator,
        network_type,
        is_network_available,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use simreader_bridge::snapshot::{NetworkFields, SnapshotBridge, TelephonySnapshot};
    use simreader_bridge::traits::TelephonyBridge;
    use simreader_core::TelephonyField;

    fn network_snapshot(network: NetworkFields) -> TelephonySnapshot {
        TelephonySnapshot {
            network,
            ..TelephonySnapshot::default()
        }
    }

    #[test]
    fn lte_maps_on_both_platforms() {
        assert_eq!(network_type_name(&RawRadioTechnology::Android(13)), "LTE");
        assert_eq!(
            network_type_name(&RawRadioTechnology::Ios("CTRadioAccessTechnologyLTE".into())),
            "LTE"
        );
    }

    #[test]
    fn unmapped_identifiers_are_unknown() {
        assert_eq!(network_type_name(&RawRadioTechnology::Android(0)), "UNKNOWN");
        assert_eq!(network_type_name(&RawRadioTechnology::Android(-7)), "UNKNOWN");
        assert_eq!(
            network_type_name(&RawRadioTechnology::Ios("CTRadioAccessTechnology6G".into())),
            "UNKNOWN"
        );
    }

    #[test]
    fn new_radio_reports_5g() {
        assert_eq!(network_type_name(&RawRadioTechnology::Android(20)), "5G");
        assert_eq!(
            network_type_name(&RawRadioTechnology::Ios("CTRadioAccessTechnologyNRNSA".into())),
            "5G"
        );
    }

    #[test]
    fn android_availability_follows_operator_code() {
        let bridge = SnapshotBridge::new(network_snapshot(NetworkFields {
            operator_name: Some("AT&T".into()),
            operator: Some(OperatorIdentity::Combined(String::new())),
            radio: Some(RawRadioTechnology::Android(13)),
        }));
        let ctx = bridge.telephony().unwrap();
        let info = assemble(ctx.as_ref(), AvailabilityRule::OperatorCode).unwrap();
        assert_eq!(info.network_operator, None);
        assert!(!info.is_network_available);
        assert_eq!(info.network_type, "LTE");
        assert_eq!(info.signal_strength(), None);
    }

    #[test]
    fn ios_availability_follows_carrier_name() {
        let bridge = SnapshotBridge::new(network_snapshot(NetworkFields {
            operator_name: Some("EE".into()),
            operator: Some(OperatorIdentity::Split {
                mcc: Some("234".into()),
                mnc: Some("30".into()),
            }),
            radio: None,
        }));
        let ctx = bridge.telephony().unwrap();
        let info = assemble(ctx.as_ref(), AvailabilityRule::CarrierName).unwrap();
        assert!(info.is_network_available);
        assert_eq!(info.network_operator.as_deref(), Some("23430"));
        assert_eq!(info.network_type, "UNKNOWN");
    }

    #[test]
    fn short_operator_code_is_kept_and_counts_as_available() {
        let bridge = SnapshotBridge::new(network_snapshot(NetworkFields {
            operator_name: None,
            operator: Some(OperatorIdentity::Combined("31".into())),
            radio: Some(RawRadioTechnology::Android(13)),
        }));
        let ctx = bridge.telephony().unwrap();
        let info = assemble(ctx.as_ref(), AvailabilityRule::OperatorCode).unwrap();
        assert_eq!(info.network_operator.as_deref(), Some("31"));
        assert!(info.is_network_available);
    }

    #[test]
    fn combined_operator_code_is_not_reshaped() {
        assert_eq!(
            operator_code(OperatorIdentity::Combined("3102605".into())).as_deref(),
            Some("3102605")
        );
        assert_eq!(operator_code(OperatorIdentity::Combined(String::new())), None);
        assert_eq!(
            operator_code(OperatorIdentity::Split { mcc: None, mnc: None }),
            None
        );
    }

    #[test]
    fn read_failure_propagates() {
        let mut snapshot = TelephonySnapshot::example();
        snapshot.failing.insert(TelephonyField::NetworkOperator);
        let bridge = SnapshotBridge::new(snapshot);
        let ctx = bridge.telephony().unwrap();
        assert!(assemble(ctx.as_ref(), AvailabilityRule::OperatorCode).is_err());
    }
}
