// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Snapshot bridge: serves recorded telephony state from memory.
//
// Used on desktop to replay a device snapshot through the normalizer, and as
// the test double everywhere else. Individual fields can be made to fail,
// and every telephony access is counted so callers can verify that nothing
// was read.

use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use simreader_core::error::{Result, SimReaderError};
use simreader_core::{
    AvailabilityRule, Capability, OperatorIdentity, RawRadioTechnology, SimState, TelephonyField,
};

use crate::traits::*;

/// Recorded state of a device's telephony stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelephonySnapshot {
    /// Name reported as the bridge's platform.
    pub platform: String,
    pub permission_granted: bool,
    pub capability: Capability,
    pub availability: AvailabilityRule,
    /// When set, obtaining the telephony context fails.
    pub service_unavailable: bool,
    pub sim: SimFields,
    pub subscriptions: Vec<SubscriptionFields>,
    pub network: NetworkFields,
    /// Fields whose reads raise an error.
    pub failing: HashSet<TelephonyField>,
}

impl Default for TelephonySnapshot {
    fn default() -> Self {
        Self {
            platform: "Snapshot".into(),
            permission_granted: true,
            capability: Capability::SingleContext,
            availability: AvailabilityRule::OperatorCode,
            service_unavailable: false,
            sim: SimFields::default(),
            subscriptions: Vec::new(),
            network: NetworkFields::default(),
            failing: HashSet::new(),
        }
    }
}

/// Values of the single active telephony context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimFields {
    pub operator_name: Option<String>,
    pub country_iso: Option<String>,
    pub operator: Option<OperatorIdentity>,
    pub line1_number: Option<String>,
    pub serial_number: Option<String>,
    pub subscriber_id: Option<String>,
    pub roaming: bool,
    pub state: SimState,
}

/// Values reported by one enumerated subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscriptionFields {
    pub carrier_name: Option<String>,
    pub country_iso: Option<String>,
    pub mcc: Option<String>,
    pub mnc: Option<String>,
    pub number: Option<String>,
    pub icc_id: Option<String>,
}

/// Values describing the registered network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkFields {
    pub operator_name: Option<String>,
    pub operator: Option<OperatorIdentity>,
    pub radio: Option<RawRadioTechnology>,
}

impl TelephonySnapshot {
    /// Load a snapshot from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// A plausible dual-SIM Android device, used as a template.
    pub fn example() -> Self {
        Self {
            platform: "Android (snapshot)".into(),
            capability: Capability::SubscriptionEnumeration,
            sim: SimFields {
                operator_name: Some("T-Mobile".into()),
                country_iso: Some("us".into()),
                operator: Some(OperatorIdentity::Combined("310260".into())),
                line1_number: Some("+15555550100".into()),
                serial_number: Some("8901260123456789012".into()),
                subscriber_id: Some("310260123456789".into()),
                roaming: false,
                state: SimState::Ready,
            },
            subscriptions: vec![
                SubscriptionFields {
                    carrier_name: Some("T-Mobile".into()),
                    country_iso: Some("us".into()),
                    mcc: Some("310".into()),
                    mnc: Some("260".into()),
                    number: Some("+15555550100".into()),
                    icc_id: Some("8901260123456789012".into()),
                },
                SubscriptionFields {
                    carrier_name: Some("Google Fi".into()),
                    country_iso: Some("us".into()),
                    mcc: Some("312".into()),
                    mnc: Some("580".into()),
                    number: None,
                    icc_id: None,
                },
            ],
            network: NetworkFields {
                operator_name: Some("T-Mobile".into()),
                operator: Some(OperatorIdentity::Combined("310260".into())),
                radio: Some(RawRadioTechnology::Android(13)),
            },
            ..Self::default()
        }
    }
}

/// Bridge over a [`TelephonySnapshot`].
#[derive(Debug)]
pub struct SnapshotBridge {
    snapshot: TelephonySnapshot,
    reads: AtomicUsize,
}

impl SnapshotBridge {
    pub fn new(snapshot: TelephonySnapshot) -> Self {
        Self {
            snapshot,
            reads: AtomicUsize::new(0),
        }
    }

    pub fn snapshot(&self) -> &TelephonySnapshot {
        &self.snapshot
    }

    /// Number of telephony accesses (context, enumeration, field reads) so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::SeqCst);
    }

    fn read<T: Clone>(&self, field: TelephonyField, value: &T) -> Result<T> {
        self.record_read();
        if self.snapshot.failing.contains(&field) {
            return Err(SimReaderError::Telephony(format!("{field}: injected failure")));
        }
        Ok(value.clone())
    }
}

impl TelephonyBridge for SnapshotBridge {
    fn platform_name(&self) -> &str {
        &self.snapshot.platform
    }

    fn has_read_phone_state(&self) -> bool {
        self.snapshot.permission_granted
    }

    fn capability(&self) -> Capability {
        self.snapshot.capability
    }

    fn availability_rule(&self) -> AvailabilityRule {
        self.snapshot.availability
    }

    fn telephony(&self) -> Result<Box<dyn TelephonyContext + '_>> {
        self.record_read();
        if self.snapshot.service_unavailable {
            return Err(SimReaderError::ServiceUnavailable(
                "telephony service not present in snapshot".into(),
            ));
        }
        Ok(Box::new(SnapshotContext { bridge: self }))
    }

    fn active_subscriptions(&self) -> Result<Vec<SubscriptionInfo>> {
        let subscriptions = self.read(TelephonyField::Subscriptions, &self.snapshot.subscriptions)?;
        Ok(subscriptions
            .iter()
            .map(|sub| SubscriptionInfo {
                carrier_name: self.read(TelephonyField::CarrierName, &sub.carrier_name),
                country_iso: self.read(TelephonyField::CountryIso, &sub.country_iso),
                mcc: self.read(TelephonyField::MobileCountryCode, &sub.mcc),
                mnc: self.read(TelephonyField::MobileNetworkCode, &sub.mnc),
                number: self.read(TelephonyField::PhoneNumber, &sub.number),
                icc_id: self.read(TelephonyField::SimSerialNumber, &sub.icc_id),
            })
            .collect())
    }
}

struct SnapshotContext<'a> {
    bridge: &'a SnapshotBridge,
}

impl TelephonyContext for SnapshotContext<'_> {
    fn sim_operator_name(&self) -> FieldRead<String> {
        let sim = &self.bridge.snapshot.sim;
        self.bridge.read(TelephonyField::CarrierName, &sim.operator_name)
    }

    fn sim_country_iso(&self) -> FieldRead<String> {
        let sim = &self.bridge.snapshot.sim;
        self.bridge.read(TelephonyField::CountryIso, &sim.country_iso)
    }

    fn sim_operator(&self) -> FieldRead<OperatorIdentity> {
        let sim = &self.bridge.snapshot.sim;
        self.bridge.read(TelephonyField::SimOperator, &sim.operator)
    }

    fn line1_number(&self) -> FieldRead<String> {
        let sim = &self.bridge.snapshot.sim;
        self.bridge.read(TelephonyField::PhoneNumber, &sim.line1_number)
    }

    fn sim_serial_number(&self) -> FieldRead<String> {
        let sim = &self.bridge.snapshot.sim;
        self.bridge.read(TelephonyField::SimSerialNumber, &sim.serial_number)
    }

    fn subscriber_id(&self) -> FieldRead<String> {
        let sim = &self.bridge.snapshot.sim;
        self.bridge.read(TelephonyField::SubscriberId, &sim.subscriber_id)
    }

    fn is_network_roaming(&self) -> Result<bool> {
        let sim = &self.bridge.snapshot.sim;
        self.bridge.read(TelephonyField::NetworkRoaming, &sim.roaming)
    }

    fn sim_state(&self) -> Result<SimState> {
        let sim = &self.bridge.snapshot.sim;
        self.bridge.read(TelephonyField::SimState, &sim.state)
    }

    fn network_operator_name(&self) -> FieldRead<String> {
        let network = &self.bridge.snapshot.network;
        self.bridge.read(TelephonyField::NetworkOperatorName, &network.operator_name)
    }

    fn network_operator(&self) -> FieldRead<OperatorIdentity> {
        let network = &self.bridge.snapshot.network;
        self.bridge.read(TelephonyField::NetworkOperator, &network.operator)
    }

    fn radio_technology(&self) -> FieldRead<RawRadioTechnology> {
        let network = &self.bridge.snapshot.network;
        self.bridge.read(TelephonyField::RadioTechnology, &network.radio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_field_errors_without_touching_siblings() {
        let mut snapshot = TelephonySnapshot::example();
        snapshot.failing.insert(TelephonyField::SimSerialNumber);
        let bridge = SnapshotBridge::new(snapshot);
        let ctx = bridge.telephony().unwrap();
        assert!(ctx.sim_serial_number().is_err());
        assert_eq!(ctx.sim_operator_name().unwrap().as_deref(), Some("T-Mobile"));
    }

    #[test]
    fn reads_are_counted() {
        let bridge = SnapshotBridge::new(TelephonySnapshot::example());
        assert_eq!(bridge.read_count(), 0);
        let ctx = bridge.telephony().unwrap();
        let _ = ctx.sim_state();
        assert_eq!(bridge.read_count(), 2);
        let _ = bridge.active_subscriptions();
        // one enumeration plus six fields per subscription
        assert_eq!(bridge.read_count(), 2 + 1 + 12);
    }

    #[test]
    fn unavailable_service_fails_context() {
        let snapshot = TelephonySnapshot {
            service_unavailable: true,
            ..TelephonySnapshot::default()
        };
        let bridge = SnapshotBridge::new(snapshot);
        assert!(matches!(
            bridge.telephony(),
            Err(SimReaderError::ServiceUnavailable(_))
        ));
    }

    #[test]
    fn snapshot_loads_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("device.json");
        std::fs::write(
            &path,
            r#"{
                "platform": "iOS (snapshot)",
                "availability": "carrier_name",
                "sim": {
                    "operator_name": "Verizon",
                    "operator": { "split": { "mcc": "311", "mnc": "480" } },
                    "state": "ready"
                },
                "network": { "radio": { "ios": "CTRadioAccessTechnologyNR" } },
                "failing": ["subscriber_id"]
            }"#,
        )
        .unwrap();

        let snapshot = TelephonySnapshot::from_json_file(&path).unwrap();
        assert!(snapshot.permission_granted);
        assert_eq!(snapshot.availability, AvailabilityRule::CarrierName);
        assert_eq!(
            snapshot.sim.operator,
            Some(OperatorIdentity::Split {
                mcc: Some("311".into()),
                mnc: Some("480".into()),
            })
        );
        assert!(snapshot.failing.contains(&TelephonyField::SubscriberId));
    }

    #[test]
    fn example_round_trips_through_json() {
        let json = serde_json::to_string(&TelephonySnapshot::example()).unwrap();
        let back: TelephonySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TelephonySnapshot::example());
    }
}
