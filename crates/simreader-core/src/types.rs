// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the SIM reader.

use serde::{Deserialize, Serialize};

/// Telephony metadata for one SIM / subscription slot.
///
/// Every text field is independently optional. A record with nothing but a
/// slot index is valid: it means the slot exposed no telephony data.
/// Absent fields serialize as `null` so the response keys are stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimRecord {
    pub carrier_name: Option<String>,
    /// ISO 3166 country code of the SIM provider.
    pub country_code: Option<String>,
    /// Numeric MCC, kept as text so leading zeros survive.
    pub mobile_country_code: Option<String>,
    /// Numeric MNC, kept as text so leading zeros survive.
    pub mobile_network_code: Option<String>,
    pub phone_number: Option<String>,
    pub sim_serial_number: Option<String>,
    pub subscriber_id: Option<String>,
    /// Position within one response batch, not the hardware slot.
    pub sim_slot_index: u32,
    pub is_network_roaming: bool,
}

impl SimRecord {
    /// A record with every field absent and roaming `false`.
    pub fn empty(sim_slot_index: u32) -> Self {
        Self {
            carrier_name: None,
            country_code: None,
            mobile_country_code: None,
            mobile_network_code: None,
            phone_number: None,
            sim_serial_number: None,
            subscriber_id: None,
            sim_slot_index,
            is_network_roaming: false,
        }
    }
}

/// Current cellular network attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    pub network_operator_name: Option<String>,
    /// MCC followed by MNC, e.g. `"310260"`.
    pub network_operator: Option<String>,
    /// Display name from the radio technology table, or `"UNKNOWN"`.
    pub network_type: String,
    pub is_network_available: bool,
    // Reading signal strength needs a long-lived listener; never populated.
    #[serde(skip_deserializing)]
    signal_strength: Option<i32>,
}

impl NetworkInfo {
    pub fn new(
        network_operator_name: Option<String>,
        network_operator: Option<String>,
        network_type: impl Into<String>,
        is_network_available: bool,
    ) -> Self {
        Self {
            network_operator_name,
            network_operator,
            network_type: network_type.into(),
            is_network_available,
            signal_strength: None,
        }
    }

    /// Always `None`.
    pub fn signal_strength(&self) -> Option<i32> {
        self.signal_strength
    }
}

/// SIM card state as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimState {
    #[default]
    Unknown,
    Absent,
    PinRequired,
    PukRequired,
    NetworkLocked,
    /// Card inserted and usable.
    Ready,
    NotReady,
    PermDisabled,
    CardIoError,
    CardRestricted,
}

impl SimState {
    /// Decode `TelephonyManager.SIM_STATE_*`.
    pub fn from_android(code: i32) -> Self {
        match code {
            1 => Self::Absent,
            2 => Self::PinRequired,
            3 => Self::PukRequired,
            4 => Self::NetworkLocked,
            5 => Self::Ready,
            6 => Self::NotReady,
            7 => Self::PermDisabled,
            8 => Self::CardIoError,
            9 => Self::CardRestricted,
            _ => Self::Unknown,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Which SIM record assembly path the platform supports on this call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Active subscriptions can be enumerated one by one.
    SubscriptionEnumeration,
    /// Only the single active telephony context is readable.
    SingleContext,
}

/// How a platform decides whether a network is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityRule {
    /// A non-empty operator code was resolved (Android).
    #[default]
    OperatorCode,
    /// A carrier name was resolved (iOS).
    CarrierName,
}

/// Operator identity as the platform reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorIdentity {
    /// MCC and MNC run together, e.g. `"310260"`.
    Combined(String),
    /// MCC and MNC reported as separate values.
    Split {
        mcc: Option<String>,
        mnc: Option<String>,
    },
}

/// Raw radio access technology identifier, before table lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawRadioTechnology {
    /// `TelephonyManager.NETWORK_TYPE_*` constant.
    Android(i32),
    /// `CTRadioAccessTechnology*` constant value.
    Ios(String),
}

/// Names of the individually readable telephony fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TelephonyField {
    CarrierName,
    CountryIso,
    SimOperator,
    MobileCountryCode,
    MobileNetworkCode,
    PhoneNumber,
    SimSerialNumber,
    SubscriberId,
    NetworkRoaming,
    SimState,
    NetworkOperatorName,
    NetworkOperator,
    RadioTechnology,
    Subscriptions,
}

impl TelephonyField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CarrierName => "carrier_name",
            Self::CountryIso => "country_iso",
            Self::SimOperator => "sim_operator",
            Self::MobileCountryCode => "mobile_country_code",
            Self::MobileNetworkCode => "mobile_network_code",
            Self::PhoneNumber => "phone_number",
            Self::SimSerialNumber => "sim_serial_number",
            Self::SubscriberId => "subscriber_id",
            Self::NetworkRoaming => "network_roaming",
            Self::SimState => "sim_state",
            Self::NetworkOperatorName => "network_operator_name",
            Self::NetworkOperator => "network_operator",
            Self::RadioTechnology => "radio_technology",
            Self::Subscriptions => "subscriptions",
        }
    }
}

impl std::fmt::Display for TelephonyField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
