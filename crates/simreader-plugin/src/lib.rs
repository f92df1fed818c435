// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// SIM reader: telephony field normalization and the method-call surface.
//
// Failures are absorbed at three levels: a field read degrades to absent
// (`extract`), a faulting record degrades to defaults (`records`), and
// anything left becomes a typed error response (`operations`, `channel`).

pub mod channel;
pub mod extract;
pub mod network;
pub mod operations;
pub mod records;

pub use channel::{CallOutcome, Method, MethodCall, MethodResponse, SimReaderPlugin};
pub use operations::{OperationError, SimReader};
