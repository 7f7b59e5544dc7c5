// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Photo module — intake checks, decode, downscale, PNG re-encode.

pub mod intake;

pub use intake::PhotoIntake;
