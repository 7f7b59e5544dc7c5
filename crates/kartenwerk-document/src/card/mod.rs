// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Card module — fixed-geometry layout composition and PDF rendering.

pub mod layout;
pub mod renderer;
mod shapes;

pub use layout::CardLayout;
pub use renderer::CardRenderer;
