// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Graph visualization projection and memory correction dispatch.

pub mod correction;
pub mod view;

pub use correction::CorrectionDispatcher;
pub use view::{GraphLink, GraphNode, GraphProjection, GraphView};
