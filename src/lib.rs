// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuerySculptor-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of QuerySculptor and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! QuerySculptor — stateful GraphQL query construction over MCP.
//!
//! An agent drives a session through structured tools (select a field, set an
//! argument, declare a variable, …); each tool mutates a server-held
//! [`model::QueryState`] under schema and resource constraints. When the agent
//! is ready, the state is rendered into a GraphQL document, validated against
//! the cached upstream schema, complexity-checked, and executed against the
//! single configured endpoint.

pub mod complexity;
pub mod config;
pub mod error;
pub mod executor;
pub mod mcp;
pub mod model;
pub mod render;
pub mod schema;
pub mod store;
pub mod validate;
