// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuerySculptor-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of QuerySculptor and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model: the query-state tree one session holds.

pub mod ids;
pub mod path;
pub mod query_state;

pub use ids::{SessionId, SessionIdError};
pub use path::{inline_segment, FieldPath, FieldPathError};
pub use query_state::{
    ArgValue, ArgValueError, Directive, DirectiveArgument, FieldNode, FragmentDef, InlineFragment,
    OperationType, OperationTypeError, QueryState, GRAPHQL_STRING_MARKER,
};
