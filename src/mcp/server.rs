// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuerySculptor-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of QuerySculptor and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::{Json, Parameters};
use rmcp::model::{ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData, ServerHandler, ServiceExt};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::{ErrorKind, ToolError};
use crate::executor::{validate_state, Executor};
use crate::model::{
    inline_segment, ArgValue, Directive, DirectiveArgument, FieldNode, FieldPath, FragmentDef,
    InlineFragment, OperationType, QueryState, SessionId,
};
use crate::schema::{merged_headers, CachedSchema, SchemaCache};
use crate::store::SessionStore;
use crate::validate::{
    coerce_string_value, is_valid_graphql_name, validate_argument_in_schema,
    validate_directive_name, validate_field_alias, validate_field_in_schema,
    validate_fragment_name, validate_graphql_type, validate_input_complexity,
    validate_operation_name, validate_pagination_value, validate_text_input,
    validate_value_against_type, validate_variable_name, validate_variable_type,
};

use super::types::*;

/// Everything the tool handlers need, passed explicitly instead of living in
/// module globals.
pub struct App {
    pub config: Config,
    pub schema_cache: SchemaCache,
    pub store: SessionStore,
    pub executor: Executor,
}

impl App {
    pub fn new(config: Config) -> Self {
        let client = reqwest::Client::new();
        Self {
            schema_cache: SchemaCache::new(client.clone()),
            store: SessionStore::new(config.redis_url.clone()),
            executor: Executor::new(client),
            config,
        }
    }
}

#[derive(Clone)]
pub struct SculptorMcp {
    app: Arc<App>,
    session_locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
    tool_router: ToolRouter<Self>,
}

fn tool_error(err: ToolError) -> ErrorData {
    let data = serde_json::json!({
        "kind": err.kind(),
        "suggestion": err.suggestion(),
        "path": err.path(),
    });
    match err.kind() {
        ErrorKind::Validation | ErrorKind::Schema | ErrorKind::Limit => {
            ErrorData::invalid_params(err.message().to_owned(), Some(data))
        }
        ErrorKind::Session => ErrorData::resource_not_found(err.message().to_owned(), Some(data)),
        _ => ErrorData::internal_error(err.message().to_owned(), Some(data)),
    }
}

/// Resolves the GraphQL type the selection set at `path` selects from, by
/// walking the state's field names through the schema. An `on:Type` segment
/// narrows to the matching inline fragment's type condition.
fn type_at_path(
    schema: &CachedSchema,
    state: &QueryState,
    path: &FieldPath,
) -> Result<String, ToolError> {
    let mut parent_type = state.operation_type_name().to_owned();
    let mut node = state.query_structure();
    let mut in_inline: Option<&InlineFragment> = None;

    for segment in path.segments() {
        if let Some(on_type) = inline_segment(segment) {
            let inline = node.inline_fragment(on_type).ok_or_else(|| {
                ToolError::validation(format!(
                    "Path '{path}' does not match the current structure (no inline fragment \
                     '... on {on_type}')"
                ))
                .with_path(path.to_string())
            })?;
            parent_type = on_type.to_owned();
            in_inline = Some(inline);
            continue;
        }

        let child = match in_inline.take() {
            Some(inline) => inline.selections.get(segment),
            None => node.fields().get(segment),
        }
        .ok_or_else(|| {
            ToolError::validation(format!(
                "Path '{path}' does not match the current structure (no selection '{segment}')"
            ))
            .with_path(path.to_string())
        })?;
        let field_def = schema.field_def(&parent_type, child.field_name()).ok_or_else(|| {
            ToolError::schema(format!(
                "Field '{}' is not on type '{parent_type}'",
                child.field_name()
            ))
            .with_path(path.to_string())
        })?;
        parent_type = schema.field_base_type(field_def).to_owned();
        node = child;
    }
    Ok(parent_type)
}

fn parse_path(raw: &str) -> Result<FieldPath, ToolError> {
    FieldPath::parse(raw).map_err(|err| ToolError::validation(err.to_string()))
}

#[tool_router]
impl SculptorMcp {
    pub fn new(app: Arc<App>) -> Self {
        Self {
            app,
            session_locks: Arc::new(Mutex::new(HashMap::new())),
            tool_router: Self::tool_router(),
        }
    }

    pub async fn serve_stdio(self) -> Result<(), rmcp::RmcpError> {
        let service = self.serve((tokio::io::stdin(), tokio::io::stdout())).await?;
        service.waiting().await?;
        Ok(())
    }

    /// Serializes tool calls per session; distinct sessions proceed
    /// independently.
    async fn session_lock(&self, session_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.session_locks.lock().await;
        Arc::clone(locks.entry(session_id.to_owned()).or_default())
    }

    async fn load_state(&self, raw_session_id: &str) -> Result<(SessionId, QueryState), ErrorData> {
        let session_id = SessionId::parse(raw_session_id).map_err(|err| {
            tool_error(ToolError::session(format!("Invalid session id: {err}")))
        })?;
        let state = self
            .app
            .store
            .load(&session_id)
            .await
            .map_err(tool_error)?
            .ok_or_else(|| {
                tool_error(ToolError::session(format!(
                    "Unknown or expired session '{raw_session_id}'"
                )))
            })?;
        Ok((session_id, state))
    }

    async fn save_state(&self, session_id: &SessionId, state: &QueryState) -> Result<(), ErrorData> {
        self.app.store.save(session_id, state).await.map_err(tool_error)
    }

    async fn schema_for(&self, state: &QueryState) -> Result<Arc<CachedSchema>, ErrorData> {
        let headers = merged_headers(&self.app.config.default_headers, state.headers());
        self.app
            .schema_cache
            .get_or_fetch(&self.app.config.endpoint, &headers, self.app.config.request_timeout)
            .await
            .map_err(tool_error)
    }

    /// Converts a loose tool value into an [`ArgValue`], treating `$`-strings
    /// as variable references and warning when a string looks like a typed
    /// scalar.
    fn generic_arg_value(
        state: &QueryState,
        value: Value,
        warnings: &mut Vec<String>,
    ) -> Result<ArgValue, ToolError> {
        match value {
            Value::String(raw) if raw.starts_with('$') => {
                validate_variable_name(&raw)?;
                if !state.variable_declared(&raw) {
                    return Err(ToolError::validation(format!(
                        "Variable '{raw}' is not declared; call set-variable first"
                    )));
                }
                Ok(ArgValue::Variable { name: raw })
            }
            Value::String(raw) => {
                if let Some(coercion) = coerce_string_value(&raw) {
                    warnings.push(coercion.warning);
                }
                Ok(ArgValue::from_raw_value(Value::String(raw)))
            }
            other => Ok(ArgValue::from_raw_value(other)),
        }
    }

    /// Start a new session: resolves the schema's root type for the operation
    /// and returns the session id every other tool takes.
    #[tool(name = "start-session")]
    async fn start_session(
        &self,
        params: Parameters<StartSessionParams>,
    ) -> Result<Json<StartSessionResponse>, ErrorData> {
        let StartSessionParams { operation_type, operation_name, headers } = params.0;

        let operation_type = OperationType::parse(&operation_type)
            .map_err(|err| tool_error(ToolError::validation(err.to_string())))?;

        let mut session_headers = IndexMap::new();
        for (key, value) in headers.unwrap_or_default() {
            validate_text_input(&key, "header name").map_err(tool_error)?;
            validate_text_input(&value, &format!("header '{key}'")).map_err(tool_error)?;
            session_headers.insert(key, value);
        }

        let merged = merged_headers(&self.app.config.default_headers, &session_headers);
        let schema = self
            .app
            .schema_cache
            .get_or_fetch(&self.app.config.endpoint, &merged, self.app.config.request_timeout)
            .await
            .map_err(tool_error)?;

        let root_type = schema
            .root_type_name(operation_type)
            .ok_or_else(|| {
                tool_error(ToolError::schema(format!(
                    "Schema defines no root type for operation '{operation_type}'"
                )))
            })?
            .to_owned();

        let mut state = QueryState::new(session_headers, operation_type, &root_type);
        if let Some(name) = operation_name {
            validate_operation_name(&name).map_err(tool_error)?;
            state.set_operation_name(Some(name));
        }

        let session_id = SessionId::random();
        self.save_state(&session_id, &state).await?;

        Ok(Json(StartSessionResponse {
            ok: true,
            session_id: session_id.to_string(),
            operation_type: operation_type.to_string(),
            root_type,
        }))
    }

    /// Name (or rename) the operation; the name appears in the rendered
    /// document header.
    #[tool(name = "set-operation-name")]
    async fn set_operation_name(
        &self,
        params: Parameters<SetOperationNameParams>,
    ) -> Result<Json<MutationResponse>, ErrorData> {
        let SetOperationNameParams { session_id, name } = params.0;
        validate_operation_name(&name).map_err(tool_error)?;

        let lock = self.session_lock(&session_id).await;
        let _guard = lock.lock().await;

        let (session_id, mut state) = self.load_state(&session_id).await?;
        state.set_operation_name(Some(name));
        self.save_state(&session_id, &state).await?;

        Ok(Json(MutationResponse {
            ok: true,
            session_id: session_id.to_string(),
            warnings: Vec::new(),
        }))
    }

    /// Add a field to a selection set; validates the field against the parent
    /// type and suggests the closest name on a miss.
    #[tool(name = "select-field")]
    async fn select_field(
        &self,
        params: Parameters<SelectFieldParams>,
    ) -> Result<Json<MutationResponse>, ErrorData> {
        let SelectFieldParams { session_id, parent_path, field_name, alias } = params.0;
        let path = parse_path(parent_path.as_deref().unwrap_or_default()).map_err(tool_error)?;
        if let Some(alias) = alias.as_deref() {
            validate_field_alias(alias).map_err(tool_error)?;
        }

        let lock = self.session_lock(&session_id).await;
        let _guard = lock.lock().await;

        let (session_id, mut state) = self.load_state(&session_id).await?;
        let schema = self.schema_for(&state).await?;

        let parent_type = type_at_path(&schema, &state, &path).map_err(tool_error)?;
        validate_field_in_schema(&schema, &parent_type, &field_name).map_err(tool_error)?;

        let selection_key = alias.clone().unwrap_or_else(|| field_name.clone());
        let selections = state
            .selections_at_mut(&path)
            .ok_or_else(|| tool_error(ToolError::internal("resolved path disappeared")))?;
        if selections.contains_key(&selection_key) {
            return Err(tool_error(
                ToolError::validation(format!(
                    "Duplicate selection key '{selection_key}' in this selection set; use a \
                     distinct alias"
                ))
                .with_path(path.to_string()),
            ));
        }
        selections.insert(selection_key, FieldNode::new(field_name, alias));

        self.save_state(&session_id, &state).await?;
        Ok(Json(MutationResponse {
            ok: true,
            session_id: session_id.to_string(),
            warnings: Vec::new(),
        }))
    }

    /// Set an argument on a selected field. `$name` strings reference
    /// variables; `is_enum` passes a bare symbol; `is_typed` validates the
    /// value against the argument's schema type.
    #[tool(name = "set-argument")]
    async fn set_argument(
        &self,
        params: Parameters<SetArgumentParams>,
    ) -> Result<Json<MutationResponse>, ErrorData> {
        let SetArgumentParams {
            session_id,
            field_path,
            arg_name,
            value,
            is_variable,
            is_enum,
            is_typed,
        } = params.0;

        self.apply_argument(
            &session_id,
            &field_path,
            &arg_name,
            value,
            is_variable.unwrap_or(false),
            is_enum.unwrap_or(false),
            is_typed.unwrap_or(false),
        )
        .await
    }

    /// Set an argument validated against its schema type; strings that carry
    /// numbers print as the scalar the schema expects.
    #[tool(name = "set-typed-argument")]
    async fn set_typed_argument(
        &self,
        params: Parameters<SetTypedArgumentParams>,
    ) -> Result<Json<MutationResponse>, ErrorData> {
        let SetTypedArgumentParams { session_id, field_path, arg_name, value } = params.0;
        self.apply_argument(&session_id, &field_path, &arg_name, value, false, false, true).await
    }

    #[allow(clippy::too_many_arguments)]
    async fn apply_argument(
        &self,
        raw_session_id: &str,
        field_path: &str,
        arg_name: &str,
        value: Value,
        is_variable: bool,
        is_enum: bool,
        is_typed: bool,
    ) -> Result<Json<MutationResponse>, ErrorData> {
        let path = parse_path(field_path).map_err(tool_error)?;
        if path.is_root() {
            return Err(tool_error(ToolError::validation(
                "field_path must address a selected field, not the root",
            )));
        }

        let lock = self.session_lock(raw_session_id).await;
        let _guard = lock.lock().await;

        let (session_id, mut state) = self.load_state(raw_session_id).await?;
        let schema = self.schema_for(&state).await?;

        let parent_path = path.parent().expect("non-root path has a parent");
        let parent_type = type_at_path(&schema, &state, &parent_path).map_err(tool_error)?;
        let field_name = state
            .node_at(&path)
            .ok_or_else(|| {
                tool_error(
                    ToolError::validation(format!(
                        "Path '{path}' does not match the current structure"
                    ))
                    .with_path(path.to_string()),
                )
            })?
            .field_name()
            .to_owned();

        let field_def = schema.field_def(&parent_type, &field_name).ok_or_else(|| {
            tool_error(ToolError::schema(format!(
                "Field '{field_name}' is not on type '{parent_type}'"
            )))
        })?;
        validate_argument_in_schema(field_def, arg_name, field_path).map_err(tool_error)?;
        validate_pagination_value(arg_name, &value).map_err(tool_error)?;
        validate_input_complexity(&value, arg_name).map_err(tool_error)?;

        let mut warnings = Vec::new();
        let arg_value = if is_variable {
            let name = value
                .as_str()
                .ok_or_else(|| {
                    tool_error(ToolError::validation(
                        "is_variable requires the value to be a '$name' string",
                    ))
                })?
                .to_owned();
            validate_variable_name(&name).map_err(tool_error)?;
            if !state.variable_declared(&name) {
                return Err(tool_error(ToolError::validation(format!(
                    "Variable '{name}' is not declared; call set-variable first"
                ))));
            }
            ArgValue::Variable { name }
        } else if is_enum {
            let symbol = value
                .as_str()
                .ok_or_else(|| {
                    tool_error(ToolError::validation("is_enum requires a string value"))
                })?
                .to_owned();
            if !is_valid_graphql_name(&symbol) {
                return Err(tool_error(ToolError::validation(format!(
                    "Invalid enum value '{symbol}'"
                ))));
            }
            ArgValue::Enum { symbol }
        } else if is_typed {
            let arg_type = field_def
                .arguments
                .iter()
                .find(|arg| arg.name.as_str() == arg_name)
                .map(|arg| arg.ty.to_string())
                .expect("argument validated above");
            if let Some(mismatch) = validate_value_against_type(&value, &arg_type) {
                return Err(tool_error(
                    ToolError::validation(format!(
                        "Value for argument '{arg_name}' does not match type '{arg_type}': \
                         {mismatch}"
                    ))
                    .with_path(field_path.to_owned()),
                ));
            }
            ArgValue::Typed { value, type_name: arg_type }
        } else {
            Self::generic_arg_value(&state, value, &mut warnings).map_err(tool_error)?
        };

        let node = state
            .node_at_mut(&path)
            .ok_or_else(|| tool_error(ToolError::internal("resolved path disappeared")))?;
        node.args_mut().insert(arg_name.to_owned(), arg_value);

        self.save_state(&session_id, &state).await?;
        Ok(Json(MutationResponse { ok: true, session_id: session_id.to_string(), warnings }))
    }

    /// Declare a variable with a GraphQL type and optional default; arguments
    /// can then reference it as `$name`.
    #[tool(name = "set-variable")]
    async fn set_variable(
        &self,
        params: Parameters<SetVariableParams>,
    ) -> Result<Json<MutationResponse>, ErrorData> {
        let SetVariableParams { session_id, var_name, var_type, default } = params.0;

        validate_variable_name(&var_name).map_err(tool_error)?;
        validate_graphql_type(&var_type).map_err(tool_error)?;
        validate_variable_type(&var_type).map_err(tool_error)?;
        if let Some(default) = &default {
            validate_input_complexity(default, &var_name).map_err(tool_error)?;
            if let Some(mismatch) = validate_value_against_type(default, var_type.trim()) {
                return Err(tool_error(ToolError::validation(format!(
                    "Default for '{var_name}' does not match type '{}': {mismatch}",
                    var_type.trim()
                ))));
            }
        }

        let lock = self.session_lock(&session_id).await;
        let _guard = lock.lock().await;

        let (session_id, mut state) = self.load_state(&session_id).await?;
        state.variables_schema_mut().insert(var_name.clone(), var_type.trim().to_owned());
        if let Some(default) = default {
            state.variables_defaults_mut().insert(var_name, default);
        }

        self.save_state(&session_id, &state).await?;
        Ok(Json(MutationResponse {
            ok: true,
            session_id: session_id.to_string(),
            warnings: Vec::new(),
        }))
    }

    /// Provide the runtime value for a declared variable, checked against the
    /// declared type; sent in the `variables` object at execution.
    #[tool(name = "set-variable-value")]
    async fn set_variable_value(
        &self,
        params: Parameters<SetVariableValueParams>,
    ) -> Result<Json<MutationResponse>, ErrorData> {
        let SetVariableValueParams { session_id, var_name, value } = params.0;
        validate_variable_name(&var_name).map_err(tool_error)?;
        validate_input_complexity(&value, &var_name).map_err(tool_error)?;

        let lock = self.session_lock(&session_id).await;
        let _guard = lock.lock().await;

        let (session_id, mut state) = self.load_state(&session_id).await?;
        let Some(declared_type) = state.variables_schema().get(&var_name).cloned() else {
            return Err(tool_error(ToolError::validation(format!(
                "Variable '{var_name}' is not declared; call set-variable first"
            ))));
        };
        if let Some(mismatch) = validate_value_against_type(&value, &declared_type) {
            return Err(tool_error(ToolError::validation(format!(
                "Value for '{var_name}' does not match type '{declared_type}': {mismatch}"
            ))));
        }

        state.variables_values_mut().insert(var_name, value);
        self.save_state(&session_id, &state).await?;
        Ok(Json(MutationResponse {
            ok: true,
            session_id: session_id.to_string(),
            warnings: Vec::new(),
        }))
    }

    /// Attach a directive to a field (dotted path) or to the operation itself
    /// (path `operation`).
    #[tool(name = "add-directive")]
    async fn add_directive(
        &self,
        params: Parameters<AddDirectiveParams>,
    ) -> Result<Json<MutationResponse>, ErrorData> {
        let AddDirectiveParams { session_id, path, name, arguments } = params.0;
        validate_directive_name(&name).map_err(tool_error)?;
        let directive_name = name.strip_prefix('@').unwrap_or(&name).to_owned();

        let lock = self.session_lock(&session_id).await;
        let _guard = lock.lock().await;

        let (session_id, mut state) = self.load_state(&session_id).await?;

        let mut warnings = Vec::new();
        let mut directive_arguments = Vec::new();
        for input in arguments.unwrap_or_default() {
            if !is_valid_graphql_name(&input.name) {
                return Err(tool_error(ToolError::validation(format!(
                    "Invalid directive argument name '{}'",
                    input.name
                ))));
            }
            validate_input_complexity(&input.value, &input.name).map_err(tool_error)?;
            let value = Self::generic_arg_value(&state, input.value, &mut warnings)
                .map_err(tool_error)?;
            directive_arguments.push(DirectiveArgument { name: input.name, value });
        }
        let directive = Directive { name: directive_name, arguments: directive_arguments };

        if path == "operation" {
            state.operation_directives_mut().push(directive);
        } else {
            let path = parse_path(&path).map_err(tool_error)?;
            let node = state.node_at_mut(&path).ok_or_else(|| {
                tool_error(
                    ToolError::validation(format!(
                        "Path '{path}' does not match the current structure"
                    ))
                    .with_path(path.to_string()),
                )
            })?;
            node.directives_mut().push(directive);
        }

        self.save_state(&session_id, &state).await?;
        Ok(Json(MutationResponse { ok: true, session_id: session_id.to_string(), warnings }))
    }

    /// Spread a named fragment into a selection set (`...Name`); define the
    /// fragment itself with define-fragment.
    #[tool(name = "spread-fragment")]
    async fn spread_fragment(
        &self,
        params: Parameters<SpreadFragmentParams>,
    ) -> Result<Json<MutationResponse>, ErrorData> {
        let SpreadFragmentParams { session_id, path, fragment_name } = params.0;
        validate_fragment_name(&fragment_name).map_err(tool_error)?;
        let path = parse_path(path.as_deref().unwrap_or_default()).map_err(tool_error)?;

        let lock = self.session_lock(&session_id).await;
        let _guard = lock.lock().await;

        let (session_id, mut state) = self.load_state(&session_id).await?;
        let node = state.node_at_mut(&path).ok_or_else(|| {
            tool_error(
                ToolError::validation(format!(
                    "Path '{path}' does not match the current structure"
                ))
                .with_path(path.to_string()),
            )
        })?;
        node.fragment_spreads_mut().push(fragment_name);

        self.save_state(&session_id, &state).await?;
        Ok(Json(MutationResponse {
            ok: true,
            session_id: session_id.to_string(),
            warnings: Vec::new(),
        }))
    }

    /// Define (or replace) a named fragment on a schema type; fields are
    /// validated against that type.
    #[tool(name = "define-fragment")]
    async fn define_fragment(
        &self,
        params: Parameters<DefineFragmentParams>,
    ) -> Result<Json<MutationResponse>, ErrorData> {
        let DefineFragmentParams { session_id, name, on_type, fields } = params.0;
        validate_fragment_name(&name).map_err(tool_error)?;
        if fields.is_empty() {
            return Err(tool_error(ToolError::validation(
                "Fragment must select at least one field",
            )));
        }

        let lock = self.session_lock(&session_id).await;
        let _guard = lock.lock().await;

        let (session_id, mut state) = self.load_state(&session_id).await?;
        let schema = self.schema_for(&state).await?;

        if !schema.type_exists(&on_type) {
            return Err(tool_error(ToolError::schema(format!(
                "Type '{on_type}' not found in schema"
            ))));
        }

        let mut fragment_fields = IndexMap::new();
        for field_name in fields {
            validate_field_in_schema(&schema, &on_type, &field_name).map_err(tool_error)?;
            if fragment_fields.contains_key(&field_name) {
                continue;
            }
            fragment_fields.insert(field_name.clone(), FieldNode::new(field_name, None));
        }

        state
            .fragments_mut()
            .insert(name, FragmentDef { on_type, fields: fragment_fields });

        self.save_state(&session_id, &state).await?;
        Ok(Json(MutationResponse {
            ok: true,
            session_id: session_id.to_string(),
            warnings: Vec::new(),
        }))
    }

    /// Add an inline fragment (`... on Type`) to a selection set; fill it by
    /// passing select-field a parent_path ending in `on:Type` (it renders
    /// once it has selections).
    #[tool(name = "add-inline-fragment")]
    async fn add_inline_fragment(
        &self,
        params: Parameters<AddInlineFragmentParams>,
    ) -> Result<Json<MutationResponse>, ErrorData> {
        let AddInlineFragmentParams { session_id, path, on_type } = params.0;
        let path = parse_path(path.as_deref().unwrap_or_default()).map_err(tool_error)?;

        let lock = self.session_lock(&session_id).await;
        let _guard = lock.lock().await;

        let (session_id, mut state) = self.load_state(&session_id).await?;
        let schema = self.schema_for(&state).await?;
        if !schema.type_exists(&on_type) {
            return Err(tool_error(ToolError::schema(format!(
                "Type '{on_type}' not found in schema"
            ))));
        }

        let node = state.node_at_mut(&path).ok_or_else(|| {
            tool_error(
                ToolError::validation(format!(
                    "Path '{path}' does not match the current structure"
                ))
                .with_path(path.to_string()),
            )
        })?;
        node.inline_fragments_mut().push(InlineFragment { on_type, selections: IndexMap::new() });

        self.save_state(&session_id, &state).await?;
        Ok(Json(MutationResponse {
            ok: true,
            session_id: session_id.to_string(),
            warnings: Vec::new(),
        }))
    }

    /// Render the current state into GraphQL document text without validating
    /// or executing it.
    #[tool(name = "build-query")]
    async fn build_query(
        &self,
        params: Parameters<SessionParams>,
    ) -> Result<Json<BuildQueryResponse>, ErrorData> {
        let (_, state) = self.load_state(&params.0.session_id).await?;
        Ok(Json(BuildQueryResponse { ok: true, query: crate::render::render_document(&state) }))
    }

    /// Render and fully check the query: syntax, schema validation, and
    /// complexity limits; warnings include missing required arguments.
    #[tool(name = "validate-query")]
    async fn validate_query(
        &self,
        params: Parameters<SessionParams>,
    ) -> Result<Json<ValidateQueryResponse>, ErrorData> {
        let (_, state) = self.load_state(&params.0.session_id).await?;
        let schema = self.schema_for(&state).await?;
        let report = validate_state(&state, &schema);
        Ok(Json(ValidateQueryResponse {
            ok: true,
            valid: report.is_valid(),
            query: report.query,
            errors: report.errors,
            warnings: report.warnings,
        }))
    }

    /// Validate then POST the query to the configured upstream; returns the
    /// upstream JSON verbatim plus any warnings.
    #[tool(name = "execute-query")]
    async fn execute_query(
        &self,
        params: Parameters<SessionParams>,
    ) -> Result<Json<ExecuteQueryResponse>, ErrorData> {
        let (_, state) = self.load_state(&params.0.session_id).await?;
        let schema = self.schema_for(&state).await?;

        let outcome = self
            .app
            .executor
            .execute(
                &state,
                &schema,
                &self.app.config.endpoint,
                &self.app.config.default_headers,
                self.app.config.execute_timeout,
            )
            .await
            .map_err(tool_error)?;

        Ok(Json(ExecuteQueryResponse {
            ok: true,
            query: outcome.query,
            response: outcome.response,
            warnings: outcome.warnings,
        }))
    }

    /// Delete the stored session state.
    #[tool(name = "end-session")]
    async fn end_session(
        &self,
        params: Parameters<SessionParams>,
    ) -> Result<Json<EndSessionResponse>, ErrorData> {
        let raw_session_id = params.0.session_id;
        let session_id = SessionId::parse(raw_session_id.as_str()).map_err(|err| {
            tool_error(ToolError::session(format!("Invalid session id: {err}")))
        })?;

        self.app.store.delete(&session_id).await.map_err(tool_error)?;
        self.session_locks.lock().await.remove(session_id.as_str());

        Ok(Json(EndSessionResponse { ok: true, session_id: session_id.to_string() }))
    }

    /// Inspect the raw session state (the persisted JSON layout).
    #[tool(name = "get-query-state")]
    async fn get_query_state(
        &self,
        params: Parameters<SessionParams>,
    ) -> Result<Json<QueryStateResponse>, ErrorData> {
        let (_, state) = self.load_state(&params.0.session_id).await?;
        let state = serde_json::to_value(&state).map_err(|err| {
            tool_error(ToolError::internal(format!("cannot serialize session state: {err}")))
        })?;
        Ok(Json(QueryStateResponse { ok: true, state }))
    }

    /// Summarize the cached upstream schema: root types and type names, for
    /// orientation before select-field.
    #[tool(name = "get-schema-info")]
    async fn get_schema_info(
        &self,
        params: Parameters<SessionParams>,
    ) -> Result<Json<SchemaInfoResponse>, ErrorData> {
        let (_, state) = self.load_state(&params.0.session_id).await?;
        let schema = self.schema_for(&state).await?;

        let mut type_names: Vec<String> = schema
            .schema()
            .types
            .keys()
            .map(|name| name.to_string())
            .filter(|name| !name.starts_with("__"))
            .collect();
        type_names.sort();

        Ok(Json(SchemaInfoResponse {
            ok: true,
            query_type: schema.root_type_name(OperationType::Query).map(str::to_owned),
            mutation_type: schema.root_type_name(OperationType::Mutation).map(str::to_owned),
            subscription_type: schema
                .root_type_name(OperationType::Subscription)
                .map(str::to_owned),
            type_count: type_names.len(),
            type_names,
        }))
    }
}

#[tool_handler]
impl ServerHandler for SculptorMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "QuerySculptor GraphQL construction server (tools: start-session, \
                 set-operation-name, select-field, set-argument, set-typed-argument, \
                 set-variable, set-variable-value, add-directive, spread-fragment, \
                 define-fragment, add-inline-fragment, build-query, validate-query, \
                 execute-query, end-session, get-query-state, get-schema-info). Start with \
                 start-session, shape the query with select-field/set-argument, then \
                 build-query or validate-query before execute-query."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
